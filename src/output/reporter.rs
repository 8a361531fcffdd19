//! Presentation-layer implementations of the `ProgressReporter` port.
//!
//! `TerminalReporter` prints one line per step; `SpinnerReporter` drives an
//! indicatif spinner instead when stdout is an interactive terminal. Both
//! let application services emit progress events without depending on any
//! presentation type directly.

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Line-oriented progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ! {message}"` (suppressed when `ctx.quiet`)
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "→".cyan());
        }
    }

    fn success(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "✓".green());
        }
    }

    fn warn(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "!".yellow());
        }
    }
}

/// Spinner-backed reporter for interactive terminals.
///
/// Each `step()` retargets the spinner message; `success()` finishes it with
/// a checkmark. An unfinished spinner is cleared on drop so failure paths
/// never leave a dangling tick line.
pub struct SpinnerReporter {
    pb: ProgressBar,
}

impl SpinnerReporter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pb: progress::spinner(""),
        }
    }
}

impl Default for SpinnerReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for SpinnerReporter {
    fn step(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    fn success(&self, message: &str) {
        progress::finish_ok(&self.pb, message);
    }

    fn warn(&self, message: &str) {
        self.pb.println(format!("  {} {message}", "!".yellow()));
    }
}

impl Drop for SpinnerReporter {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}
