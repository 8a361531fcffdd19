//! Application context — unified state passed to every command handler.
//!
//! `AppContext` wires the concrete infrastructure implementations behind the
//! port traits: the file-backed ledger, the template materializer, the
//! config emitter, the gateway validator, and the runtime launcher. Adding a
//! cross-cutting concern requires one field change here — zero command
//! signatures change.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::domain::config::ApiaryConfig;
use crate::infra::emitter::JsonConfigEmitter;
use crate::infra::gateway::GatewayValidator;
use crate::infra::launcher::RuntimeLauncher;
use crate::infra::ledger::FileLedger;
use crate::infra::paths;
use crate::infra::template::FsMaterializer;
use crate::output::{OutputContext, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Enable JSON output mode.
    pub json: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Skip interactive prompts (also set by `CI` / `APIARY_YES` env vars).
    pub yes: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Loaded configuration.
    pub config: ApiaryConfig,
    /// Credit ledger.
    pub ledger: FileLedger,
    /// Template materializer.
    pub materializer: FsMaterializer,
    /// Instance configuration emitter.
    pub emitter: JsonConfigEmitter,
    /// Credential validator.
    pub validator: GatewayValidator,
    /// Instance launcher.
    pub launcher: RuntimeLauncher,
    /// When `true`, skip interactive prompts and use defaults.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the apiary home cannot be resolved or the
    /// configuration file is unreadable.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("APIARY_YES").is_ok();
        let non_interactive = flags.yes || ci_env;

        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config = crate::infra::config::load().context("loading configuration")?;
        let validator = GatewayValidator::new(
            &config.gateway.url,
            Duration::from_secs(config.gateway.timeout_secs),
        )?;

        Ok(Self {
            // JSON consumers parse stdout, so human chatter is muted there.
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            ledger: FileLedger::new(paths::ledger_path()?),
            materializer: FsMaterializer::new(paths::template_dir()?, paths::instances_dir()?),
            emitter: JsonConfigEmitter,
            validator,
            launcher: RuntimeLauncher::new(paths::runtimes_dir()?),
            config,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Line-oriented progress reporter bound to this context's output settings.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `APIARY_YES`
    /// env), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
