//! Typed domain error enums and the user-facing failure taxonomy.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! Port implementations return these enums directly wherever the
//! provisioning orchestrator must branch on the variant; everything it only
//! needs to report flows through `anyhow::Error`.

use std::path::PathBuf;

use thiserror::Error;

// ── Ledger errors ─────────────────────────────────────────────────────────────

/// Errors raised by credit ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u64, need: u64 },

    #[error("ledger file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ledger file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("ledger internal error: {0}")]
    Internal(String),
}

// ── Materializer errors ──────────────────────────────────────────────────────

/// Errors raised while materializing an instance directory from the template.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("template directory not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    #[error("instance '{0}' already exists")]
    InstanceExists(String),

    #[error(
        "invalid instance name '{0}': lowercase alphanumeric plus '-' and '_', \
         1-32 characters, no leading or trailing separator"
    )]
    InvalidName(String),

    #[error("copying template: {0}")]
    Io(#[from] std::io::Error),
}

// ── Validator errors ─────────────────────────────────────────────────────────

/// Terminal outcomes of the credential handshake.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// Malformed or rejected credential. Non-retriable; surfaced to the user
    /// distinctly from every other failure so they can retry with a
    /// corrected credential without losing credit.
    #[error("credential rejected: {0}")]
    Invalid(String),

    /// The gateway could not be reached or answered with a server-side
    /// failure. Reported as generic failure, never as an invalid credential.
    #[error("credential gateway unavailable: {0}")]
    Unavailable(String),
}

// ── Launcher errors ──────────────────────────────────────────────────────────

/// Errors raised while resolving a runtime and starting the instance process.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("runtime '{0}' not found")]
    RuntimeNotFound(String),

    #[error("instance entry point missing: {}", .0.display())]
    EntryMissing(PathBuf),

    #[error("spawning instance process: {0}")]
    Spawn(#[source] std::io::Error),
}

// ── Failure taxonomy ─────────────────────────────────────────────────────────

/// Reason tag attached to every failed provisioning outcome.
///
/// The orchestrator maps each error onto exactly one of these; `code()` is
/// the stable machine-readable form emitted in JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    InsufficientBalance,
    TemplateOrName,
    Io,
    InvalidCredential,
    ValidationUnavailable,
    RuntimeNotFound,
    Launch,
    DebitRaceLost,
    Unexpected,
}

impl FailureReason {
    /// Stable machine-readable code for JSON output and diagnostics.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::InsufficientBalance => "insufficient_balance",
            Self::TemplateOrName => "template_or_name",
            Self::Io => "io_failure",
            Self::InvalidCredential => "invalid_credential",
            Self::ValidationUnavailable => "validation_unavailable",
            Self::RuntimeNotFound => "runtime_not_found",
            Self::Launch => "launch_failed",
            Self::DebitRaceLost => "debit_race_lost",
            Self::Unexpected => "unexpected",
        }
    }
}
