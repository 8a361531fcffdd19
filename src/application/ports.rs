//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.
//!
//! Ledger, materializer, validator, and launcher operations return typed
//! domain errors because the provisioning orchestrator branches on their
//! variants; the config emitter only ever needs to be reported, so it stays
//! on `anyhow`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::error::{LaunchError, LedgerError, MaterializeError, ValidateError};
use crate::domain::instance::InstanceConfig;

// ── Value types ──────────────────────────────────────────────────────────────

/// Handle to a launched instance process.
///
/// Launch success means "process started" — liveness beyond the spawn is out
/// of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessHandle {
    pub pid: u32,
}

// ── Credit ledger port ───────────────────────────────────────────────────────

/// Durable tenant → credit balance mapping with conditional debit.
///
/// Balances never go negative; tenants come into existence at balance 0 on
/// first reference and are never deleted.
#[allow(async_fn_in_trait)]
pub trait CreditLedger {
    /// Current balance, 0 for an unknown tenant. No side effects.
    async fn balance(&self, tenant: &str) -> Result<u64, LedgerError>;

    /// Advisory reservation: true iff the balance is currently positive.
    ///
    /// The balance is read, not locked — `commit_debit` re-checks at commit
    /// time, so two concurrent requests can both pass this gate.
    async fn try_reserve(&self, tenant: &str) -> Result<bool, LedgerError>;

    /// Decrement the balance by `amount`, re-checking at commit time.
    ///
    /// # Errors
    ///
    /// `LedgerError::InsufficientBalance` if the balance no longer covers
    /// `amount` — the earlier advisory read is not trusted.
    async fn commit_debit(&self, tenant: &str, amount: u64) -> Result<u64, LedgerError>;

    /// Add `amount` to the balance, creating the tenant at 0 if unknown.
    async fn deposit(&self, tenant: &str, amount: u64) -> Result<u64, LedgerError>;
}

// ── Template materializer port ───────────────────────────────────────────────

/// Clones the template tree into per-instance directories.
#[allow(async_fn_in_trait)]
pub trait TemplateMaterializer {
    /// Materialize a fresh instance directory for `name` from the template.
    ///
    /// Uniqueness is enforced by directory-creation semantics: an existing
    /// directory is a hard failure, never a merge. On a copy failure the
    /// partially-built directory is removed before the error is returned.
    async fn create(&self, name: &str) -> Result<PathBuf, MaterializeError>;

    /// Recursively remove `dir`. Idempotent: an absent directory is Ok.
    async fn destroy(&self, dir: &Path) -> Result<()>;
}

// ── Configuration emitter port ───────────────────────────────────────────────

/// Serializes the instance configuration record into the instance directory.
#[allow(async_fn_in_trait)]
pub trait ConfigEmitter {
    /// Write `config` to the instance's configuration file, overwriting.
    async fn write(&self, dir: &Path, config: &InstanceConfig) -> Result<()>;
}

// ── Credential validator port ────────────────────────────────────────────────

/// Lightweight authenticate-then-release handshake against the external
/// service a credential belongs to. No lasting session is established.
#[allow(async_fn_in_trait)]
pub trait CredentialValidator {
    /// Check that `credential` is well-formed and currently valid.
    ///
    /// # Errors
    ///
    /// `ValidateError::Invalid` for a malformed or rejected credential,
    /// `ValidateError::Unavailable` for transport or gateway-side failures.
    async fn validate(&self, credential: &str) -> Result<(), ValidateError>;
}

// ── Instance launcher port ───────────────────────────────────────────────────

/// Resolves a named execution runtime and starts instances under it.
#[allow(async_fn_in_trait)]
pub trait InstanceLauncher {
    /// Start the instance entry point as a detached child process with the
    /// working directory set to `dir`.
    async fn start(&self, dir: &Path, runtime: &str) -> Result<ProcessHandle, LaunchError>;
}

// ── Progress reporting port ──────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
