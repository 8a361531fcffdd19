//! Application service — the provisioning transaction.
//!
//! Composes the ledger, materializer, emitter, validator, and launcher
//! ports into one sequential workflow:
//!
//! `Start → BalanceChecked → Materialized → Configured → Validated →
//! Launched → Committed`
//!
//! Every failure is absorbed here and mapped to a reason-tagged outcome —
//! nothing propagates past this boundary. Filesystem side effects are
//! rolled back for every failure after materialization, with one exception:
//! a debit that loses a concurrent re-check after the process has already
//! launched leaves both the process and its directory in place.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::{Path, PathBuf};

use crate::application::ports::{
    ConfigEmitter, CredentialValidator, CreditLedger, InstanceLauncher, ProgressReporter,
    TemplateMaterializer,
};
use crate::domain::error::{FailureReason, LaunchError, LedgerError, MaterializeError, ValidateError};
use crate::domain::instance::{InstanceConfig, InstanceRequest, validate_instance_name};

/// Cost of one provisioning, in credits.
pub const PROVISION_COST: u64 = 1;

/// Terminal result of one provisioning attempt.
#[derive(Debug)]
pub enum ProvisionOutcome {
    /// The instance is running and the debit is durable.
    Committed {
        instance_dir: PathBuf,
        pid: u32,
        remaining_balance: u64,
    },
    /// The attempt failed; `reason` is the stable taxonomy tag.
    Failed {
        reason: FailureReason,
        message: String,
    },
}

impl ProvisionOutcome {
    fn failed(reason: FailureReason, message: impl Into<String>) -> Self {
        Self::Failed {
            reason,
            message: message.into(),
        }
    }
}

/// Run the provisioning transaction for `request`.
///
/// Never returns `Err`: every failure, including unexpected ones from the
/// injected ports, is mapped onto a [`ProvisionOutcome::Failed`] so the
/// front end always receives a tagged result.
pub async fn provision_instance(
    ledger: &impl CreditLedger,
    materializer: &impl TemplateMaterializer,
    emitter: &impl ConfigEmitter,
    validator: &impl CredentialValidator,
    launcher: &impl InstanceLauncher,
    reporter: &impl ProgressReporter,
    request: &InstanceRequest,
) -> ProvisionOutcome {
    // Cheapest gate first; nothing exists yet, so failures need no cleanup.
    if let Err(e) = validate_instance_name(&request.name) {
        return ProvisionOutcome::failed(FailureReason::TemplateOrName, e.to_string());
    }

    // Start → BalanceChecked. Advisory read only; the debit re-checks later.
    reporter.step("checking credit balance...");
    match ledger.try_reserve(&request.tenant_id).await {
        Ok(true) => {}
        Ok(false) => {
            return ProvisionOutcome::failed(
                FailureReason::InsufficientBalance,
                format!("tenant '{}' has no credits left", request.tenant_id),
            );
        }
        Err(e) => return ProvisionOutcome::failed(FailureReason::Unexpected, e.to_string()),
    }

    // BalanceChecked → Materialized. `create` leaves no residue on its own
    // failure, so no rollback applies to this step.
    reporter.step("materializing instance from template...");
    let instance_dir = match materializer.create(&request.name).await {
        Ok(dir) => dir,
        Err(e @ MaterializeError::Io(_)) => {
            return ProvisionOutcome::failed(FailureReason::Io, e.to_string());
        }
        Err(e) => {
            return ProvisionOutcome::failed(FailureReason::TemplateOrName, e.to_string());
        }
    };

    // Materialized → Configured.
    reporter.step("writing instance configuration...");
    let config = InstanceConfig::from_request(request);
    if let Err(e) = emitter.write(&instance_dir, &config).await {
        roll_back(materializer, reporter, &instance_dir).await;
        return ProvisionOutcome::failed(FailureReason::Io, format!("writing configuration: {e}"));
    }

    // Configured → Validated. Both failure variants are terminal for this
    // attempt; only the user-facing classification differs.
    reporter.step("validating credential with gateway...");
    match validator.validate(&request.credential).await {
        Ok(()) => {}
        Err(e @ ValidateError::Invalid(_)) => {
            roll_back(materializer, reporter, &instance_dir).await;
            return ProvisionOutcome::failed(FailureReason::InvalidCredential, e.to_string());
        }
        Err(e @ ValidateError::Unavailable(_)) => {
            roll_back(materializer, reporter, &instance_dir).await;
            return ProvisionOutcome::failed(FailureReason::ValidationUnavailable, e.to_string());
        }
    }

    // Validated → Launched.
    reporter.step("launching instance process...");
    let handle = match launcher.start(&instance_dir, &request.runtime).await {
        Ok(handle) => handle,
        Err(e @ LaunchError::RuntimeNotFound(_)) => {
            roll_back(materializer, reporter, &instance_dir).await;
            return ProvisionOutcome::failed(FailureReason::RuntimeNotFound, e.to_string());
        }
        Err(e) => {
            roll_back(materializer, reporter, &instance_dir).await;
            return ProvisionOutcome::failed(FailureReason::Launch, e.to_string());
        }
    };

    // Launched → Committed. The debit re-checks the balance; losing the race
    // here leaves the already-running process and its directory untouched —
    // only the debit is refused.
    reporter.step("committing credit debit...");
    match ledger.commit_debit(&request.tenant_id, PROVISION_COST).await {
        Ok(remaining) => {
            reporter.success(&format!(
                "instance '{}' running (pid {})",
                request.name, handle.pid
            ));
            ProvisionOutcome::Committed {
                instance_dir,
                pid: handle.pid,
                remaining_balance: remaining,
            }
        }
        Err(e @ LedgerError::InsufficientBalance { .. }) => ProvisionOutcome::failed(
            FailureReason::DebitRaceLost,
            format!(
                "instance launched (pid {}) but the debit lost a concurrent re-check: {e}",
                handle.pid
            ),
        ),
        Err(e) => ProvisionOutcome::failed(
            FailureReason::Unexpected,
            format!(
                "instance launched (pid {}) but the debit could not be recorded: {e}",
                handle.pid
            ),
        ),
    }
}

/// Best-effort rollback: destroy the instance directory, reporting a
/// cleanup failure without letting it mask the original failure reason.
async fn roll_back(
    materializer: &impl TemplateMaterializer,
    reporter: &impl ProgressReporter,
    dir: &Path,
) {
    if let Err(e) = materializer.destroy(dir).await {
        reporter.warn(&format!("rollback of {} failed: {e}", dir.display()));
    }
}
