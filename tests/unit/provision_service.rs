//! Unit tests for the provisioning orchestrator.
//!
//! Coverage follows the transaction's documented properties: early exit
//! before any side effect, rollback completeness for every post-create
//! failure, credit conservation, and the advisory-reservation debit race.

#![allow(clippy::expect_used)]

use apiary_cli::application::services::provision::{ProvisionOutcome, provision_instance};
use apiary_cli::domain::error::FailureReason;
use apiary_cli::domain::instance::InstanceRequest;

use crate::helpers::request;
use crate::mocks::{
    CreateBehavior, MemoryLedger, NoopReporter, RecordingEmitter, RecordingMaterializer,
    StubLauncher, StubValidator,
};

async fn run(
    ledger: &MemoryLedger,
    materializer: &RecordingMaterializer,
    emitter: &RecordingEmitter,
    validator: &StubValidator,
    launcher: &StubLauncher,
    req: &InstanceRequest,
) -> ProvisionOutcome {
    provision_instance(
        ledger,
        materializer,
        emitter,
        validator,
        launcher,
        &NoopReporter,
        req,
    )
    .await
}

fn failure_reason(outcome: &ProvisionOutcome) -> FailureReason {
    match outcome {
        ProvisionOutcome::Failed { reason, .. } => *reason,
        ProvisionOutcome::Committed { .. } => panic!("expected failure, got commit"),
    }
}

// ── Scenario A: happy path ───────────────────────────────────────────────────

#[tokio::test]
async fn scenario_a_success_commits_and_debits() {
    let ledger = MemoryLedger::new(&[("t1", 1)]);
    let materializer = RecordingMaterializer::succeeding();
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::valid();
    let launcher = StubLauncher::succeeding(4242);

    let outcome = run(
        &ledger,
        &materializer,
        &emitter,
        &validator,
        &launcher,
        &request("t1", "market-bot"),
    )
    .await;

    match outcome {
        ProvisionOutcome::Committed {
            pid,
            remaining_balance,
            ..
        } => {
            assert_eq!(pid, 4242);
            assert_eq!(remaining_balance, 0);
        }
        ProvisionOutcome::Failed { reason, message } => {
            panic!("expected commit, got {reason:?}: {message}")
        }
    }

    assert_eq!(materializer.created_names(), vec!["market-bot".to_string()]);
    assert!(materializer.destroyed_dirs().is_empty());
    assert_eq!(ledger.balance_of("t1"), 0);

    let config = emitter.last_config().expect("config written");
    assert_eq!(config.owner_id, "t1");
    assert_eq!(config.token, "tok.valid.credential");
    assert_eq!(config.prefix, "!");
    assert_eq!(config.coin_price_buy, "0.05");
}

// ── Scenario B: zero balance ─────────────────────────────────────────────────

#[tokio::test]
async fn scenario_b_zero_balance_creates_nothing() {
    let ledger = MemoryLedger::new(&[("t1", 0)]);
    let materializer = RecordingMaterializer::succeeding();
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::valid();
    let launcher = StubLauncher::succeeding(1);

    let outcome = run(
        &ledger,
        &materializer,
        &emitter,
        &validator,
        &launcher,
        &request("t1", "market-bot"),
    )
    .await;

    assert_eq!(failure_reason(&outcome), FailureReason::InsufficientBalance);
    assert!(materializer.created_names().is_empty());
    assert!(emitter.last_config().is_none());
    assert_eq!(launcher.start_count(), 0);
}

#[tokio::test]
async fn unknown_tenant_is_treated_as_zero_balance() {
    let ledger = MemoryLedger::new(&[]);
    let materializer = RecordingMaterializer::succeeding();
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::valid();
    let launcher = StubLauncher::succeeding(1);

    let outcome = run(
        &ledger,
        &materializer,
        &emitter,
        &validator,
        &launcher,
        &request("nobody", "market-bot"),
    )
    .await;

    assert_eq!(failure_reason(&outcome), FailureReason::InsufficientBalance);
    assert!(materializer.created_names().is_empty());
}

// ── Scenario C: invalid credential ───────────────────────────────────────────

#[tokio::test]
async fn scenario_c_invalid_credential_rolls_back_and_keeps_balance() {
    let ledger = MemoryLedger::new(&[("t1", 1)]);
    let materializer = RecordingMaterializer::succeeding();
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::invalid();
    let launcher = StubLauncher::succeeding(1);

    let outcome = run(
        &ledger,
        &materializer,
        &emitter,
        &validator,
        &launcher,
        &request("t1", "market-bot"),
    )
    .await;

    assert_eq!(failure_reason(&outcome), FailureReason::InvalidCredential);
    // Rollback removed exactly the directory that was created.
    assert_eq!(materializer.destroyed_dirs().len(), 1);
    assert_eq!(launcher.start_count(), 0);
    assert_eq!(ledger.balance_of("t1"), 1);
}

#[tokio::test]
async fn gateway_outage_is_not_reported_as_invalid_credential() {
    let ledger = MemoryLedger::new(&[("t1", 1)]);
    let materializer = RecordingMaterializer::succeeding();
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::unavailable();
    let launcher = StubLauncher::succeeding(1);

    let outcome = run(
        &ledger,
        &materializer,
        &emitter,
        &validator,
        &launcher,
        &request("t1", "market-bot"),
    )
    .await;

    assert_eq!(
        failure_reason(&outcome),
        FailureReason::ValidationUnavailable
    );
    assert_eq!(materializer.destroyed_dirs().len(), 1);
    assert_eq!(ledger.balance_of("t1"), 1);
}

// ── Scenario D: name collision ───────────────────────────────────────────────

#[tokio::test]
async fn scenario_d_name_collision_leaves_existing_instance_alone() {
    let ledger = MemoryLedger::new(&[("t1", 1)]);
    let materializer = RecordingMaterializer::with_behavior(CreateBehavior::InstanceExists);
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::valid();
    let launcher = StubLauncher::succeeding(1);

    let outcome = run(
        &ledger,
        &materializer,
        &emitter,
        &validator,
        &launcher,
        &request("t1", "taken"),
    )
    .await;

    assert_eq!(failure_reason(&outcome), FailureReason::TemplateOrName);
    // No rollback: the colliding directory belongs to the live instance.
    assert!(materializer.destroyed_dirs().is_empty());
    assert_eq!(ledger.balance_of("t1"), 1);
}

#[tokio::test]
async fn copy_io_failure_maps_to_io_without_rollback() {
    // `create` removes its own half-built directory, so the orchestrator has
    // nothing to roll back.
    let ledger = MemoryLedger::new(&[("t1", 1)]);
    let materializer = RecordingMaterializer::with_behavior(CreateBehavior::IoError);
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::valid();
    let launcher = StubLauncher::succeeding(1);

    let outcome = run(
        &ledger,
        &materializer,
        &emitter,
        &validator,
        &launcher,
        &request("t1", "market-bot"),
    )
    .await;

    assert_eq!(failure_reason(&outcome), FailureReason::Io);
    assert!(materializer.destroyed_dirs().is_empty());
    assert_eq!(ledger.balance_of("t1"), 1);
}

#[tokio::test]
async fn missing_template_fails_without_rollback() {
    let ledger = MemoryLedger::new(&[("t1", 1)]);
    let materializer = RecordingMaterializer::with_behavior(CreateBehavior::TemplateMissing);
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::valid();
    let launcher = StubLauncher::succeeding(1);

    let outcome = run(
        &ledger,
        &materializer,
        &emitter,
        &validator,
        &launcher,
        &request("t1", "market-bot"),
    )
    .await;

    assert_eq!(failure_reason(&outcome), FailureReason::TemplateOrName);
    assert!(materializer.destroyed_dirs().is_empty());
    assert_eq!(ledger.balance_of("t1"), 1);
}

// ── Scenario E: debit race under advisory reservation ────────────────────────

#[tokio::test]
async fn scenario_e_concurrent_requests_with_one_credit() {
    // Both requests see the same stale advisory read of 1 credit; the
    // conditional debit lets exactly one commit through.
    let ledger = MemoryLedger::new(&[("t1", 1)]).with_stale_read(1);
    let materializer = RecordingMaterializer::succeeding();
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::valid();
    let launcher = StubLauncher::succeeding(100);

    let first = request("t1", "alpha");
    let second = request("t1", "beta");
    let (a, b) = tokio::join!(
        run(&ledger, &materializer, &emitter, &validator, &launcher, &first),
        run(&ledger, &materializer, &emitter, &validator, &launcher, &second),
    );

    let outcomes = [a, b];
    let committed = outcomes
        .iter()
        .filter(|o| matches!(o, ProvisionOutcome::Committed { .. }))
        .count();
    let raced = outcomes
        .iter()
        .filter(|o| {
            matches!(
                o,
                ProvisionOutcome::Failed {
                    reason: FailureReason::DebitRaceLost,
                    ..
                }
            )
        })
        .count();

    assert_eq!(committed, 1, "exactly one request wins the debit");
    assert_eq!(raced, 1, "the loser is tagged as a lost debit race");
    assert_eq!(ledger.balance_of("t1"), 0);
    // Both processes launched; neither directory was rolled back.
    assert_eq!(launcher.start_count(), 2);
    assert!(materializer.destroyed_dirs().is_empty());
}

// ── Rollback completeness ────────────────────────────────────────────────────

#[tokio::test]
async fn emitter_failure_rolls_back_the_directory() {
    let ledger = MemoryLedger::new(&[("t1", 1)]);
    let materializer = RecordingMaterializer::succeeding();
    let emitter = RecordingEmitter::failing();
    let validator = StubValidator::valid();
    let launcher = StubLauncher::succeeding(1);

    let outcome = run(
        &ledger,
        &materializer,
        &emitter,
        &validator,
        &launcher,
        &request("t1", "market-bot"),
    )
    .await;

    assert_eq!(failure_reason(&outcome), FailureReason::Io);
    assert_eq!(materializer.destroyed_dirs().len(), 1);
    assert_eq!(ledger.balance_of("t1"), 1);
}

#[tokio::test]
async fn runtime_not_found_rolls_back_the_directory() {
    let ledger = MemoryLedger::new(&[("t1", 1)]);
    let materializer = RecordingMaterializer::succeeding();
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::valid();
    let launcher = StubLauncher::runtime_not_found();

    let outcome = run(
        &ledger,
        &materializer,
        &emitter,
        &validator,
        &launcher,
        &request("t1", "market-bot"),
    )
    .await;

    assert_eq!(failure_reason(&outcome), FailureReason::RuntimeNotFound);
    assert_eq!(materializer.destroyed_dirs().len(), 1);
    assert_eq!(ledger.balance_of("t1"), 1);
}

#[tokio::test]
async fn spawn_failure_rolls_back_the_directory() {
    let ledger = MemoryLedger::new(&[("t1", 1)]);
    let materializer = RecordingMaterializer::succeeding();
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::valid();
    let launcher = StubLauncher::failing_spawn();

    let outcome = run(
        &ledger,
        &materializer,
        &emitter,
        &validator,
        &launcher,
        &request("t1", "market-bot"),
    )
    .await;

    assert_eq!(failure_reason(&outcome), FailureReason::Launch);
    assert_eq!(materializer.destroyed_dirs().len(), 1);
    assert_eq!(ledger.balance_of("t1"), 1);
}

#[tokio::test]
async fn rollback_failure_does_not_mask_the_original_reason() {
    let ledger = MemoryLedger::new(&[("t1", 1)]);
    let materializer = RecordingMaterializer::succeeding().failing_destroy();
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::invalid();
    let launcher = StubLauncher::succeeding(1);

    let outcome = run(
        &ledger,
        &materializer,
        &emitter,
        &validator,
        &launcher,
        &request("t1", "market-bot"),
    )
    .await;

    assert_eq!(failure_reason(&outcome), FailureReason::InvalidCredential);
}

// ── Commit-time ledger failures ──────────────────────────────────────────────

#[tokio::test]
async fn commit_io_failure_keeps_the_launched_instance() {
    let ledger = MemoryLedger::new(&[("t1", 1)]).failing_commit();
    let materializer = RecordingMaterializer::succeeding();
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::valid();
    let launcher = StubLauncher::succeeding(7);

    let outcome = run(
        &ledger,
        &materializer,
        &emitter,
        &validator,
        &launcher,
        &request("t1", "market-bot"),
    )
    .await;

    assert_eq!(failure_reason(&outcome), FailureReason::Unexpected);
    // The process already launched, so the filesystem is left in place.
    assert!(materializer.destroyed_dirs().is_empty());
    assert_eq!(launcher.start_count(), 1);
}

// ── Input validation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn invalid_name_is_rejected_before_any_side_effect() {
    let ledger = MemoryLedger::new(&[("t1", 1)]);
    let materializer = RecordingMaterializer::succeeding();
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::valid();
    let launcher = StubLauncher::succeeding(1);

    let outcome = run(
        &ledger,
        &materializer,
        &emitter,
        &validator,
        &launcher,
        &request("t1", "../escape"),
    )
    .await;

    assert_eq!(failure_reason(&outcome), FailureReason::TemplateOrName);
    assert!(materializer.created_names().is_empty());
    assert!(materializer.destroyed_dirs().is_empty());
    assert_eq!(ledger.balance_of("t1"), 1);
}

// ── Credit conservation ──────────────────────────────────────────────────────

#[tokio::test]
async fn k_successful_runs_debit_exactly_k_credits() {
    let ledger = MemoryLedger::new(&[("t1", 3)]);
    let emitter = RecordingEmitter::default();
    let validator = StubValidator::valid();
    let launcher = StubLauncher::succeeding(1);

    for name in ["bot-a", "bot-b"] {
        let materializer = RecordingMaterializer::succeeding();
        let outcome = run(
            &ledger,
            &materializer,
            &emitter,
            &validator,
            &launcher,
            &request("t1", name),
        )
        .await;
        assert!(matches!(outcome, ProvisionOutcome::Committed { .. }));
    }

    assert_eq!(ledger.balance_of("t1"), 1);
}
