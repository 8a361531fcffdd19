//! Filesystem tests for `FsMaterializer` via the port trait.

#![allow(clippy::expect_used)]

use std::path::Path;

use apiary_cli::application::ports::TemplateMaterializer;
use apiary_cli::domain::error::MaterializeError;
use apiary_cli::infra::template::FsMaterializer;

fn seed_template(root: &Path) {
    std::fs::create_dir_all(root.join("data")).expect("mkdir");
    std::fs::write(root.join("bot.py"), "print('ok')\n").expect("write");
    std::fs::write(root.join("data/seed.json"), "[]").expect("write");
}

fn materializer_in(dir: &Path) -> FsMaterializer {
    FsMaterializer::new(dir.join("template"), dir.join("instances"))
}

#[tokio::test]
async fn create_clones_the_template_tree() {
    let tmp = tempfile::tempdir().expect("tempdir");
    seed_template(&tmp.path().join("template"));
    let materializer = materializer_in(tmp.path());

    let dir = materializer.create("fresh").await.expect("create");

    assert_eq!(dir, tmp.path().join("instances/fresh"));
    assert_eq!(
        std::fs::read_to_string(dir.join("bot.py")).expect("read"),
        "print('ok')\n"
    );
    assert!(dir.join("data/seed.json").is_file());
}

#[tokio::test]
async fn create_without_template_fails_cleanly() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let materializer = materializer_in(tmp.path());

    let err = materializer.create("fresh").await.expect_err("no template");
    assert!(matches!(err, MaterializeError::TemplateMissing(_)));
    assert!(!tmp.path().join("instances/fresh").exists());
}

#[tokio::test]
async fn create_collision_is_a_hard_failure() {
    let tmp = tempfile::tempdir().expect("tempdir");
    seed_template(&tmp.path().join("template"));
    let materializer = materializer_in(tmp.path());

    let existing = tmp.path().join("instances/taken");
    std::fs::create_dir_all(&existing).expect("mkdir");
    std::fs::write(existing.join("marker"), "live").expect("write");

    let err = materializer.create("taken").await.expect_err("collision");
    assert!(matches!(err, MaterializeError::InstanceExists(_)));
    // The live instance's content is untouched.
    assert_eq!(
        std::fs::read_to_string(existing.join("marker")).expect("read"),
        "live"
    );
}

#[tokio::test]
async fn create_rejects_invalid_names() {
    let tmp = tempfile::tempdir().expect("tempdir");
    seed_template(&tmp.path().join("template"));
    let materializer = materializer_in(tmp.path());

    let err = materializer
        .create("../escape")
        .await
        .expect_err("bad name");
    assert!(matches!(err, MaterializeError::InvalidName(_)));
}

#[tokio::test]
async fn destroy_is_idempotent() {
    let tmp = tempfile::tempdir().expect("tempdir");
    seed_template(&tmp.path().join("template"));
    let materializer = materializer_in(tmp.path());

    let dir = materializer.create("fresh").await.expect("create");
    materializer.destroy(&dir).await.expect("first destroy");
    assert!(!dir.exists());

    // Destroying an already-removed directory must not fail.
    materializer.destroy(&dir).await.expect("second destroy");
}
