//! Shared helpers: isolated-home command construction and fixtures.

#![allow(dead_code)]
#![allow(clippy::expect_used)]

use std::path::Path;

use assert_cmd::Command;

/// Build an `apiary` command against an isolated home directory.
pub fn apiary(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("apiary").expect("binary builds");
    cmd.env("APIARY_HOME", home);
    cmd
}

/// Seed a minimal template tree under `home`.
pub fn seed_template(home: &Path) {
    let template = home.join("template");
    std::fs::create_dir_all(template.join("data")).expect("mkdir template");
    std::fs::write(template.join("bot.py"), "print('ok')\n").expect("write bot.py");
    std::fs::write(template.join("data/seed.json"), "[]").expect("write seed");
}

/// Full argument list for `create`, placement fields included.
pub fn create_args(tenant: &str, name: &str) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "create".into(),
        "--tenant".into(),
        tenant.into(),
        "--name".into(),
        name.into(),
        "--runtime".into(),
        "py311".into(),
        "--token".into(),
        "tok.valid.credential".into(),
    ];
    for (flag, value) in [
        ("--access-role", "role-a"),
        ("--non-role", "role-b"),
        ("--sell-accounts-category", "cat-1"),
        ("--buy-accounts-category", "cat-2"),
        ("--middleman-category", "cat-3"),
        ("--profile-sell-category", "cat-4"),
        ("--profile-buy-category", "cat-5"),
        ("--mfa-category", "cat-6"),
        ("--coin-category", "cat-7"),
        ("--accounts-category", "cat-8"),
        ("--profiles-category", "cat-9"),
        ("--bedwars-category", "cat-10"),
        ("--ticket-logs-channel", "chan-1"),
        ("--coin-price-buy", "0.05"),
        ("--coin-price-sell", "0.04"),
        ("--membership-price", "9.99"),
        ("--membership-fee", "0.50"),
    ] {
        args.push(flag.into());
        args.push(value.into());
    }
    args
}
