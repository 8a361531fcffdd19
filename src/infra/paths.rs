//! Local filesystem layout under the apiary home directory.
//!
//! Everything this tool persists lives under one root: the ledger, the
//! template tree, provisioned instances, and named runtimes. `APIARY_HOME`
//! overrides the default `~/.apiary` (test isolation and packaging).

use std::path::PathBuf;

use anyhow::Result;

/// Environment variable overriding the default home location.
pub const HOME_ENV: &str = "APIARY_HOME";

/// Resolve the apiary home directory.
///
/// # Errors
///
/// Returns an error if `APIARY_HOME` is unset and the user's home directory
/// cannot be determined.
pub fn apiary_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(".apiary"))
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))
}

/// Template tree cloned for every new instance.
pub fn template_dir() -> Result<PathBuf> {
    Ok(apiary_home()?.join("template"))
}

/// Root under which instance directories are materialized.
pub fn instances_dir() -> Result<PathBuf> {
    Ok(apiary_home()?.join("instances"))
}

/// Root of named, pre-provisioned execution runtimes.
pub fn runtimes_dir() -> Result<PathBuf> {
    Ok(apiary_home()?.join("runtimes"))
}

/// Credit ledger file.
pub fn ledger_path() -> Result<PathBuf> {
    Ok(apiary_home()?.join("ledger.json"))
}

/// Configuration file.
pub fn config_path() -> Result<PathBuf> {
    Ok(apiary_home()?.join("config.yaml"))
}
