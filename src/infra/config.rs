//! Configuration loading from `$APIARY_HOME/config.yaml`.

use anyhow::{Context, Result};

use crate::domain::config::ApiaryConfig;
use crate::infra::paths;

/// Load the configuration, falling back to defaults when the file is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load() -> Result<ApiaryConfig> {
    let path = paths::config_path()?;
    if !path.exists() {
        return Ok(ApiaryConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("parsing config file {}", path.display()))
}
