//! Infrastructure implementation of the `ConfigEmitter` port.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::ConfigEmitter;
use crate::domain::instance::{CONFIG_FILE, InstanceConfig};

/// Writes `config.json` into the instance directory, overwriting.
pub struct JsonConfigEmitter;

impl ConfigEmitter for JsonConfigEmitter {
    async fn write(&self, dir: &Path, config: &InstanceConfig) -> Result<()> {
        let path = dir.join(CONFIG_FILE);
        let content =
            serde_json::to_string_pretty(config).context("serializing instance config")?;
        let target = path.clone();
        tokio::task::spawn_blocking(move || std::fs::write(&target, content))
            .await
            .context("config write task panicked")?
            .with_context(|| format!("writing {}", path.display()))
    }
}
