//! Domain types for Apiary configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `$APIARY_HOME/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApiaryConfig {
    /// Credential gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Credential gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL the credential handshake talks to.
    #[serde(default = "default_gateway_url")]
    pub url: String,
    /// Bounded wait for the handshake, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_gateway_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}
