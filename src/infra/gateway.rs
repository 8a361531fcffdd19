//! Infrastructure implementation of the `CredentialValidator` port.
//!
//! `GatewayValidator` performs a minimal authenticate-then-release
//! handshake: one authenticated identity request against the gateway, after
//! which the connection is dropped. No session survives the check.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;

use crate::application::ports::CredentialValidator;
use crate::domain::error::ValidateError;

/// HTTP credential validator with a bounded handshake timeout.
pub struct GatewayValidator {
    client: reqwest::Client,
    base_url: String,
}

impl GatewayValidator {
    /// Build a validator against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building gateway HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Reject credentials that cannot possibly be valid before any network I/O.
fn check_well_formed(credential: &str) -> Result<(), ValidateError> {
    if credential.is_empty() || credential.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidateError::Invalid(
            "credential is empty or contains whitespace".to_string(),
        ));
    }
    Ok(())
}

/// Map a gateway response status onto a handshake outcome.
///
/// 401/403 mean the credential itself was rejected; everything else that is
/// not a success is a gateway-side problem and must not be reported as an
/// invalid credential.
fn classify_status(status: StatusCode) -> Result<(), ValidateError> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ValidateError::Invalid(format!(
            "gateway rejected the credential (HTTP {status})"
        ))),
        _ => Err(ValidateError::Unavailable(format!(
            "gateway answered HTTP {status}"
        ))),
    }
}

impl CredentialValidator for GatewayValidator {
    async fn validate(&self, credential: &str) -> Result<(), ValidateError> {
        check_well_formed(credential)?;
        let url = format!("{}/users/@me", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bot {credential}"))
            .send()
            .await
            .map_err(|e| ValidateError::Unavailable(e.to_string()))?;
        classify_status(response.status())
    }
}
