//! Instance domain types and pure validation functions.
//!
//! This module is intentionally free of I/O, async, and external layer
//! imports. All functions take data in and return data out.

use serde::{Deserialize, Serialize};

use crate::domain::error::MaterializeError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Configuration file written into every instance directory. The file name
/// and its field set are the compatibility surface read by the bot process.
pub const CONFIG_FILE: &str = "config.json";

/// Entry point the launcher starts inside the instance directory.
pub const ENTRY_POINT: &str = "bot.py";

/// Command prefix every new instance starts with.
pub const DEFAULT_PREFIX: &str = "!";

// ── Request types ────────────────────────────────────────────────────────────

/// A fully-validated provisioning request.
///
/// Constructed by the front end before the orchestrator is invoked; the
/// orchestrator never inspects a loosely-typed bag of fields. Transient —
/// consumed entirely within one orchestration call, never persisted.
#[derive(Debug, Clone)]
pub struct InstanceRequest {
    /// Tenant whose credit balance pays for the instance.
    pub tenant_id: String,
    /// Instance name, unique among provisioned instances.
    pub name: String,
    /// Named runtime the instance process runs under.
    pub runtime: String,
    /// Gateway credential, validated before launch.
    pub credential: String,
    /// Placement parameters copied into the instance configuration.
    pub placement: PlacementParams,
}

/// Placement parameters supplied by the caller.
///
/// The reference tokens are opaque to this tool; only the bot process
/// assigns them meaning.
#[derive(Debug, Clone, Default)]
pub struct PlacementParams {
    pub access_role: String,
    pub non_role: String,
    pub sell_accounts_category: String,
    pub buy_accounts_category: String,
    pub middleman_category: String,
    pub profile_sell_category: String,
    pub profile_buy_category: String,
    pub mfa_category: String,
    pub coin_category: String,
    pub accounts_category: String,
    pub profiles_category: String,
    pub bedwars_category: String,
    pub ticket_logs_channel: String,
    pub coin_price_buy: String,
    pub coin_price_sell: String,
    pub allow_membership: bool,
    pub membership_price: String,
    pub membership_fee: String,
}

// ── Instance configuration ───────────────────────────────────────────────────

/// The record serialized to [`CONFIG_FILE`] inside the instance directory.
///
/// Field names are fixed: the bot process deserializes them by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    pub access_role: String,
    pub non_role: String,
    pub sell_accounts_category: String,
    pub buy_accounts_category: String,
    pub middleman_category: String,
    pub profile_sell_category: String,
    pub profile_buy_category: String,
    pub mfa_category: String,
    pub coin_category: String,
    pub accounts_category: String,
    pub profiles_category: String,
    pub bedwars_category: String,
    pub ticket_logs_channel: String,
    pub coin_price_buy: String,
    pub coin_price_sell: String,
    pub allow_membership: bool,
    pub membership_price: String,
    pub membership_fee: String,
    pub token: String,
    pub prefix: String,
    pub owner_id: String,
}

impl InstanceConfig {
    /// Build the configuration record for a request.
    #[must_use]
    pub fn from_request(request: &InstanceRequest) -> Self {
        let p = &request.placement;
        Self {
            access_role: p.access_role.clone(),
            non_role: p.non_role.clone(),
            sell_accounts_category: p.sell_accounts_category.clone(),
            buy_accounts_category: p.buy_accounts_category.clone(),
            middleman_category: p.middleman_category.clone(),
            profile_sell_category: p.profile_sell_category.clone(),
            profile_buy_category: p.profile_buy_category.clone(),
            mfa_category: p.mfa_category.clone(),
            coin_category: p.coin_category.clone(),
            accounts_category: p.accounts_category.clone(),
            profiles_category: p.profiles_category.clone(),
            bedwars_category: p.bedwars_category.clone(),
            ticket_logs_channel: p.ticket_logs_channel.clone(),
            coin_price_buy: p.coin_price_buy.clone(),
            coin_price_sell: p.coin_price_sell.clone(),
            allow_membership: p.allow_membership,
            membership_price: p.membership_price.clone(),
            membership_fee: p.membership_fee.clone(),
            token: request.credential.clone(),
            prefix: DEFAULT_PREFIX.to_string(),
            owner_id: request.tenant_id.clone(),
        }
    }
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Validate an instance name.
///
/// Names double as directory names under the instances root, so anything
/// that could escape that namespace (separators, dots, uppercase drift
/// between filesystems) is rejected before any side effect happens.
///
/// # Errors
///
/// Returns `MaterializeError::InvalidName` if the name is empty, longer than
/// 32 characters, contains anything outside `[a-z0-9_-]`, or starts/ends
/// with a separator.
pub fn validate_instance_name(name: &str) -> Result<(), MaterializeError> {
    let bytes = name.as_bytes();
    let edge_ok = |b: &u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    let valid = !name.is_empty()
        && name.len() <= 32
        && bytes.first().is_some_and(edge_ok)
        && bytes.last().is_some_and(edge_ok)
        && bytes.iter().all(|b| edge_ok(b) || *b == b'-' || *b == b'_');
    if valid {
        Ok(())
    } else {
        Err(MaterializeError::InvalidName(name.to_string()))
    }
}
