//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod instance;

pub use config::{ApiaryConfig, GatewayConfig};
pub use error::{FailureReason, LaunchError, LedgerError, MaterializeError, ValidateError};
pub use instance::{
    CONFIG_FILE, DEFAULT_PREFIX, ENTRY_POINT, InstanceConfig, InstanceRequest, PlacementParams,
    validate_instance_name,
};
