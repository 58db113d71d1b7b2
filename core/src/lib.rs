//! Core functionality for 1install: backend integrations, federated
//! search, shims, configuration, and diagnostics. The `1i` CLI is a thin
//! layer over this crate.

pub mod backends;
pub mod config;
pub mod context;
pub mod doctor;
pub mod error;
pub mod integrity;
pub mod ops;
pub mod search;
pub mod shims;
pub mod telemetry;

pub use error::Error;
pub use error::Result;
