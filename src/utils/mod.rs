//! Utilities Module
//!
//! Common utilities used across the crate.

pub mod crypto;
pub mod logging;
pub mod run_config;

pub use crypto::*;
pub use run_config::{ExtendedKeyFormat, RunConfig};
