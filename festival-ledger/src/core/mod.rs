//! Core module: runtime configuration
//!
//! - [`Config`] - ledger configuration loaded from the environment

pub mod config;

pub use config::Config;
