//! Shared types for the festival ledger
//!
//! Domain models exchanged with callers, and the error envelope the ledger
//! errors convert into.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
