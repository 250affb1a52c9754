//! Unified error system for the festival ledger
//!
//! - [`ErrorCode`]: Standardized error codes for all error kinds
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Error envelope with code, message and structured details
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::ZoneInUse, "Zone 3 has commitments")
//!     .with_detail("zone_id", 3);
//!
//! assert_eq!(err.code.code(), 2002);
//! assert_eq!(err.detail("zone_id"), Some(&serde_json::json!(3)));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::AppError;
