//! Data models
//!
//! All IDs are `i64` taken from the ledger's single id sequence.
//! Table counts are `u32`, money is `Decimal`.

pub mod festival;
pub mod game_instance;
pub mod invoice;
pub mod plan_zone;
pub mod reservation;
pub mod tariff_zone;

// Re-exports
pub use festival::*;
pub use game_instance::*;
pub use invoice::*;
pub use plan_zone::*;
pub use reservation::*;
pub use tariff_zone::*;
