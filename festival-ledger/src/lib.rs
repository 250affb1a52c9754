//! Festival Ledger - table capacity allocation and billing for board-game festivals
//!
//! # Module structure
//!
//! ```text
//! festival-ledger/src/
//! ├── core/          # Configuration
//! ├── ledger/        # Zones, reservations, placement, invoices (redb)
//! └── utils/         # Logging, input validation
//! ```
//!
//! # Example
//!
//! ```ignore
//! use festival_ledger::FestivalLedger;
//! use shared::models::{FestivalCreate, TariffZoneCreate};
//!
//! let ledger = FestivalLedger::open_in_memory()?;
//! let festival = ledger.festivals().create(FestivalCreate::new("FJA", 100))?;
//! ledger
//!     .tariff_zones()
//!     .create_zone(festival.id, TariffZoneCreate::new("A", 60, 20.into()))?;
//! ```

pub mod core;
pub mod ledger;
pub mod utils;

pub use core::Config;
pub use ledger::{FestivalLedger, LedgerError, LedgerResult};
pub use utils::{init_logger, init_logger_with_file};
