//! Festival capacity ledger
//!
//! - **festivals**: festival registry and the current-festival pointer
//! - **tariff**: priced zones and the tables committed against them
//! - **budget**: per-reservation table budget and consumption
//! - **reservations**: reservation and game-instance lifecycle
//! - **plan**: floor-plan zones and their occupancy
//! - **placement**: placing game instances in plan zones
//! - **invoicing**: invoice computation, numbering and payment status
//! - **storage**: redb persistence, one write transaction per operation
//!
//! # Architecture
//!
//! ```text
//! FestivalLedger ─┬─ FestivalRegistry ─────────┐
//!                 ├─ TariffZoneLedger          │
//!                 ├─ ReservationBook           │
//!                 ├─ ReservationBudgetTracker  ├─→ LedgerStorage (redb)
//!                 ├─ PlanZoneLedger            │
//!                 ├─ PlacementEngine           │
//!                 └─ InvoiceCalculator ────────┘
//! ```
//!
//! Every component is a cheap handle over the same [`LedgerStorage`]. Each
//! mutating call reads the totals it needs, validates, and writes inside one
//! redb write transaction: a rejected call writes nothing.

pub mod budget;
pub mod error;
pub mod festivals;
pub mod invoicing;
mod lookup;
pub mod money;
pub mod placement;
pub mod plan;
pub mod reservations;
pub mod storage;
pub mod tariff;

#[cfg(test)]
mod tests;

pub use budget::ReservationBudgetTracker;
pub use error::{LedgerError, LedgerResult};
pub use festivals::FestivalRegistry;
pub use invoicing::{InvoiceCalculator, InvoiceDraft, compute};
pub use placement::PlacementEngine;
pub use plan::PlanZoneLedger;
pub use reservations::ReservationBook;
pub use storage::{LedgerStorage, StorageError, StorageResult};
pub use tariff::TariffZoneLedger;

use crate::core::Config;
use anyhow::Context;
use std::path::Path;

/// Entry point to the ledger components
#[derive(Clone)]
pub struct FestivalLedger {
    storage: LedgerStorage,
}

impl FestivalLedger {
    /// Open or create the ledger database at `path`
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        Ok(Self::with_storage(LedgerStorage::open(path)?))
    }

    /// Ledger backed by an in-memory database, for tests and dry runs
    pub fn open_in_memory() -> LedgerResult<Self> {
        Ok(Self::with_storage(LedgerStorage::open_in_memory()?))
    }

    /// Open the database configured in `config`, creating the work directory
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .with_context(|| format!("Failed to create work dir {}", config.work_dir))?;

        let path = config.database_path();
        let ledger = Self::open(&path)
            .with_context(|| format!("Failed to open ledger at {}", path.display()))?;

        tracing::info!(path = %path.display(), "Ledger opened");
        Ok(ledger)
    }

    pub fn with_storage(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &LedgerStorage {
        &self.storage
    }

    pub fn festivals(&self) -> FestivalRegistry {
        FestivalRegistry::new(self.storage.clone())
    }

    pub fn tariff_zones(&self) -> TariffZoneLedger {
        TariffZoneLedger::new(self.storage.clone())
    }

    pub fn reservations(&self) -> ReservationBook {
        ReservationBook::new(self.storage.clone())
    }

    pub fn budgets(&self) -> ReservationBudgetTracker {
        ReservationBudgetTracker::new(self.storage.clone())
    }

    pub fn plan_zones(&self) -> PlanZoneLedger {
        PlanZoneLedger::new(self.storage.clone())
    }

    pub fn placement(&self) -> PlacementEngine {
        PlacementEngine::new(self.storage.clone())
    }

    pub fn invoices(&self) -> InvoiceCalculator {
        InvoiceCalculator::new(self.storage.clone())
    }
}
