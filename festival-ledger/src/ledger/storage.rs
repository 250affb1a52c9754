//! redb-based storage layer for the festival ledger
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `festivals` | `id` | `Festival` | Festival registry |
//! | `tariff_zones` | `id` | `TariffZone` | Priced partitions |
//! | `plan_zones` | `id` | `PlanZone` | Floor-layout partitions |
//! | `reservations` | `id` | `Reservation` | Reservations |
//! | `zone_commitments` | `id` | `ZoneCommitment` | Tables committed per tariff zone |
//! | `game_instances` | `id` | `GameInstance` | Games and their placement |
//! | `invoices` | `id` | `Invoice` | Invoices |
//! | `system` | `&str` | `i64` | Id sequence, invoice counter, current festival |
//!
//! Values are JSON-serialized models.
//!
//! # Isolation
//!
//! redb runs one write transaction at a time and readers work on a committed
//! snapshot. Every ledger operation reads its totals, validates and writes
//! inside a single write transaction, so check-then-write sequences are
//! serializable. There is only one lock, so there is no acquisition order to
//! get wrong.
//!
//! # Durability
//!
//! Every write transaction is committed with `Durability::Immediate`: once
//! `commit()` returns the operation is on disk, and a crash leaves the file
//! at the last committed state.

use redb::{
    Database, Durability, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition,
    WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{
    Festival, GameInstance, Invoice, PlanZone, Reservation, TariffZone, ZoneCommitment,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const FESTIVALS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("festivals");
const TARIFF_ZONES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("tariff_zones");
const PLAN_ZONES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("plan_zones");
const RESERVATIONS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("reservations");
const COMMITMENTS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("zone_commitments");
const GAME_INSTANCES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("game_instances");
const INVOICES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("invoices");

/// Table for counters and singletons: key = name, value = i64
const SYSTEM_TABLE: TableDefinition<&str, i64> = TableDefinition::new("system");

const NEXT_ID_KEY: &str = "next_id";
pub(crate) const INVOICE_COUNT_KEY: &str = "invoice_count";
pub(crate) const CURRENT_FESTIVAL_KEY: &str = "current_festival";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A model stored in its own table, keyed by id
pub trait Record: Serialize + DeserializeOwned {
    const TABLE: TableDefinition<'static, i64, &'static [u8]>;

    fn id(&self) -> i64;
}

macro_rules! impl_record {
    ($model:ty, $table:expr) => {
        impl Record for $model {
            const TABLE: TableDefinition<'static, i64, &'static [u8]> = $table;

            fn id(&self) -> i64 {
                self.id
            }
        }
    };
}

impl_record!(Festival, FESTIVALS_TABLE);
impl_record!(TariffZone, TARIFF_ZONES_TABLE);
impl_record!(PlanZone, PLAN_ZONES_TABLE);
impl_record!(Reservation, RESERVATIONS_TABLE);
impl_record!(ZoneCommitment, COMMITMENTS_TABLE);
impl_record!(GameInstance, GAME_INSTANCES_TABLE);
impl_record!(Invoice, INVOICES_TABLE);

/// Read access shared by write transactions and read snapshots
pub trait RecordSource {
    fn get<R: Record>(&self, id: i64) -> StorageResult<Option<R>>;

    fn scan<R: Record>(&self) -> StorageResult<Vec<R>>;

    fn system_value(&self, key: &str) -> StorageResult<Option<i64>>;

    /// All records of a kind matching `keep`, in id order
    fn filter<R: Record>(&self, mut keep: impl FnMut(&R) -> bool) -> StorageResult<Vec<R>> {
        let mut records = self.scan::<R>()?;
        records.retain(|r| keep(r));
        Ok(records)
    }
}

fn load<R: Record>(
    table: &impl ReadableTable<i64, &'static [u8]>,
    id: i64,
) -> StorageResult<Option<R>> {
    match table.get(id)? {
        Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
        None => Ok(None),
    }
}

fn load_all<R: Record>(table: &impl ReadableTable<i64, &'static [u8]>) -> StorageResult<Vec<R>> {
    let mut records = Vec::new();
    for entry in table.iter()? {
        let (_, value) = entry?;
        records.push(serde_json::from_slice(value.value())?);
    }
    Ok(records)
}

/// An open write transaction
///
/// Created by [`LedgerStorage::write`]; commits only when the closure
/// returns `Ok`.
pub struct LedgerTxn {
    txn: WriteTransaction,
}

impl LedgerTxn {
    /// Insert or replace a record
    pub fn put<R: Record>(&self, record: &R) -> StorageResult<()> {
        let value = serde_json::to_vec(record)?;
        let mut table = self.txn.open_table(R::TABLE)?;
        table.insert(record.id(), value.as_slice())?;
        Ok(())
    }

    /// Remove a record, returning whether it existed
    pub fn remove<R: Record>(&self, id: i64) -> StorageResult<bool> {
        let mut table = self.txn.open_table(R::TABLE)?;
        let removed = table.remove(id)?.is_some();
        Ok(removed)
    }

    /// Allocate the next id from the global sequence
    pub fn next_id(&self) -> StorageResult<i64> {
        self.increment(NEXT_ID_KEY)
    }

    /// Increment a named counter and return its new value
    pub fn increment(&self, key: &str) -> StorageResult<i64> {
        let mut table = self.txn.open_table(SYSTEM_TABLE)?;
        let current = table.get(key)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(key, next)?;
        Ok(next)
    }

    pub fn set_system_value(&self, key: &str, value: i64) -> StorageResult<()> {
        let mut table = self.txn.open_table(SYSTEM_TABLE)?;
        table.insert(key, value)?;
        Ok(())
    }

    pub fn clear_system_value(&self, key: &str) -> StorageResult<()> {
        let mut table = self.txn.open_table(SYSTEM_TABLE)?;
        table.remove(key)?;
        Ok(())
    }
}

impl RecordSource for LedgerTxn {
    fn get<R: Record>(&self, id: i64) -> StorageResult<Option<R>> {
        let table = self.txn.open_table(R::TABLE)?;
        load(&table, id)
    }

    fn scan<R: Record>(&self) -> StorageResult<Vec<R>> {
        let table = self.txn.open_table(R::TABLE)?;
        load_all(&table)
    }

    fn system_value(&self, key: &str) -> StorageResult<Option<i64>> {
        let table = self.txn.open_table(SYSTEM_TABLE)?;
        Ok(table.get(key)?.map(|g| g.value()))
    }
}

/// A consistent read snapshot
pub struct LedgerView {
    txn: ReadTransaction,
}

impl RecordSource for LedgerView {
    fn get<R: Record>(&self, id: i64) -> StorageResult<Option<R>> {
        let table = self.txn.open_table(R::TABLE)?;
        load(&table, id)
    }

    fn scan<R: Record>(&self) -> StorageResult<Vec<R>> {
        let table = self.txn.open_table(R::TABLE)?;
        load_all(&table)
    }

    fn system_value(&self, key: &str) -> StorageResult<Option<i64>> {
        let table = self.txn.open_table(SYSTEM_TABLE)?;
        Ok(table.get(key)?.map(|g| g.value()))
    }
}

/// Durability of every ledger write transaction
const WRITE_DURABILITY: Durability = Durability::Immediate;

/// Ledger storage backed by redb
#[derive(Clone)]
pub struct LedgerStorage {
    db: Arc<Database>,
}

impl LedgerStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(FESTIVALS_TABLE)?;
            let _ = write_txn.open_table(TARIFF_ZONES_TABLE)?;
            let _ = write_txn.open_table(PLAN_ZONES_TABLE)?;
            let _ = write_txn.open_table(RESERVATIONS_TABLE)?;
            let _ = write_txn.open_table(COMMITMENTS_TABLE)?;
            let _ = write_txn.open_table(GAME_INSTANCES_TABLE)?;
            let _ = write_txn.open_table(INVOICES_TABLE)?;
            let _ = write_txn.open_table(SYSTEM_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Run `f` as one unit of work
    ///
    /// Commits when `f` returns `Ok`, aborts otherwise. Blocks while another
    /// write transaction is open.
    pub fn write<T, E>(&self, f: impl FnOnce(&LedgerTxn) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StorageError>,
    {
        let mut write_txn = self.db.begin_write().map_err(StorageError::from)?;
        // Immediate is always accepted; only `Durability::None` can be refused
        let _ = write_txn.set_durability(WRITE_DURABILITY);
        let txn = LedgerTxn { txn: write_txn };
        match f(&txn) {
            Ok(value) => {
                txn.txn.commit().map_err(StorageError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(abort_err) = txn.txn.abort() {
                    tracing::warn!(error = %abort_err, "Failed to abort write transaction");
                }
                Err(err)
            }
        }
    }

    /// Run `f` against a read snapshot
    pub fn read<T, E>(&self, f: impl FnOnce(&LedgerView) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StorageError>,
    {
        let view = LedgerView {
            txn: self.db.begin_read().map_err(StorageError::from)?,
        };
        f(&view)
    }
}
