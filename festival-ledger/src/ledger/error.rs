//! Ledger error types

use super::storage::StorageError;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Ledger operation errors
///
/// Every capacity violation is detected before anything is written and
/// carries the totals that caused it.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),

    #[error("Festival not found: {0}")]
    NoSuchFestival(i64),

    #[error(
        "Festival {festival_id} capacity exceeded: {allocated} of {capacity} tables allocated, {requested} requested"
    )]
    CapacityExceeded {
        festival_id: i64,
        capacity: u64,
        allocated: u64,
        requested: u64,
    },

    #[error("A {kind} named {name:?} already exists")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Zone not found: {0}")]
    NoSuchZone(i64),

    #[error("Zone {zone_id} is in use by {references} record(s) holding {tables_in_use} tables")]
    ZoneInUse {
        zone_id: i64,
        references: usize,
        tables_in_use: u64,
    },

    #[error("Zone {zone_id} has {available} tables available, {requested} requested")]
    InsufficientCapacity {
        zone_id: i64,
        available: u64,
        requested: u64,
    },

    #[error(
        "Plan zone {zone_id} capacity exceeded: {occupied} of {capacity} tables occupied, {requested} requested"
    )]
    PlanZoneCapacityExceeded {
        zone_id: i64,
        capacity: u64,
        occupied: u64,
        requested: u64,
    },

    #[error("Reservation not found: {0}")]
    NoSuchReservation(i64),

    #[error("Reservant {reservant_id} already has a reservation for festival {festival_id}")]
    ReservationAlreadyExists { festival_id: i64, reservant_id: i64 },

    #[error(
        "Reservation {reservation_id} budget exceeded: {consumed} of {budget} tables used, {requested} requested"
    )]
    ReservationBudgetExceeded {
        reservation_id: i64,
        budget: u64,
        consumed: u64,
        requested: u64,
    },

    #[error("Game instance not found: {0}")]
    NoSuchGameInstance(i64),

    #[error(
        "Zone {zone_id} belongs to festival {zone_festival_id}, expected festival {reservation_festival_id}"
    )]
    CrossFestivalMismatch {
        reservation_festival_id: i64,
        zone_id: i64,
        zone_festival_id: i64,
    },

    #[error("Zone commitment not found: {0}")]
    NoSuchCommitment(i64),

    #[error("Invoice not found: {0}")]
    NoSuchInvoice(i64),

    #[error("Reservation {reservation_id} already has invoice {invoice_id}")]
    InvoiceAlreadyExists { reservation_id: i64, invoice_id: i64 },

    #[error("Invoice {0} is paid")]
    InvoicePaid(i64),

    #[error("Invalid payment status: {0:?}")]
    InvalidStatus(String),

    #[error("Invalid amount for {field}: {value}")]
    InvalidAmount { field: &'static str, value: Decimal },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::NoSuchFestival(_) => ErrorCode::FestivalNotFound,
            Self::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            Self::DuplicateName { .. } => ErrorCode::DuplicateName,
            Self::NoSuchZone(_) => ErrorCode::ZoneNotFound,
            Self::ZoneInUse { .. } => ErrorCode::ZoneInUse,
            Self::InsufficientCapacity { .. } => ErrorCode::InsufficientCapacity,
            Self::PlanZoneCapacityExceeded { .. } => ErrorCode::PlanZoneCapacityExceeded,
            Self::NoSuchReservation(_) => ErrorCode::ReservationNotFound,
            Self::ReservationAlreadyExists { .. } => ErrorCode::ReservationAlreadyExists,
            Self::ReservationBudgetExceeded { .. } => ErrorCode::ReservationBudgetExceeded,
            Self::NoSuchGameInstance(_) => ErrorCode::GameInstanceNotFound,
            Self::CrossFestivalMismatch { .. } => ErrorCode::CrossFestivalMismatch,
            Self::NoSuchCommitment(_) => ErrorCode::CommitmentNotFound,
            Self::NoSuchInvoice(_) => ErrorCode::InvoiceNotFound,
            Self::InvoiceAlreadyExists { .. } => ErrorCode::InvoiceAlreadyExists,
            Self::InvoicePaid(_) => ErrorCode::InvoicePaid,
            Self::InvalidStatus(_) => ErrorCode::InvalidStatus,
            Self::InvalidAmount { .. } => ErrorCode::InvalidAmount,
            Self::Storage(_) => ErrorCode::StorageError,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let code = err.code();
        if let LedgerError::Storage(e) = &err {
            tracing::error!(error = %e, "Ledger storage error");
            return AppError::storage("Storage error");
        }

        let app = AppError::with_message(code, err.to_string());
        match err {
            LedgerError::Validation(_) | LedgerError::Storage(_) => app,
            LedgerError::NoSuchFestival(id) => app.with_detail("festival_id", id),
            LedgerError::CapacityExceeded {
                festival_id,
                capacity,
                allocated,
                requested,
            } => app
                .with_detail("festival_id", festival_id)
                .with_detail("capacity", capacity)
                .with_detail("allocated", allocated)
                .with_detail("requested", requested),
            LedgerError::DuplicateName { kind, name } => {
                app.with_detail("kind", kind).with_detail("name", name)
            }
            LedgerError::NoSuchZone(id) => app.with_detail("zone_id", id),
            LedgerError::ZoneInUse {
                zone_id,
                references,
                tables_in_use,
            } => app
                .with_detail("zone_id", zone_id)
                .with_detail("references", references)
                .with_detail("tables_in_use", tables_in_use),
            LedgerError::InsufficientCapacity {
                zone_id,
                available,
                requested,
            } => app
                .with_detail("zone_id", zone_id)
                .with_detail("available", available)
                .with_detail("requested", requested),
            LedgerError::PlanZoneCapacityExceeded {
                zone_id,
                capacity,
                occupied,
                requested,
            } => app
                .with_detail("zone_id", zone_id)
                .with_detail("capacity", capacity)
                .with_detail("occupied", occupied)
                .with_detail("requested", requested),
            LedgerError::NoSuchReservation(id) => app.with_detail("reservation_id", id),
            LedgerError::ReservationAlreadyExists {
                festival_id,
                reservant_id,
            } => app
                .with_detail("festival_id", festival_id)
                .with_detail("reservant_id", reservant_id),
            LedgerError::ReservationBudgetExceeded {
                reservation_id,
                budget,
                consumed,
                requested,
            } => app
                .with_detail("reservation_id", reservation_id)
                .with_detail("budget", budget)
                .with_detail("consumed", consumed)
                .with_detail("requested", requested),
            LedgerError::NoSuchGameInstance(id) => app.with_detail("game_instance_id", id),
            LedgerError::CrossFestivalMismatch {
                reservation_festival_id,
                zone_id,
                zone_festival_id,
            } => app
                .with_detail("reservation_festival_id", reservation_festival_id)
                .with_detail("zone_id", zone_id)
                .with_detail("zone_festival_id", zone_festival_id),
            LedgerError::NoSuchCommitment(id) => app.with_detail("commitment_id", id),
            LedgerError::NoSuchInvoice(id) => app.with_detail("invoice_id", id),
            LedgerError::InvoiceAlreadyExists {
                reservation_id,
                invoice_id,
            } => app
                .with_detail("reservation_id", reservation_id)
                .with_detail("invoice_id", invoice_id),
            LedgerError::InvoicePaid(id) => app.with_detail("invoice_id", id),
            LedgerError::InvalidStatus(value) => app.with_detail("value", value),
            LedgerError::InvalidAmount { field, value } => app
                .with_detail("field", field)
                .with_detail("value", value.to_string()),
        }
    }
}
