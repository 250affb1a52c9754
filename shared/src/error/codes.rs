//! Unified error codes for the festival ledger
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Festival errors
//! - 2xxx: Tariff zone errors
//! - 3xxx: Plan zone errors
//! - 4xxx: Reservation and placement errors
//! - 5xxx: Invoice errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes are represented as u16 values so the numeric form is what crosses
/// process boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 1xxx: Festival ====================
    /// Festival not found
    FestivalNotFound = 1001,
    /// Zone quotas would exceed the festival table capacity
    CapacityExceeded = 1002,
    /// Name already used within its scope
    DuplicateName = 1003,

    // ==================== 2xxx: Tariff zone ====================
    /// Zone not found
    ZoneNotFound = 2001,
    /// Zone is referenced by commitments or placed games
    ZoneInUse = 2002,
    /// Not enough tables left in the zone
    InsufficientCapacity = 2003,

    // ==================== 3xxx: Plan zone ====================
    /// Placement would overfill the plan zone
    PlanZoneCapacityExceeded = 3001,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Reservant already holds a reservation for this festival
    ReservationAlreadyExists = 4002,
    /// Placement would exceed the reserved table budget
    ReservationBudgetExceeded = 4003,
    /// Game instance not found
    GameInstanceNotFound = 4004,
    /// Entities belong to different festivals
    CrossFestivalMismatch = 4005,
    /// Zone commitment not found
    CommitmentNotFound = 4006,

    // ==================== 5xxx: Invoice ====================
    /// Invoice not found
    InvoiceNotFound = 5001,
    /// Reservation already has an invoice
    InvoiceAlreadyExists = 5002,
    /// Invoice is paid and can no longer change
    InvoicePaid = 5003,
    /// Unknown payment status
    InvalidStatus = 5004,
    /// Amount is negative or malformed
    InvalidAmount = 5005,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Storage layer error
    StorageError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            ErrorCode::FestivalNotFound => "Festival not found",
            ErrorCode::CapacityExceeded => "Zone quotas exceed the festival table capacity",
            ErrorCode::DuplicateName => "Name is already in use",

            ErrorCode::ZoneNotFound => "Zone not found",
            ErrorCode::ZoneInUse => "Zone is in use",
            ErrorCode::InsufficientCapacity => "Not enough tables available in zone",

            ErrorCode::PlanZoneCapacityExceeded => "Plan zone capacity exceeded",

            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::ReservationAlreadyExists => "Reservation already exists",
            ErrorCode::ReservationBudgetExceeded => "Reservation table budget exceeded",
            ErrorCode::GameInstanceNotFound => "Game instance not found",
            ErrorCode::CrossFestivalMismatch => "Entities belong to different festivals",
            ErrorCode::CommitmentNotFound => "Zone commitment not found",

            ErrorCode::InvoiceNotFound => "Invoice not found",
            ErrorCode::InvoiceAlreadyExists => "Invoice already exists for reservation",
            ErrorCode::InvoicePaid => "Invoice is paid",
            ErrorCode::InvalidStatus => "Invalid payment status",
            ErrorCode::InvalidAmount => "Invalid amount",

            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageError => "Storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            1001 => Ok(ErrorCode::FestivalNotFound),
            1002 => Ok(ErrorCode::CapacityExceeded),
            1003 => Ok(ErrorCode::DuplicateName),

            2001 => Ok(ErrorCode::ZoneNotFound),
            2002 => Ok(ErrorCode::ZoneInUse),
            2003 => Ok(ErrorCode::InsufficientCapacity),

            3001 => Ok(ErrorCode::PlanZoneCapacityExceeded),

            4001 => Ok(ErrorCode::ReservationNotFound),
            4002 => Ok(ErrorCode::ReservationAlreadyExists),
            4003 => Ok(ErrorCode::ReservationBudgetExceeded),
            4004 => Ok(ErrorCode::GameInstanceNotFound),
            4005 => Ok(ErrorCode::CrossFestivalMismatch),
            4006 => Ok(ErrorCode::CommitmentNotFound),

            5001 => Ok(ErrorCode::InvoiceNotFound),
            5002 => Ok(ErrorCode::InvoiceAlreadyExists),
            5003 => Ok(ErrorCode::InvoicePaid),
            5004 => Ok(ErrorCode::InvalidStatus),
            5005 => Ok(ErrorCode::InvalidAmount),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
