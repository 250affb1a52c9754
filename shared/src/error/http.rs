//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::FestivalNotFound
            | Self::ZoneNotFound
            | Self::ReservationNotFound
            | Self::GameInstanceNotFound
            | Self::CommitmentNotFound
            | Self::InvoiceNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::DuplicateName
            | Self::ZoneInUse
            | Self::ReservationAlreadyExists
            | Self::InvoiceAlreadyExists
            | Self::InvoicePaid => StatusCode::CONFLICT,

            // 422 Unprocessable: capacity rules
            Self::CapacityExceeded
            | Self::InsufficientCapacity
            | Self::PlanZoneCapacityExceeded
            | Self::ReservationBudgetExceeded
            | Self::CrossFestivalMismatch => StatusCode::UNPROCESSABLE_ENTITY,

            // 400 Bad Request
            Self::ValidationFailed | Self::InvalidStatus | Self::InvalidAmount => {
                StatusCode::BAD_REQUEST
            }

            Self::Unknown | Self::InternalError | Self::StorageError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
