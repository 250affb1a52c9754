//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// - 0xxx: General errors
/// - 1xxx: Festival errors
/// - 2xxx: Tariff zone errors
/// - 3xxx: Plan zone errors
/// - 4xxx: Reservation and placement errors
/// - 5xxx: Invoice errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Festival,
    TariffZone,
    PlanZone,
    Reservation,
    Invoice,
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Festival,
            2000..3000 => Self::TariffZone,
            3000..4000 => Self::PlanZone,
            4000..5000 => Self::Reservation,
            5000..6000 => Self::Invoice,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Festival => "festival",
            Self::TariffZone => "tariff_zone",
            Self::PlanZone => "plan_zone",
            Self::Reservation => "reservation",
            Self::Invoice => "invoice",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
