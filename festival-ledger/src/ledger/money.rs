//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts stay `Decimal` end to end and are rounded to cents only where a
//! derived value is produced (area price, table discount, invoice totals).

use super::error::{LedgerError, LedgerResult};
use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Tables to square metres conversion used to derive the area price
pub const TABLES_TO_AREA_FACTOR: Decimal = Decimal::from_parts(45, 0, 0, false, 1);

/// Maximum allowed unit price (1,000,000)
const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Round to cents
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Area price derived from a table price
pub fn area_price(price_per_table: Decimal) -> Decimal {
    round_money(price_per_table / TABLES_TO_AREA_FACTOR)
}

/// Reject negative amounts
pub fn require_non_negative(field: &'static str, value: Decimal) -> LedgerResult<()> {
    if value < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount { field, value });
    }
    Ok(())
}

/// Validate a configured unit price: non-negative and within bounds
///
/// Prices are configuration, so a bad one is a validation failure rather
/// than a billing amount error.
pub fn validate_price(field: &'static str, value: Decimal) -> LedgerResult<()> {
    if value < Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "{field} must not be negative (got {value})"
        )));
    }
    if value > MAX_PRICE {
        return Err(LedgerError::Validation(format!(
            "{field} exceeds maximum {MAX_PRICE} (got {value})"
        )));
    }
    Ok(())
}
