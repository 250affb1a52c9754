//! Tariff Zone Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Priced partition of a festival's table inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffZone {
    pub id: i64,
    pub festival_id: i64,
    pub name: String,
    pub table_quota: u32,
    pub price_per_table: Decimal,
    /// Price per square metre, derived from the table price unless given
    pub price_per_area: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create tariff zone payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffZoneCreate {
    pub name: String,
    pub table_quota: u32,
    pub price_per_table: Decimal,
    #[serde(default)]
    pub price_per_area: Option<Decimal>,
}

impl TariffZoneCreate {
    pub fn new(name: impl Into<String>, table_quota: u32, price_per_table: Decimal) -> Self {
        Self {
            name: name.into(),
            table_quota,
            price_per_table,
            price_per_area: None,
        }
    }
}

/// Update tariff zone payload
///
/// Quota changes go through resize; everything here is frozen once a
/// reservation has committed tables from the zone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TariffZoneUpdate {
    pub name: Option<String>,
    pub price_per_table: Option<Decimal>,
    pub price_per_area: Option<Decimal>,
}

impl TariffZoneUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price_per_table.is_none() && self.price_per_area.is_none()
    }
}

/// Tariff zone with its commitment totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffZoneSummary {
    pub zone: TariffZone,
    pub committed_tables: u64,
    pub available_tables: u64,
}
