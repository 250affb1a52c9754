//! Festival Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Festival entity
///
/// `total_tables` is the inventory both zone partitions are carved from.
/// Whether the festival is the current one is held by the registry, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Festival {
    pub id: i64,
    pub name: String,
    pub total_tables: u32,
    /// Price of one electrical outlet
    pub outlet_unit_price: Decimal,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create festival payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FestivalCreate {
    pub name: String,
    pub total_tables: u32,
    #[serde(default)]
    pub outlet_unit_price: Decimal,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
}

impl FestivalCreate {
    pub fn new(name: impl Into<String>, total_tables: u32) -> Self {
        Self {
            name: name.into(),
            total_tables,
            outlet_unit_price: Decimal::ZERO,
            start_date: None,
            end_date: None,
            description: None,
        }
    }
}

/// Update festival payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FestivalUpdate {
    pub name: Option<String>,
    pub total_tables: Option<u32>,
    pub outlet_unit_price: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl FestivalUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.total_tables.is_none()
            && self.outlet_unit_price.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_rejects_unknown_keys() {
        let result: Result<FestivalUpdate, _> =
            serde_json::from_str(r#"{"name":"FJA","est_courant":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_update() {
        assert!(FestivalUpdate::default().is_empty());
        let update: FestivalUpdate = serde_json::from_str(r#"{"total_tables":40}"#).unwrap();
        assert!(!update.is_empty());
    }
}
