//! Plan Zone Model

use serde::{Deserialize, Serialize};

/// Physical floor-layout partition of a festival
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanZone {
    pub id: i64,
    pub festival_id: i64,
    pub name: String,
    pub table_quota: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create plan zone payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanZoneCreate {
    pub name: String,
    pub table_quota: u32,
}

impl PlanZoneCreate {
    pub fn new(name: impl Into<String>, table_quota: u32) -> Self {
        Self {
            name: name.into(),
            table_quota,
        }
    }
}

/// Plan zone with its occupancy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanZoneSummary {
    pub zone: PlanZone,
    pub occupied_tables: u64,
    pub available_tables: u64,
    pub placed_games: usize,
}
