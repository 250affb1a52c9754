//! Game Instance Model

use serde::{Deserialize, Serialize};

/// Tables assigned to a placed game, by table type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableBreakdown {
    pub standard: u32,
    pub large: u32,
    pub municipal: u32,
}

impl TableBreakdown {
    pub fn new(standard: u32, large: u32, municipal: u32) -> Self {
        Self {
            standard,
            large,
            municipal,
        }
    }

    pub fn total(&self) -> u64 {
        u64::from(self.standard) + u64::from(self.large) + u64::from(self.municipal)
    }
}

/// One reservation's copies of one game at the festival
///
/// Unplaced while `plan_zone_id` is `None`; the breakdown is then all zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameInstance {
    pub id: i64,
    pub reservation_id: i64,
    /// External catalogue id
    pub game_id: i64,
    pub copies: u32,
    /// Planning estimate, never touched by placement
    pub estimated_tables: u32,
    pub plan_zone_id: Option<i64>,
    pub tables: TableBreakdown,
    pub received: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl GameInstance {
    pub fn is_placed(&self) -> bool {
        self.plan_zone_id.is_some()
    }

    /// Tables this instance consumes (zero when unplaced)
    pub fn consumed_tables(&self) -> u64 {
        if self.is_placed() {
            self.tables.total()
        } else {
            0
        }
    }
}

fn default_one() -> u32 {
    1
}

/// Add game payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameInstanceCreate {
    pub game_id: i64,
    #[serde(default = "default_one")]
    pub copies: u32,
    #[serde(default = "default_one")]
    pub estimated_tables: u32,
}

impl GameInstanceCreate {
    pub fn new(game_id: i64) -> Self {
        Self {
            game_id,
            copies: 1,
            estimated_tables: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_total() {
        assert_eq!(TableBreakdown::new(6, 2, 0).total(), 8);
        assert_eq!(TableBreakdown::default().total(), 0);
        assert_eq!(TableBreakdown::new(u32::MAX, u32::MAX, 1).total(), 2 * u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_create_defaults() {
        let payload: GameInstanceCreate = serde_json::from_str(r#"{"game_id":9}"#).unwrap();
        assert_eq!(payload.copies, 1);
        assert_eq!(payload.estimated_tables, 1);
    }
}
