//! Placement Engine
//!
//! Moves a game instance between Unplaced and Placed. A placement has to fit
//! both the owning reservation's remaining budget and the target plan zone's
//! remaining quota; both sums leave out the instance being moved, so
//! re-placing a game never counts its old tables twice.

use super::budget::{budget_of, consumed_of};
use super::error::{LedgerError, LedgerResult};
use super::lookup::{require_game, require_plan_zone, require_reservation};
use super::plan::occupied_in;
use super::storage::LedgerStorage;
use shared::models::{GameInstance, TableBreakdown};
use shared::util::now_millis;

#[derive(Clone)]
pub struct PlacementEngine {
    storage: LedgerStorage,
}

impl PlacementEngine {
    pub fn new(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    /// Place a game instance in a plan zone with the given table breakdown
    ///
    /// Replaces any previous placement of the same instance. A placement that
    /// exactly uses the remaining capacity succeeds; a zero-table placement
    /// still marks the instance Placed.
    pub fn place(
        &self,
        game_instance_id: i64,
        plan_zone_id: i64,
        tables: TableBreakdown,
    ) -> LedgerResult<GameInstance> {
        let requested = tables.total();

        let game = self.storage.write(|txn| -> LedgerResult<GameInstance> {
            let mut game = require_game(txn, game_instance_id)?;
            let reservation = require_reservation(txn, game.reservation_id)?;
            let zone = require_plan_zone(txn, plan_zone_id)?;

            if zone.festival_id != reservation.festival_id {
                return Err(LedgerError::CrossFestivalMismatch {
                    reservation_festival_id: reservation.festival_id,
                    zone_id: zone.id,
                    zone_festival_id: zone.festival_id,
                });
            }

            let budget = budget_of(txn, reservation.id)?;
            let consumed = consumed_of(txn, reservation.id, Some(game.id))?;
            if consumed + requested > budget {
                tracing::debug!(
                    reservation_id = reservation.id,
                    budget,
                    consumed,
                    requested,
                    "Placement rejected by reservation budget"
                );
                return Err(LedgerError::ReservationBudgetExceeded {
                    reservation_id: reservation.id,
                    budget,
                    consumed,
                    requested,
                });
            }

            let capacity = u64::from(zone.table_quota);
            let occupied = occupied_in(txn, zone.id, Some(game.id))?;
            if occupied + requested > capacity {
                tracing::debug!(
                    zone_id = zone.id,
                    capacity,
                    occupied,
                    requested,
                    "Placement rejected by plan zone quota"
                );
                return Err(LedgerError::PlanZoneCapacityExceeded {
                    zone_id: zone.id,
                    capacity,
                    occupied,
                    requested,
                });
            }

            game.plan_zone_id = Some(zone.id);
            game.tables = tables;
            game.updated_at = now_millis();
            txn.put(&game)?;
            Ok(game)
        })?;

        tracing::info!(
            game_instance_id,
            plan_zone_id,
            standard = tables.standard,
            large = tables.large,
            municipal = tables.municipal,
            "Game placed"
        );
        Ok(game)
    }

    /// Return a game instance to Unplaced
    ///
    /// Succeeds for any existing instance, placed or not.
    pub fn remove(&self, game_instance_id: i64) -> LedgerResult<GameInstance> {
        let (game, was_placed) = self.storage.write(|txn| -> LedgerResult<(GameInstance, bool)> {
            let mut game = require_game(txn, game_instance_id)?;
            if !game.is_placed() && game.tables == TableBreakdown::default() {
                return Ok((game, false));
            }
            game.plan_zone_id = None;
            game.tables = TableBreakdown::default();
            game.updated_at = now_millis();
            txn.put(&game)?;
            Ok((game, true))
        })?;

        if was_placed {
            tracing::info!(game_instance_id, "Game placement removed");
        } else {
            tracing::debug!(game_instance_id, "Game already unplaced");
        }
        Ok(game)
    }
}
