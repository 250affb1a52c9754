//! Plan Zone Ledger
//!
//! Floor-layout partitions of a festival and the tables placed games occupy
//! in each. Independent of the tariff partition: the two are checked against
//! the festival total separately and need not match each other.

use super::error::{LedgerError, LedgerResult};
use super::festivals::ensure_capacity;
use super::lookup::{self, require_festival, require_plan_zone};
use super::storage::{LedgerStorage, LedgerTxn, RecordSource, StorageResult};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use shared::models::{GameInstance, PlanZone, PlanZoneCreate, PlanZoneSummary};
use shared::util::now_millis;
use std::collections::HashSet;

const KIND: &str = "plan zone";

/// Σ tables of games placed in the zone, leaving out `excluding`
pub(crate) fn occupied_in(
    src: &impl RecordSource,
    plan_zone_id: i64,
    excluding: Option<i64>,
) -> StorageResult<u64> {
    Ok(lookup::consumed_tables(
        &lookup::zone_games(src, plan_zone_id)?,
        excluding,
    ))
}

fn allocated_quota(
    src: &impl RecordSource,
    festival_id: i64,
    excluding: Option<i64>,
) -> StorageResult<u64> {
    Ok(src
        .filter(|z: &PlanZone| z.festival_id == festival_id && Some(z.id) != excluding)?
        .iter()
        .map(|z| u64::from(z.table_quota))
        .sum())
}

fn ensure_unique_name(
    txn: &LedgerTxn,
    festival_id: i64,
    name: &str,
    except: Option<i64>,
) -> LedgerResult<()> {
    let clash = txn.filter(|z: &PlanZone| {
        z.festival_id == festival_id && z.name == name && Some(z.id) != except
    })?;
    if !clash.is_empty() {
        return Err(LedgerError::DuplicateName {
            kind: KIND,
            name: name.to_string(),
        });
    }
    Ok(())
}

fn summarize(src: &impl RecordSource, zone: PlanZone) -> StorageResult<PlanZoneSummary> {
    let games = lookup::zone_games(src, zone.id)?;
    let occupied = lookup::consumed_tables(&games, None);
    Ok(PlanZoneSummary {
        available_tables: u64::from(zone.table_quota).saturating_sub(occupied),
        occupied_tables: occupied,
        placed_games: games.len(),
        zone,
    })
}

#[derive(Clone)]
pub struct PlanZoneLedger {
    storage: LedgerStorage,
}

impl PlanZoneLedger {
    pub fn new(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    pub fn create_zone(&self, festival_id: i64, payload: PlanZoneCreate) -> LedgerResult<PlanZone> {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

        let name = payload.name.trim().to_string();
        let zone = self.storage.write(|txn| -> LedgerResult<PlanZone> {
            let festival = require_festival(txn, festival_id)?;
            ensure_unique_name(txn, festival_id, &name, None)?;

            let allocated = allocated_quota(txn, festival_id, None)?;
            ensure_capacity(&festival, allocated, u64::from(payload.table_quota))?;

            let now = now_millis();
            let zone = PlanZone {
                id: txn.next_id()?,
                festival_id,
                name,
                table_quota: payload.table_quota,
                created_at: now,
                updated_at: now,
            };
            txn.put(&zone)?;
            Ok(zone)
        })?;

        tracing::info!(
            festival_id,
            zone_id = zone.id,
            table_quota = zone.table_quota,
            "Plan zone created"
        );
        Ok(zone)
    }

    /// Change a zone's quota
    ///
    /// Growing re-checks the festival capacity; shrinking below the tables
    /// already occupied is refused.
    pub fn resize_zone(&self, zone_id: i64, new_quota: u32) -> LedgerResult<PlanZone> {
        let zone = self.storage.write(|txn| -> LedgerResult<PlanZone> {
            let mut zone = require_plan_zone(txn, zone_id)?;

            if new_quota > zone.table_quota {
                let festival = require_festival(txn, zone.festival_id)?;
                let others = allocated_quota(txn, zone.festival_id, Some(zone_id))?;
                ensure_capacity(&festival, others, u64::from(new_quota))?;
            } else {
                let games = lookup::zone_games(txn, zone_id)?;
                let occupied = lookup::consumed_tables(&games, None);
                if u64::from(new_quota) < occupied {
                    return Err(LedgerError::ZoneInUse {
                        zone_id,
                        references: games.len(),
                        tables_in_use: occupied,
                    });
                }
            }

            zone.table_quota = new_quota;
            zone.updated_at = now_millis();
            txn.put(&zone)?;
            Ok(zone)
        })?;

        tracing::info!(zone_id, table_quota = new_quota, "Plan zone resized");
        Ok(zone)
    }

    pub fn rename_zone(&self, zone_id: i64, name: &str) -> LedgerResult<PlanZone> {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
        let name = name.trim().to_string();

        let zone = self.storage.write(|txn| -> LedgerResult<PlanZone> {
            let mut zone = require_plan_zone(txn, zone_id)?;
            ensure_unique_name(txn, zone.festival_id, &name, Some(zone_id))?;
            zone.name = name;
            zone.updated_at = now_millis();
            txn.put(&zone)?;
            Ok(zone)
        })?;

        tracing::info!(zone_id, name = %zone.name, "Plan zone renamed");
        Ok(zone)
    }

    /// Delete a zone with no game placed in it
    pub fn delete_zone(&self, zone_id: i64) -> LedgerResult<()> {
        self.storage.write(|txn| -> LedgerResult<()> {
            require_plan_zone(txn, zone_id)?;
            let games = lookup::zone_games(txn, zone_id)?;
            if !games.is_empty() {
                return Err(LedgerError::ZoneInUse {
                    zone_id,
                    references: games.len(),
                    tables_in_use: lookup::consumed_tables(&games, None),
                });
            }
            txn.remove::<PlanZone>(zone_id)?;
            Ok(())
        })?;

        tracing::info!(zone_id, "Plan zone deleted");
        Ok(())
    }

    /// Σ tables of games placed in the zone
    pub fn occupied_tables(&self, zone_id: i64) -> LedgerResult<u64> {
        self.storage.read(|view| {
            require_plan_zone(view, zone_id)?;
            Ok(occupied_in(view, zone_id, None)?)
        })
    }

    /// quota − occupied
    pub fn available_tables(&self, zone_id: i64) -> LedgerResult<u64> {
        self.storage.read(|view| {
            let zone = require_plan_zone(view, zone_id)?;
            let occupied = occupied_in(view, zone_id, None)?;
            Ok(u64::from(zone.table_quota).saturating_sub(occupied))
        })
    }

    pub fn get_zone(&self, zone_id: i64) -> LedgerResult<PlanZone> {
        self.storage.read(|view| require_plan_zone(view, zone_id))
    }

    pub fn summary(&self, zone_id: i64) -> LedgerResult<PlanZoneSummary> {
        self.storage.read(|view| {
            let zone = require_plan_zone(view, zone_id)?;
            Ok(summarize(view, zone)?)
        })
    }

    /// Zones of a festival with their occupancy, ordered by name
    pub fn list_zones(&self, festival_id: i64) -> LedgerResult<Vec<PlanZoneSummary>> {
        self.storage.read(|view| {
            require_festival(view, festival_id)?;
            let mut zones = view.filter(|z: &PlanZone| z.festival_id == festival_id)?;
            zones.sort_by(|a, b| a.name.cmp(&b.name));
            zones
                .into_iter()
                .map(|zone| summarize(view, zone).map_err(LedgerError::from))
                .collect()
        })
    }

    pub fn games_in_zone(&self, zone_id: i64) -> LedgerResult<Vec<GameInstance>> {
        self.storage.read(|view| {
            require_plan_zone(view, zone_id)?;
            Ok(lookup::zone_games(view, zone_id)?)
        })
    }

    /// Games of the festival's reservations that have no plan zone yet
    pub fn unplaced_games(&self, festival_id: i64) -> LedgerResult<Vec<GameInstance>> {
        self.storage.read(|view| {
            require_festival(view, festival_id)?;
            let reservations: HashSet<i64> = lookup::festival_reservations(view, festival_id)?
                .into_iter()
                .map(|r| r.id)
                .collect();
            Ok(view.filter(|g: &GameInstance| {
                !g.is_placed() && reservations.contains(&g.reservation_id)
            })?)
        })
    }
}
