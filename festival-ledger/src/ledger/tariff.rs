//! Tariff Zone Ledger
//!
//! Partitions a festival's table inventory into priced zones and tracks how
//! many tables of each zone reservations have committed.
//!
//! Invariants:
//! - Σ zone quotas of a festival ≤ festival total tables
//! - Σ commitments of a zone ≤ zone quota
//! - name and prices are frozen once a commitment exists

use super::error::{LedgerError, LedgerResult};
use super::festivals::ensure_capacity;
use super::lookup::{self, require_festival, require_tariff_zone};
use super::money;
use super::storage::{LedgerStorage, LedgerTxn, RecordSource, StorageResult};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use shared::models::{TariffZone, TariffZoneCreate, TariffZoneSummary, TariffZoneUpdate};
use shared::util::now_millis;

const KIND: &str = "tariff zone";

/// Tables of `zone` not yet committed
pub(crate) fn available_in(src: &impl RecordSource, zone: &TariffZone) -> StorageResult<u64> {
    let committed = lookup::committed_tables(&lookup::zone_commitments(src, zone.id)?);
    Ok(u64::from(zone.table_quota).saturating_sub(committed))
}

/// Σ quotas of the festival's tariff zones, leaving out `excluding`
fn allocated_quota(
    src: &impl RecordSource,
    festival_id: i64,
    excluding: Option<i64>,
) -> StorageResult<u64> {
    Ok(src
        .filter(|z: &TariffZone| z.festival_id == festival_id && Some(z.id) != excluding)?
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
    let clash = txn.filter(|z: &TariffZone| {
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

/// Fail with `ZoneInUse` when any reservation holds tables in the zone
fn ensure_uncommitted(src: &impl RecordSource, zone_id: i64) -> LedgerResult<()> {
    let commitments = lookup::zone_commitments(src, zone_id)?;
    if !commitments.is_empty() {
        return Err(LedgerError::ZoneInUse {
            zone_id,
            references: commitments.len(),
            tables_in_use: lookup::committed_tables(&commitments),
        });
    }
    Ok(())
}

#[derive(Clone)]
pub struct TariffZoneLedger {
    storage: LedgerStorage,
}

impl TariffZoneLedger {
    pub fn new(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    /// Carve a new priced zone out of the festival's remaining capacity
    ///
    /// The area price defaults to the table price divided by
    /// [`money::TABLES_TO_AREA_FACTOR`].
    pub fn create_zone(
        &self,
        festival_id: i64,
        payload: TariffZoneCreate,
    ) -> LedgerResult<TariffZone> {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        money::validate_price("price_per_table", payload.price_per_table)?;
        if let Some(price) = payload.price_per_area {
            money::validate_price("price_per_area", price)?;
        }

        let name = payload.name.trim().to_string();
        let zone = self.storage.write(|txn| -> LedgerResult<TariffZone> {
            let festival = require_festival(txn, festival_id)?;
            ensure_unique_name(txn, festival_id, &name, None)?;

            let allocated = allocated_quota(txn, festival_id, None)?;
            ensure_capacity(&festival, allocated, u64::from(payload.table_quota))?;

            let now = now_millis();
            let zone = TariffZone {
                id: txn.next_id()?,
                festival_id,
                name,
                table_quota: payload.table_quota,
                price_per_table: payload.price_per_table,
                price_per_area: payload
                    .price_per_area
                    .unwrap_or_else(|| money::area_price(payload.price_per_table)),
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
            price_per_table = %zone.price_per_table,
            "Tariff zone created"
        );
        Ok(zone)
    }

    /// Change a zone's quota
    ///
    /// Growing re-checks the festival capacity; shrinking below the tables
    /// already committed is refused.
    pub fn resize_zone(&self, zone_id: i64, new_quota: u32) -> LedgerResult<TariffZone> {
        let zone = self.storage.write(|txn| -> LedgerResult<TariffZone> {
            let mut zone = require_tariff_zone(txn, zone_id)?;

            if new_quota > zone.table_quota {
                let festival = require_festival(txn, zone.festival_id)?;
                let others = allocated_quota(txn, zone.festival_id, Some(zone_id))?;
                ensure_capacity(&festival, others, u64::from(new_quota))?;
            } else {
                let commitments = lookup::zone_commitments(txn, zone_id)?;
                let committed = lookup::committed_tables(&commitments);
                if u64::from(new_quota) < committed {
                    return Err(LedgerError::ZoneInUse {
                        zone_id,
                        references: commitments.len(),
                        tables_in_use: committed,
                    });
                }
            }

            zone.table_quota = new_quota;
            zone.updated_at = now_millis();
            txn.put(&zone)?;
            Ok(zone)
        })?;

        tracing::info!(zone_id, table_quota = new_quota, "Tariff zone resized");
        Ok(zone)
    }

    /// Edit name or prices of a zone nobody has committed tables from yet
    ///
    /// When only the table price is given the area price follows it.
    pub fn update_zone(&self, zone_id: i64, payload: TariffZoneUpdate) -> LedgerResult<TariffZone> {
        if payload.is_empty() {
            return Err(LedgerError::Validation("No fields to update".into()));
        }
        if let Some(name) = &payload.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(price) = payload.price_per_table {
            money::validate_price("price_per_table", price)?;
        }
        if let Some(price) = payload.price_per_area {
            money::validate_price("price_per_area", price)?;
        }

        let zone = self.storage.write(|txn| -> LedgerResult<TariffZone> {
            let mut zone = require_tariff_zone(txn, zone_id)?;
            ensure_uncommitted(txn, zone_id)?;

            if let Some(name) = payload.name {
                let name = name.trim().to_string();
                ensure_unique_name(txn, zone.festival_id, &name, Some(zone_id))?;
                zone.name = name;
            }
            match (payload.price_per_table, payload.price_per_area) {
                (Some(table), Some(area)) => {
                    zone.price_per_table = table;
                    zone.price_per_area = area;
                }
                (Some(table), None) => {
                    zone.price_per_table = table;
                    zone.price_per_area = money::area_price(table);
                }
                (None, Some(area)) => zone.price_per_area = area,
                (None, None) => {}
            }

            zone.updated_at = now_millis();
            txn.put(&zone)?;
            Ok(zone)
        })?;

        tracing::info!(zone_id, "Tariff zone updated");
        Ok(zone)
    }

    pub fn delete_zone(&self, zone_id: i64) -> LedgerResult<()> {
        self.storage.write(|txn| -> LedgerResult<()> {
            require_tariff_zone(txn, zone_id)?;
            ensure_uncommitted(txn, zone_id)?;
            txn.remove::<TariffZone>(zone_id)?;
            Ok(())
        })?;

        tracing::info!(zone_id, "Tariff zone deleted");
        Ok(())
    }

    /// quota − Σ committed tables
    pub fn available_tables(&self, zone_id: i64) -> LedgerResult<u64> {
        self.storage.read(|view| {
            let zone = require_tariff_zone(view, zone_id)?;
            Ok(available_in(view, &zone)?)
        })
    }

    pub fn committed_tables(&self, zone_id: i64) -> LedgerResult<u64> {
        self.storage.read(|view| {
            require_tariff_zone(view, zone_id)?;
            Ok(lookup::committed_tables(&lookup::zone_commitments(view, zone_id)?))
        })
    }

    pub fn get_zone(&self, zone_id: i64) -> LedgerResult<TariffZone> {
        self.storage.read(|view| require_tariff_zone(view, zone_id))
    }

    /// Zones of a festival with their commitment totals, ordered by name
    pub fn list_zones(&self, festival_id: i64) -> LedgerResult<Vec<TariffZoneSummary>> {
        self.storage.read(|view| {
            require_festival(view, festival_id)?;
            let mut zones = view.filter(|z: &TariffZone| z.festival_id == festival_id)?;
            zones.sort_by(|a, b| a.name.cmp(&b.name));

            let mut summaries = Vec::with_capacity(zones.len());
            for zone in zones {
                let committed = lookup::committed_tables(&lookup::zone_commitments(view, zone.id)?);
                summaries.push(TariffZoneSummary {
                    available_tables: u64::from(zone.table_quota).saturating_sub(committed),
                    committed_tables: committed,
                    zone,
                });
            }
            Ok(summaries)
        })
    }
}
