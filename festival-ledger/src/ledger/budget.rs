//! Reservation Budget Tracker
//!
//! A reservation's budget is the sum of the tables it committed across
//! tariff zones. Its consumption is the sum of the tables of its placed
//! games. Both are recomputed from the stored rows on every read, so the
//! remaining budget cannot drift.

use super::error::{LedgerError, LedgerResult};
use super::lookup::{self, require_commitment, require_reservation, require_tariff_zone};
use super::storage::{LedgerStorage, LedgerTxn, RecordSource, StorageResult};
use super::tariff;
use shared::models::{
    CommitmentRequest, Reservation, ReservationBudget, TariffZone, ZoneCommitment,
};
use shared::util::now_millis;
use std::collections::HashMap;

/// Σ committed tables of a reservation
pub(crate) fn budget_of(src: &impl RecordSource, reservation_id: i64) -> StorageResult<u64> {
    Ok(lookup::committed_tables(&lookup::reservation_commitments(
        src,
        reservation_id,
    )?))
}

/// Σ tables of a reservation's placed games, leaving out `excluding`
pub(crate) fn consumed_of(
    src: &impl RecordSource,
    reservation_id: i64,
    excluding: Option<i64>,
) -> StorageResult<u64> {
    Ok(lookup::consumed_tables(
        &lookup::reservation_games(src, reservation_id)?,
        excluding,
    ))
}

/// Validate every request, then record them all
///
/// Zero-table entries are skipped. Several entries for the same zone are
/// checked against the zone's capacity together.
pub(crate) fn commit_in(
    txn: &LedgerTxn,
    reservation: &Reservation,
    requests: &[CommitmentRequest],
) -> LedgerResult<Vec<ZoneCommitment>> {
    let mut pending: HashMap<i64, u64> = HashMap::new();
    let mut validated: Vec<(TariffZone, u32)> = Vec::new();

    for request in requests.iter().filter(|r| r.table_count > 0) {
        let zone = require_tariff_zone(txn, request.tariff_zone_id)?;
        if zone.festival_id != reservation.festival_id {
            return Err(LedgerError::CrossFestivalMismatch {
                reservation_festival_id: reservation.festival_id,
                zone_id: zone.id,
                zone_festival_id: zone.festival_id,
            });
        }

        let requested = u64::from(request.table_count);
        let claimed = pending.entry(zone.id).or_default();
        let available = tariff::available_in(txn, &zone)?.saturating_sub(*claimed);
        if requested > available {
            tracing::debug!(
                reservation_id = reservation.id,
                zone_id = zone.id,
                available,
                requested,
                "Zone commitment rejected"
            );
            return Err(LedgerError::InsufficientCapacity {
                zone_id: zone.id,
                available,
                requested,
            });
        }
        *claimed += requested;
        validated.push((zone, request.table_count));
    }

    let now = now_millis();
    let mut commitments = Vec::with_capacity(validated.len());
    for (zone, table_count) in validated {
        let commitment = ZoneCommitment {
            id: txn.next_id()?,
            reservation_id: reservation.id,
            tariff_zone_id: zone.id,
            table_count,
            unit_price: zone.price_per_table,
            created_at: now,
        };
        txn.put(&commitment)?;
        commitments.push(commitment);
    }
    Ok(commitments)
}

#[derive(Clone)]
pub struct ReservationBudgetTracker {
    storage: LedgerStorage,
}

impl ReservationBudgetTracker {
    pub fn new(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    /// Commit tables from one or more tariff zones to a reservation
    ///
    /// Either every entry is recorded or none is. Each commitment captures
    /// the zone's current table price.
    pub fn commit_zones(
        &self,
        reservation_id: i64,
        requests: &[CommitmentRequest],
    ) -> LedgerResult<Vec<ZoneCommitment>> {
        let commitments = self.storage.write(|txn| -> LedgerResult<Vec<ZoneCommitment>> {
            let reservation = require_reservation(txn, reservation_id)?;
            commit_in(txn, &reservation, requests)
        })?;

        for c in &commitments {
            tracing::info!(
                reservation_id,
                zone_id = c.tariff_zone_id,
                table_count = c.table_count,
                unit_price = %c.unit_price,
                "Zone tables committed"
            );
        }
        Ok(commitments)
    }

    /// Give a commitment's tables back to its zone
    ///
    /// Refused when the reservation's placed games would no longer fit in
    /// what is left of its budget.
    pub fn release_commitment(&self, commitment_id: i64) -> LedgerResult<ZoneCommitment> {
        let commitment = self.storage.write(|txn| -> LedgerResult<ZoneCommitment> {
            let commitment = require_commitment(txn, commitment_id)?;
            let reservation_id = commitment.reservation_id;

            let budget = budget_of(txn, reservation_id)?;
            let consumed = consumed_of(txn, reservation_id, None)?;
            let remaining_budget = budget.saturating_sub(u64::from(commitment.table_count));
            if consumed > remaining_budget {
                return Err(LedgerError::ReservationBudgetExceeded {
                    reservation_id,
                    budget: remaining_budget,
                    consumed,
                    requested: 0,
                });
            }

            txn.remove::<ZoneCommitment>(commitment_id)?;
            Ok(commitment)
        })?;

        tracing::info!(
            reservation_id = commitment.reservation_id,
            zone_id = commitment.tariff_zone_id,
            table_count = commitment.table_count,
            "Zone commitment released"
        );
        Ok(commitment)
    }

    pub fn commitments(&self, reservation_id: i64) -> LedgerResult<Vec<ZoneCommitment>> {
        self.storage.read(|view| {
            require_reservation(view, reservation_id)?;
            Ok(lookup::reservation_commitments(view, reservation_id)?)
        })
    }

    /// Σ committed tables
    pub fn budget(&self, reservation_id: i64) -> LedgerResult<u64> {
        Ok(self.summary(reservation_id)?.budget)
    }

    /// Σ tables of placed games
    pub fn consumed(&self, reservation_id: i64) -> LedgerResult<u64> {
        Ok(self.summary(reservation_id)?.consumed)
    }

    /// budget − consumed
    pub fn remaining(&self, reservation_id: i64) -> LedgerResult<u64> {
        Ok(self.summary(reservation_id)?.remaining)
    }

    /// All three figures from one snapshot
    pub fn summary(&self, reservation_id: i64) -> LedgerResult<ReservationBudget> {
        self.storage.read(|view| {
            require_reservation(view, reservation_id)?;
            let budget = budget_of(view, reservation_id)?;
            let consumed = consumed_of(view, reservation_id, None)?;
            Ok(ReservationBudget {
                reservation_id,
                budget,
                consumed,
                remaining: budget.saturating_sub(consumed),
            })
        })
    }
}
