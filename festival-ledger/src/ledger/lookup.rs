//! Lookups and sums shared by the ledger components
//!
//! Everything here takes a [`RecordSource`] so it works the same inside a
//! write transaction (seeing its own writes) and on a read snapshot.

use super::error::{LedgerError, LedgerResult};
use super::storage::{RecordSource, StorageResult};
use shared::models::{
    Festival, GameInstance, Invoice, PlanZone, Reservation, TariffZone, ZoneCommitment,
};

pub(crate) fn require_festival(src: &impl RecordSource, id: i64) -> LedgerResult<Festival> {
    src.get(id)?.ok_or(LedgerError::NoSuchFestival(id))
}

pub(crate) fn require_tariff_zone(src: &impl RecordSource, id: i64) -> LedgerResult<TariffZone> {
    src.get(id)?.ok_or(LedgerError::NoSuchZone(id))
}

pub(crate) fn require_plan_zone(src: &impl RecordSource, id: i64) -> LedgerResult<PlanZone> {
    src.get(id)?.ok_or(LedgerError::NoSuchZone(id))
}

pub(crate) fn require_reservation(src: &impl RecordSource, id: i64) -> LedgerResult<Reservation> {
    src.get(id)?.ok_or(LedgerError::NoSuchReservation(id))
}

pub(crate) fn require_game(src: &impl RecordSource, id: i64) -> LedgerResult<GameInstance> {
    src.get(id)?.ok_or(LedgerError::NoSuchGameInstance(id))
}

pub(crate) fn require_commitment(
    src: &impl RecordSource,
    id: i64,
) -> LedgerResult<ZoneCommitment> {
    src.get(id)?.ok_or(LedgerError::NoSuchCommitment(id))
}

pub(crate) fn require_invoice(src: &impl RecordSource, id: i64) -> LedgerResult<Invoice> {
    src.get(id)?.ok_or(LedgerError::NoSuchInvoice(id))
}

pub(crate) fn zone_commitments(
    src: &impl RecordSource,
    tariff_zone_id: i64,
) -> StorageResult<Vec<ZoneCommitment>> {
    src.filter(|c: &ZoneCommitment| c.tariff_zone_id == tariff_zone_id)
}

pub(crate) fn reservation_commitments(
    src: &impl RecordSource,
    reservation_id: i64,
) -> StorageResult<Vec<ZoneCommitment>> {
    src.filter(|c: &ZoneCommitment| c.reservation_id == reservation_id)
}

pub(crate) fn reservation_games(
    src: &impl RecordSource,
    reservation_id: i64,
) -> StorageResult<Vec<GameInstance>> {
    src.filter(|g: &GameInstance| g.reservation_id == reservation_id)
}

/// Games currently placed in a plan zone
pub(crate) fn zone_games(
    src: &impl RecordSource,
    plan_zone_id: i64,
) -> StorageResult<Vec<GameInstance>> {
    src.filter(|g: &GameInstance| g.plan_zone_id == Some(plan_zone_id))
}

pub(crate) fn reservation_invoice(
    src: &impl RecordSource,
    reservation_id: i64,
) -> StorageResult<Option<Invoice>> {
    Ok(src
        .filter(|i: &Invoice| i.reservation_id == reservation_id)?
        .into_iter()
        .next())
}

pub(crate) fn festival_reservations(
    src: &impl RecordSource,
    festival_id: i64,
) -> StorageResult<Vec<Reservation>> {
    src.filter(|r: &Reservation| r.festival_id == festival_id)
}

/// Σ committed tables
pub(crate) fn committed_tables(commitments: &[ZoneCommitment]) -> u64 {
    commitments.iter().map(|c| u64::from(c.table_count)).sum()
}

/// Σ tables of placed games, leaving out `excluding`
pub(crate) fn consumed_tables(games: &[GameInstance], excluding: Option<i64>) -> u64 {
    games
        .iter()
        .filter(|g| Some(g.id) != excluding)
        .map(GameInstance::consumed_tables)
        .sum()
}
