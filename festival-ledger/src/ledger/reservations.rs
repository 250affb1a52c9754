//! Reservation book
//!
//! Reservation lifecycle and the game instances a reservation brings. One
//! reservation per (festival, reservant).

use super::budget::commit_in;
use super::error::{LedgerError, LedgerResult};
use super::lookup::{self, require_festival, require_game, require_reservation};
use super::money;
use super::storage::{LedgerStorage, LedgerTxn, RecordSource};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use rust_decimal::Decimal;
use shared::models::{
    ContactState, GameInstance, GameInstanceCreate, Invoice, PresenceState, Reservation,
    ReservationCreate, ReservationUpdate, TableBreakdown, ZoneCommitment,
};
use shared::util::now_millis;

/// Remove a reservation with its commitments, games and invoice
///
/// Refused while its invoice is paid.
pub(crate) fn purge_reservation(txn: &LedgerTxn, reservation: &Reservation) -> LedgerResult<()> {
    if let Some(invoice) = lookup::reservation_invoice(txn, reservation.id)? {
        if invoice.is_paid() {
            return Err(LedgerError::InvoicePaid(invoice.id));
        }
        txn.remove::<Invoice>(invoice.id)?;
    }
    for commitment in lookup::reservation_commitments(txn, reservation.id)? {
        txn.remove::<ZoneCommitment>(commitment.id)?;
    }
    for game in lookup::reservation_games(txn, reservation.id)? {
        txn.remove::<GameInstance>(game.id)?;
    }
    txn.remove::<Reservation>(reservation.id)?;
    Ok(())
}

#[derive(Clone)]
pub struct ReservationBook {
    storage: LedgerStorage,
}

impl ReservationBook {
    pub fn new(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    /// Open a reservation, committing its initial zones in the same unit of work
    pub fn create(
        &self,
        festival_id: i64,
        payload: ReservationCreate,
    ) -> LedgerResult<Reservation> {
        validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

        let (reservation, committed) = self.storage.write(|txn| -> LedgerResult<(Reservation, u64)> {
            require_festival(txn, festival_id)?;
            let existing = txn.filter(|r: &Reservation| {
                r.festival_id == festival_id && r.reservant_id == payload.reservant_id
            })?;
            if !existing.is_empty() {
                return Err(LedgerError::ReservationAlreadyExists {
                    festival_id,
                    reservant_id: payload.reservant_id,
                });
            }

            let now = now_millis();
            let reservation = Reservation {
                id: txn.next_id()?,
                festival_id,
                reservant_id: payload.reservant_id,
                contact_state: ContactState::default(),
                presence_state: PresenceState::default(),
                outlet_count: payload.outlet_count,
                table_discount: Decimal::ZERO,
                amount_discount: Decimal::ZERO,
                notes: payload.notes,
                will_animate: payload.will_animate,
                created_at: now,
                updated_at: now,
            };
            txn.put(&reservation)?;
            let commitments = commit_in(txn, &reservation, &payload.zones)?;
            Ok((reservation, lookup::committed_tables(&commitments)))
        })?;

        tracing::info!(
            festival_id,
            reservation_id = reservation.id,
            reservant_id = reservation.reservant_id,
            committed_tables = committed,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// Apply the allow-listed fields of `payload`
    pub fn update(
        &self,
        reservation_id: i64,
        payload: ReservationUpdate,
    ) -> LedgerResult<Reservation> {
        if payload.is_empty() {
            return Err(LedgerError::Validation("No fields to update".into()));
        }
        validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
        if let Some(discount) = payload.table_discount {
            money::require_non_negative("table_discount", discount)?;
        }
        if let Some(discount) = payload.amount_discount {
            money::require_non_negative("amount_discount", discount)?;
        }

        let reservation = self.storage.write(|txn| -> LedgerResult<Reservation> {
            let mut reservation = require_reservation(txn, reservation_id)?;
            if let Some(state) = payload.contact_state {
                reservation.contact_state = state;
            }
            if let Some(state) = payload.presence_state {
                reservation.presence_state = state;
            }
            if let Some(count) = payload.outlet_count {
                reservation.outlet_count = count;
            }
            if let Some(discount) = payload.table_discount {
                reservation.table_discount = discount;
            }
            if let Some(discount) = payload.amount_discount {
                reservation.amount_discount = discount;
            }
            if payload.notes.is_some() {
                reservation.notes = payload.notes;
            }
            if let Some(will_animate) = payload.will_animate {
                reservation.will_animate = will_animate;
            }
            reservation.updated_at = now_millis();
            txn.put(&reservation)?;
            Ok(reservation)
        })?;

        tracing::info!(reservation_id, "Reservation updated");
        Ok(reservation)
    }

    pub fn set_contact_state(
        &self,
        reservation_id: i64,
        state: ContactState,
    ) -> LedgerResult<Reservation> {
        self.update(
            reservation_id,
            ReservationUpdate {
                contact_state: Some(state),
                ..Default::default()
            },
        )
    }

    pub fn set_presence_state(
        &self,
        reservation_id: i64,
        state: PresenceState,
    ) -> LedgerResult<Reservation> {
        self.update(
            reservation_id,
            ReservationUpdate {
                presence_state: Some(state),
                ..Default::default()
            },
        )
    }

    /// Delete a reservation, releasing its tables and placements
    pub fn delete(&self, reservation_id: i64) -> LedgerResult<()> {
        self.storage.write(|txn| -> LedgerResult<()> {
            let reservation = require_reservation(txn, reservation_id)?;
            purge_reservation(txn, &reservation)
        })?;

        tracing::info!(reservation_id, "Reservation deleted");
        Ok(())
    }

    pub fn get(&self, reservation_id: i64) -> LedgerResult<Reservation> {
        self.storage.read(|view| require_reservation(view, reservation_id))
    }

    pub fn list(&self, festival_id: i64) -> LedgerResult<Vec<Reservation>> {
        self.storage.read(|view| {
            require_festival(view, festival_id)?;
            Ok(lookup::festival_reservations(view, festival_id)?)
        })
    }

    pub fn find_by_reservant(
        &self,
        festival_id: i64,
        reservant_id: i64,
    ) -> LedgerResult<Option<Reservation>> {
        let found = self.storage.read(|view| {
            view.filter(|r: &Reservation| {
                r.festival_id == festival_id && r.reservant_id == reservant_id
            })
        })?;
        Ok(found.into_iter().next())
    }

    // ========== Game instances ==========

    /// Register a game the reservation brings; it starts unplaced
    pub fn add_game(
        &self,
        reservation_id: i64,
        payload: GameInstanceCreate,
    ) -> LedgerResult<GameInstance> {
        if payload.copies < 1 {
            return Err(LedgerError::Validation("copies must be at least 1".into()));
        }

        let game = self.storage.write(|txn| -> LedgerResult<GameInstance> {
            require_reservation(txn, reservation_id)?;
            let now = now_millis();
            let game = GameInstance {
                id: txn.next_id()?,
                reservation_id,
                game_id: payload.game_id,
                copies: payload.copies,
                estimated_tables: payload.estimated_tables,
                plan_zone_id: None,
                tables: TableBreakdown::default(),
                received: false,
                created_at: now,
                updated_at: now,
            };
            txn.put(&game)?;
            Ok(game)
        })?;

        tracing::info!(
            reservation_id,
            game_instance_id = game.id,
            game_id = game.game_id,
            "Game added to reservation"
        );
        Ok(game)
    }

    /// Drop a game from the reservation, freeing any tables it occupied
    pub fn remove_game(&self, game_instance_id: i64) -> LedgerResult<()> {
        let game = self.storage.write(|txn| -> LedgerResult<GameInstance> {
            let game = require_game(txn, game_instance_id)?;
            txn.remove::<GameInstance>(game_instance_id)?;
            Ok(game)
        })?;

        tracing::info!(
            reservation_id = game.reservation_id,
            game_instance_id,
            freed_tables = game.consumed_tables(),
            "Game removed from reservation"
        );
        Ok(())
    }

    pub fn mark_received(
        &self,
        game_instance_id: i64,
        received: bool,
    ) -> LedgerResult<GameInstance> {
        let game = self.storage.write(|txn| -> LedgerResult<GameInstance> {
            let mut game = require_game(txn, game_instance_id)?;
            game.received = received;
            game.updated_at = now_millis();
            txn.put(&game)?;
            Ok(game)
        })?;

        tracing::info!(game_instance_id, received, "Game reception updated");
        Ok(game)
    }

    pub fn games(&self, reservation_id: i64) -> LedgerResult<Vec<GameInstance>> {
        self.storage.read(|view| {
            require_reservation(view, reservation_id)?;
            Ok(lookup::reservation_games(view, reservation_id)?)
        })
    }

    pub fn get_game(&self, game_instance_id: i64) -> LedgerResult<GameInstance> {
        self.storage.read(|view| require_game(view, game_instance_id))
    }
}
