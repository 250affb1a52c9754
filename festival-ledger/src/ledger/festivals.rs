//! Festival registry
//!
//! Owns festivals and the "current festival" pointer. The pointer is a single
//! value in the system table, so switching festivals is one atomic write.

use super::error::{LedgerError, LedgerResult};
use super::lookup::{self, require_festival};
use super::money;
use super::reservations::purge_reservation;
use super::storage::{CURRENT_FESTIVAL_KEY, LedgerStorage, LedgerTxn, RecordSource};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use chrono::NaiveDate;
use shared::models::{Festival, FestivalCreate, FestivalUpdate, Invoice, PlanZone, TariffZone};
use shared::util::now_millis;

/// Fail with `CapacityExceeded` when `requested` does not fit next to `allocated`
pub(crate) fn ensure_capacity(
    festival: &Festival,
    allocated: u64,
    requested: u64,
) -> LedgerResult<()> {
    let capacity = u64::from(festival.total_tables);
    if allocated + requested > capacity {
        tracing::debug!(
            festival_id = festival.id,
            capacity,
            allocated,
            requested,
            "Zone quota rejected"
        );
        return Err(LedgerError::CapacityExceeded {
            festival_id: festival.id,
            capacity,
            allocated,
            requested,
        });
    }
    Ok(())
}

fn validate_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> LedgerResult<()> {
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(LedgerError::Validation(format!(
            "end_date {end} is before start_date {start}"
        )));
    }
    Ok(())
}

fn ensure_unique_name(txn: &LedgerTxn, name: &str, except: Option<i64>) -> LedgerResult<()> {
    let clash = txn.filter(|f: &Festival| f.name == name && Some(f.id) != except)?;
    if !clash.is_empty() {
        return Err(LedgerError::DuplicateName {
            kind: "festival",
            name: name.to_string(),
        });
    }
    Ok(())
}

#[derive(Clone)]
pub struct FestivalRegistry {
    storage: LedgerStorage,
}

impl FestivalRegistry {
    pub fn new(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    pub fn create(&self, payload: FestivalCreate) -> LedgerResult<Festival> {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
        if payload.total_tables < 1 {
            return Err(LedgerError::Validation(
                "total_tables must be at least 1".into(),
            ));
        }
        money::validate_price("outlet_unit_price", payload.outlet_unit_price)?;
        validate_dates(payload.start_date, payload.end_date)?;

        let name = payload.name.trim().to_string();
        let festival = self.storage.write(|txn| {
            ensure_unique_name(txn, &name, None)?;

            let now = now_millis();
            let festival = Festival {
                id: txn.next_id()?,
                name,
                total_tables: payload.total_tables,
                outlet_unit_price: payload.outlet_unit_price,
                start_date: payload.start_date,
                end_date: payload.end_date,
                description: payload.description,
                created_at: now,
                updated_at: now,
            };
            txn.put(&festival)?;
            Ok::<_, LedgerError>(festival)
        })?;

        tracing::info!(
            festival_id = festival.id,
            total_tables = festival.total_tables,
            "Festival created"
        );
        Ok(festival)
    }

    /// Apply the allow-listed fields of `payload`
    ///
    /// The table capacity cannot shrink below what either zone partition
    /// already claims.
    pub fn update(&self, festival_id: i64, payload: FestivalUpdate) -> LedgerResult<Festival> {
        if payload.is_empty() {
            return Err(LedgerError::Validation("No fields to update".into()));
        }
        if let Some(name) = &payload.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
        if let Some(price) = payload.outlet_unit_price {
            money::validate_price("outlet_unit_price", price)?;
        }

        let festival = self.storage.write(|txn| -> LedgerResult<Festival> {
            let mut festival = require_festival(txn, festival_id)?;

            if let Some(name) = payload.name {
                let name = name.trim().to_string();
                ensure_unique_name(txn, &name, Some(festival_id))?;
                festival.name = name;
            }
            if let Some(total_tables) = payload.total_tables {
                if total_tables < 1 {
                    return Err(LedgerError::Validation(
                        "total_tables must be at least 1".into(),
                    ));
                }
                let tariff: u64 = txn
                    .filter(|z: &TariffZone| z.festival_id == festival_id)?
                    .iter()
                    .map(|z| u64::from(z.table_quota))
                    .sum();
                let plan: u64 = txn
                    .filter(|z: &PlanZone| z.festival_id == festival_id)?
                    .iter()
                    .map(|z| u64::from(z.table_quota))
                    .sum();
                let allocated = tariff.max(plan);
                if allocated > u64::from(total_tables) {
                    return Err(LedgerError::CapacityExceeded {
                        festival_id,
                        capacity: u64::from(total_tables),
                        allocated,
                        requested: 0,
                    });
                }
                festival.total_tables = total_tables;
            }
            if let Some(price) = payload.outlet_unit_price {
                festival.outlet_unit_price = price;
            }
            if payload.start_date.is_some() {
                festival.start_date = payload.start_date;
            }
            if payload.end_date.is_some() {
                festival.end_date = payload.end_date;
            }
            if payload.description.is_some() {
                festival.description = payload.description;
            }
            validate_dates(festival.start_date, festival.end_date)?;

            festival.updated_at = now_millis();
            txn.put(&festival)?;
            Ok(festival)
        })?;

        tracing::info!(festival_id, "Festival updated");
        Ok(festival)
    }

    /// Delete a festival with everything it owns
    pub fn delete(&self, festival_id: i64) -> LedgerResult<()> {
        self.storage.write(|txn| {
            require_festival(txn, festival_id)?;

            let paid = txn.filter(|i: &Invoice| i.festival_id == festival_id && i.is_paid())?;
            if let Some(invoice) = paid.first() {
                return Err(LedgerError::InvoicePaid(invoice.id));
            }

            for reservation in lookup::festival_reservations(txn, festival_id)? {
                purge_reservation(txn, &reservation)?;
            }
            for zone in txn.filter(|z: &TariffZone| z.festival_id == festival_id)? {
                txn.remove::<TariffZone>(zone.id)?;
            }
            for zone in txn.filter(|z: &PlanZone| z.festival_id == festival_id)? {
                txn.remove::<PlanZone>(zone.id)?;
            }
            if txn.system_value(CURRENT_FESTIVAL_KEY)? == Some(festival_id) {
                txn.clear_system_value(CURRENT_FESTIVAL_KEY)?;
            }
            txn.remove::<Festival>(festival_id)?;
            Ok::<_, LedgerError>(())
        })?;

        tracing::info!(festival_id, "Festival deleted");
        Ok(())
    }

    /// Make `festival_id` the current festival, replacing the previous one
    pub fn set_current(&self, festival_id: i64) -> LedgerResult<()> {
        let previous = self.storage.write(|txn| {
            require_festival(txn, festival_id)?;
            let previous = txn.system_value(CURRENT_FESTIVAL_KEY)?;
            txn.set_system_value(CURRENT_FESTIVAL_KEY, festival_id)?;
            Ok::<_, LedgerError>(previous)
        })?;

        tracing::info!(festival_id, previous = ?previous, "Current festival set");
        Ok(())
    }

    pub fn clear_current(&self) -> LedgerResult<()> {
        let previous = self.storage.write(|txn| -> LedgerResult<Option<i64>> {
            let previous = txn.system_value(CURRENT_FESTIVAL_KEY)?;
            txn.clear_system_value(CURRENT_FESTIVAL_KEY)?;
            Ok(previous)
        })?;

        tracing::info!(previous = ?previous, "Current festival cleared");
        Ok(())
    }

    pub fn current(&self) -> LedgerResult<Option<Festival>> {
        self.storage.read(|view| match view.system_value(CURRENT_FESTIVAL_KEY)? {
            Some(id) => Ok(view.get(id)?),
            None => Ok(None),
        })
    }

    pub fn get(&self, festival_id: i64) -> LedgerResult<Festival> {
        self.storage.read(|view| require_festival(view, festival_id))
    }

    pub fn list(&self) -> LedgerResult<Vec<Festival>> {
        Ok(self.storage.read(|view| view.scan::<Festival>())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn create_test_registry() -> FestivalRegistry {
        FestivalRegistry::new(LedgerStorage::open_in_memory().unwrap())
    }

    #[test]
    fn test_create_festival() {
        let registry = create_test_registry();
        let mut payload = FestivalCreate::new("  FJA 2026 ", 120);
        payload.outlet_unit_price = Decimal::from(5);

        let festival = registry.create(payload).unwrap();
        assert_eq!(festival.name, "FJA 2026");
        assert_eq!(festival.total_tables, 120);
        assert_eq!(registry.get(festival.id).unwrap(), festival);
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let registry = create_test_registry();
        assert!(matches!(
            registry.create(FestivalCreate::new("FJA", 0)),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            registry.create(FestivalCreate::new("", 10)),
            Err(LedgerError::Validation(_))
        ));

        let mut payload = FestivalCreate::new("FJA", 10);
        payload.start_date = NaiveDate::from_ymd_opt(2026, 3, 2);
        payload.end_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        assert!(matches!(
            registry.create(payload),
            Err(LedgerError::Validation(_))
        ));

        let mut payload = FestivalCreate::new("FJA", 10);
        payload.outlet_unit_price = Decimal::from(-5);
        assert!(matches!(
            registry.create(payload),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_duplicate_festival_name() {
        let registry = create_test_registry();
        registry.create(FestivalCreate::new("FJA", 10)).unwrap();
        assert!(matches!(
            registry.create(FestivalCreate::new("FJA", 20)),
            Err(LedgerError::DuplicateName { kind: "festival", .. })
        ));
    }

    #[test]
    fn test_update_requires_fields() {
        let registry = create_test_registry();
        let festival = registry.create(FestivalCreate::new("FJA", 10)).unwrap();
        assert!(matches!(
            registry.update(festival.id, FestivalUpdate::default()),
            Err(LedgerError::Validation(_))
        ));

        let updated = registry
            .update(
                festival.id,
                FestivalUpdate {
                    total_tables: Some(40),
                    description: Some("Spring edition".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.total_tables, 40);
        assert_eq!(updated.description.as_deref(), Some("Spring edition"));
        assert_eq!(updated.name, "FJA");
    }

    #[test]
    fn test_current_festival_is_single_pointer() {
        let registry = create_test_registry();
        let a = registry.create(FestivalCreate::new("2025", 10)).unwrap();
        let b = registry.create(FestivalCreate::new("2026", 10)).unwrap();

        assert!(registry.current().unwrap().is_none());

        registry.set_current(a.id).unwrap();
        assert_eq!(registry.current().unwrap().unwrap().id, a.id);

        registry.set_current(b.id).unwrap();
        assert_eq!(registry.current().unwrap().unwrap().id, b.id);

        assert!(matches!(
            registry.set_current(9999),
            Err(LedgerError::NoSuchFestival(9999))
        ));
        assert_eq!(registry.current().unwrap().unwrap().id, b.id);

        registry.clear_current().unwrap();
        assert!(registry.current().unwrap().is_none());
    }

    #[test]
    fn test_delete_clears_current() {
        let registry = create_test_registry();
        let festival = registry.create(FestivalCreate::new("FJA", 10)).unwrap();
        registry.set_current(festival.id).unwrap();

        registry.delete(festival.id).unwrap();
        assert!(registry.current().unwrap().is_none());
        assert!(matches!(
            registry.get(festival.id),
            Err(LedgerError::NoSuchFestival(_))
        ));
        assert!(registry.list().unwrap().is_empty());
    }
}
