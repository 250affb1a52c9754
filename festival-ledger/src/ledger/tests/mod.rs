use super::*;
use rust_decimal::Decimal;
use shared::models::{
    CommitmentRequest, Festival, FestivalCreate, GameInstance, GameInstanceCreate, PlanZone,
    PlanZoneCreate, Reservation, ReservationCreate, TariffZone, TariffZoneCreate,
};

mod test_scenarios;

fn create_test_ledger() -> FestivalLedger {
    FestivalLedger::open_in_memory().unwrap()
}

fn create_festival(ledger: &FestivalLedger, total_tables: u32) -> Festival {
    let mut payload = FestivalCreate::new("FJA 2026", total_tables);
    payload.outlet_unit_price = Decimal::from(5);
    ledger.festivals().create(payload).unwrap()
}

fn tariff_zone(
    ledger: &FestivalLedger,
    festival_id: i64,
    name: &str,
    quota: u32,
    price: i64,
) -> TariffZone {
    ledger
        .tariff_zones()
        .create_zone(
            festival_id,
            TariffZoneCreate::new(name, quota, Decimal::from(price)),
        )
        .unwrap()
}

fn plan_zone(ledger: &FestivalLedger, festival_id: i64, name: &str, quota: u32) -> PlanZone {
    ledger
        .plan_zones()
        .create_zone(festival_id, PlanZoneCreate::new(name, quota))
        .unwrap()
}

fn reserve(
    ledger: &FestivalLedger,
    festival_id: i64,
    reservant_id: i64,
    zones: &[(i64, u32)],
) -> Reservation {
    let mut payload = ReservationCreate::new(reservant_id);
    payload.zones = zones
        .iter()
        .map(|&(zone_id, count)| CommitmentRequest::new(zone_id, count))
        .collect();
    ledger.reservations().create(festival_id, payload).unwrap()
}

fn add_game(ledger: &FestivalLedger, reservation_id: i64) -> GameInstance {
    ledger
        .reservations()
        .add_game(reservation_id, GameInstanceCreate::new(1))
        .unwrap()
}
