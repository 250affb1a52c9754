use super::*;
use shared::models::{InvoiceAmounts, InvoiceEdit, PaymentStatus, ReservationUpdate, TableBreakdown};

/// Festival of 100 tables, zone A (60 @ 20), reservation R with 10 tables
/// from A and plan zone P of 8 tables
struct Scenario {
    ledger: FestivalLedger,
    festival: Festival,
    zone_a: TariffZone,
    reservation: Reservation,
    plan: PlanZone,
}

fn scenario() -> Scenario {
    let ledger = create_test_ledger();
    let festival = create_festival(&ledger, 100);
    let zone_a = tariff_zone(&ledger, festival.id, "A", 60, 20);
    let reservation = reserve(&ledger, festival.id, 1, &[(zone_a.id, 10)]);
    let plan = plan_zone(&ledger, festival.id, "P", 8);
    Scenario {
        ledger,
        festival,
        zone_a,
        reservation,
        plan,
    }
}

#[test]
fn test_second_zone_over_festival_capacity() {
    let ledger = create_test_ledger();
    let festival = create_festival(&ledger, 100);
    tariff_zone(&ledger, festival.id, "A", 60, 20);

    let err = ledger
        .tariff_zones()
        .create_zone(
            festival.id,
            TariffZoneCreate::new("B", 50, Decimal::from(15)),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::CapacityExceeded {
            capacity: 100,
            allocated: 60,
            requested: 50,
            ..
        }
    ));
    assert_eq!(ledger.tariff_zones().list_zones(festival.id).unwrap().len(), 1);
}

#[test]
fn test_plan_zone_fills_then_rejects() {
    let s = scenario();
    assert_eq!(s.ledger.budgets().budget(s.reservation.id).unwrap(), 10);

    let g1 = add_game(&s.ledger, s.reservation.id);
    let g2 = add_game(&s.ledger, s.reservation.id);
    s.ledger
        .placement()
        .place(g1.id, s.plan.id, TableBreakdown::new(6, 2, 0))
        .unwrap();
    assert_eq!(s.ledger.plan_zones().occupied_tables(s.plan.id).unwrap(), 8);

    let err = s
        .ledger
        .placement()
        .place(g2.id, s.plan.id, TableBreakdown::new(1, 0, 0))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::PlanZoneCapacityExceeded {
            capacity: 8,
            requested: 1,
            ..
        }
    ));
}

#[test]
fn test_placement_over_reservation_budget() {
    let s = scenario();
    let elsewhere = plan_zone(&s.ledger, s.festival.id, "Q", 40);
    let g1 = add_game(&s.ledger, s.reservation.id);
    let g2 = add_game(&s.ledger, s.reservation.id);

    s.ledger
        .placement()
        .place(g1.id, s.plan.id, TableBreakdown::new(6, 2, 0))
        .unwrap();
    let err = s
        .ledger
        .placement()
        .place(g2.id, elsewhere.id, TableBreakdown::new(3, 0, 0))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::ReservationBudgetExceeded {
            budget: 10,
            consumed: 8,
            requested: 3,
            ..
        }
    ));
    assert_eq!(s.ledger.budgets().remaining(s.reservation.id).unwrap(), 2);
}

#[test]
fn test_invoice_figures() {
    let s = scenario();
    s.ledger
        .reservations()
        .update(
            s.reservation.id,
            ReservationUpdate {
                outlet_count: Some(2),
                table_discount: Some(Decimal::ONE),
                amount_discount: Some(Decimal::from(5)),
                ..Default::default()
            },
        )
        .unwrap();

    let invoice = s.ledger.invoices().generate(s.reservation.id).unwrap();
    assert_eq!(
        invoice.amounts,
        InvoiceAmounts {
            table_revenue: Decimal::from(200),
            outlet_revenue: Decimal::from(10),
            gross: Decimal::from(210),
            discount: Decimal::from(25),
            total: Decimal::from(185),
        }
    );
    assert_eq!(invoice.status, PaymentStatus::Unpaid);
}

#[test]
fn test_committed_zone_cannot_be_deleted() {
    let s = scenario();
    assert!(matches!(
        s.ledger.tariff_zones().delete_zone(s.zone_a.id),
        Err(LedgerError::ZoneInUse {
            references: 1,
            tables_in_use: 10,
            ..
        })
    ));
    assert!(s.ledger.tariff_zones().get_zone(s.zone_a.id).is_ok());
}

#[test]
fn test_paid_invoice_rejects_update_and_delete() {
    let s = scenario();
    let invoices = s.ledger.invoices();
    let invoice = invoices.generate(s.reservation.id).unwrap();

    invoices.set_payment_status(invoice.id, "paye").unwrap();
    assert!(matches!(
        invoices.update(invoice.id, InvoiceEdit::default()),
        Err(LedgerError::InvoicePaid(id)) if id == invoice.id
    ));
    assert!(matches!(
        invoices.delete(invoice.id),
        Err(LedgerError::InvoicePaid(id)) if id == invoice.id
    ));
    assert_eq!(invoices.get(invoice.id).unwrap().status, PaymentStatus::Paid);
}

#[test]
fn test_festival_lifecycle_end_to_end() {
    let s = scenario();
    s.ledger.festivals().set_current(s.festival.id).unwrap();

    let g1 = add_game(&s.ledger, s.reservation.id);
    s.ledger
        .placement()
        .place(g1.id, s.plan.id, TableBreakdown::new(4, 0, 0))
        .unwrap();
    let invoice = s.ledger.invoices().generate(s.reservation.id).unwrap();

    // Unpaid invoices do not block the cascade
    s.ledger.festivals().delete(s.festival.id).unwrap();
    assert!(s.ledger.festivals().current().unwrap().is_none());
    assert!(matches!(
        s.ledger.invoices().get(invoice.id),
        Err(LedgerError::NoSuchInvoice(_))
    ));
    assert!(matches!(
        s.ledger.reservations().get_game(g1.id),
        Err(LedgerError::NoSuchGameInstance(_))
    ));
    assert!(matches!(
        s.ledger.plan_zones().get_zone(s.plan.id),
        Err(LedgerError::NoSuchZone(_))
    ));
}

#[test]
fn test_paid_invoice_blocks_festival_delete() {
    let s = scenario();
    let invoice = s.ledger.invoices().generate(s.reservation.id).unwrap();
    s.ledger
        .invoices()
        .set_payment_status(invoice.id, "paye")
        .unwrap();

    assert!(matches!(
        s.ledger.festivals().delete(s.festival.id),
        Err(LedgerError::InvoicePaid(_))
    ));
    // Nothing was removed
    assert!(s.ledger.reservations().get(s.reservation.id).is_ok());
    assert!(s.ledger.tariff_zones().get_zone(s.zone_a.id).is_ok());
}
