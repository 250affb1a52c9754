//! Invoice Calculator
//!
//! Billing figures are derived from a reservation's commitments, using the
//! unit price captured when each commitment was made, plus the festival's
//! outlet price and the reservation's manual discounts. A reservation has at
//! most one invoice; once it is paid it can no longer be edited or deleted.

use super::error::{LedgerError, LedgerResult};
use super::lookup::{self, require_festival, require_invoice, require_reservation};
use super::money::{self, round_money};
use super::storage::{INVOICE_COUNT_KEY, LedgerStorage, LedgerTxn, RecordSource, StorageResult};
use rust_decimal::Decimal;
use shared::models::{
    BillingSummary, Invoice, InvoiceAmounts, InvoiceEdit, InvoiceLine, PaymentStatus, Reservation,
    TariffZone, ZoneCommitment,
};
use shared::util::{now_millis, today};

/// Amounts and line items computed for a reservation
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub amounts: InvoiceAmounts,
    pub lines: Vec<InvoiceLine>,
}

/// Compute the billing of a reservation
///
/// `commitments` pairs each commitment with the name of its tariff zone.
///
/// ```text
/// table_revenue = Σ(table_count × unit_price)
/// outlet_revenue = outlet_count × outlet_unit_price
/// gross = table_revenue + outlet_revenue
/// discount = amount_discount + table_discount × (table_revenue / Σ table_count)
/// total = gross - discount
/// ```
pub fn compute(
    reservation: &Reservation,
    outlet_unit_price: Decimal,
    commitments: &[(ZoneCommitment, String)],
) -> InvoiceDraft {
    let mut lines = Vec::with_capacity(commitments.len() + 3);

    let mut table_revenue = Decimal::ZERO;
    let mut table_count: u64 = 0;
    for (commitment, zone_name) in commitments {
        let quantity = Decimal::from(commitment.table_count);
        let amount = quantity * commitment.unit_price;
        table_revenue += amount;
        table_count += u64::from(commitment.table_count);
        lines.push(InvoiceLine {
            description: format!("Tables - {zone_name}"),
            quantity,
            unit_price: commitment.unit_price,
            amount: round_money(amount),
        });
    }
    let table_revenue = round_money(table_revenue);

    let outlet_revenue = round_money(Decimal::from(reservation.outlet_count) * outlet_unit_price);
    if reservation.outlet_count > 0 {
        lines.push(InvoiceLine {
            description: "Electrical outlets".to_string(),
            quantity: Decimal::from(reservation.outlet_count),
            unit_price: outlet_unit_price,
            amount: outlet_revenue,
        });
    }

    let average_table_price = if table_count == 0 {
        Decimal::ZERO
    } else {
        table_revenue / Decimal::from(table_count)
    };
    let table_discount_value = round_money(average_table_price * reservation.table_discount);
    if !reservation.table_discount.is_zero() {
        lines.push(InvoiceLine {
            description: "Table discount".to_string(),
            quantity: reservation.table_discount,
            unit_price: -round_money(average_table_price),
            amount: -table_discount_value,
        });
    }
    if !reservation.amount_discount.is_zero() {
        lines.push(InvoiceLine {
            description: "Discount".to_string(),
            quantity: Decimal::ONE,
            unit_price: -reservation.amount_discount,
            amount: -reservation.amount_discount,
        });
    }

    let gross = table_revenue + outlet_revenue;
    let discount = round_money(reservation.amount_discount + table_discount_value);
    InvoiceDraft {
        amounts: InvoiceAmounts {
            table_revenue,
            outlet_revenue,
            gross,
            discount,
            total: gross - discount,
        },
        lines,
    }
}

/// Load what `compute` needs for a reservation and run it
fn draft_for(src: &impl RecordSource, reservation: &Reservation) -> LedgerResult<InvoiceDraft> {
    let festival = require_festival(src, reservation.festival_id)?;
    let commitments = named_commitments(src, reservation.id)?;
    Ok(compute(reservation, festival.outlet_unit_price, &commitments))
}

fn named_commitments(
    src: &impl RecordSource,
    reservation_id: i64,
) -> StorageResult<Vec<(ZoneCommitment, String)>> {
    lookup::reservation_commitments(src, reservation_id)?
        .into_iter()
        .map(|c| -> StorageResult<(ZoneCommitment, String)> {
            let name = match src.get::<TariffZone>(c.tariff_zone_id)? {
                Some(zone) => zone.name,
                None => format!("zone {}", c.tariff_zone_id),
            };
            Ok((c, name))
        })
        .collect()
}

/// One line per non-zero component of manually set amounts
fn lines_for(amounts: &InvoiceAmounts) -> Vec<InvoiceLine> {
    let flat = |description: &str, amount: Decimal| InvoiceLine {
        description: description.to_string(),
        quantity: Decimal::ONE,
        unit_price: amount,
        amount,
    };
    let mut lines = Vec::with_capacity(3);
    if !amounts.table_revenue.is_zero() {
        lines.push(flat("Tables", amounts.table_revenue));
    }
    if !amounts.outlet_revenue.is_zero() {
        lines.push(flat("Electrical outlets", amounts.outlet_revenue));
    }
    if !amounts.discount.is_zero() {
        lines.push(flat("Discount", -amounts.discount));
    }
    lines
}

fn require_unpaid(txn: &LedgerTxn, invoice_id: i64) -> LedgerResult<Invoice> {
    let invoice = require_invoice(txn, invoice_id)?;
    if invoice.is_paid() {
        return Err(LedgerError::InvoicePaid(invoice_id));
    }
    Ok(invoice)
}

#[derive(Clone)]
pub struct InvoiceCalculator {
    storage: LedgerStorage,
}

impl InvoiceCalculator {
    pub fn new(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    /// Create the invoice of a reservation from its current state
    ///
    /// Numbers are `FAC-<issue date>-<counter>`, the counter being shared by
    /// all festivals and never reused.
    pub fn generate(&self, reservation_id: i64) -> LedgerResult<Invoice> {
        let invoice = self.storage.write(|txn| -> LedgerResult<Invoice> {
            let reservation = require_reservation(txn, reservation_id)?;
            if let Some(existing) = lookup::reservation_invoice(txn, reservation_id)? {
                return Err(LedgerError::InvoiceAlreadyExists {
                    reservation_id,
                    invoice_id: existing.id,
                });
            }

            let draft = draft_for(txn, &reservation)?;
            let issued_on = today();
            let counter = txn.increment(INVOICE_COUNT_KEY)?;
            let now = now_millis();
            let invoice = Invoice {
                id: txn.next_id()?,
                reservation_id,
                festival_id: reservation.festival_id,
                number: format!("FAC-{}-{counter:05}", issued_on.format("%Y%m%d")),
                issued_on,
                amounts: draft.amounts,
                status: PaymentStatus::Unpaid,
                lines: draft.lines,
                created_at: now,
                updated_at: now,
            };
            txn.put(&invoice)?;
            Ok(invoice)
        })?;

        tracing::info!(
            reservation_id,
            invoice_id = invoice.id,
            number = %invoice.number,
            total = %invoice.amounts.total,
            "Invoice generated"
        );
        Ok(invoice)
    }

    /// Overwrite the amounts and line items of an unpaid invoice
    ///
    /// The four components must be non-negative and `gross` must equal
    /// `table_revenue + outlet_revenue`; the total is recomputed as gross
    /// minus discount. Supplied lines must sum to that total.
    pub fn update(&self, invoice_id: i64, edit: InvoiceEdit) -> LedgerResult<Invoice> {
        let InvoiceEdit { amounts, lines } = edit;
        money::require_non_negative("table_revenue", amounts.table_revenue)?;
        money::require_non_negative("outlet_revenue", amounts.outlet_revenue)?;
        money::require_non_negative("gross", amounts.gross)?;
        money::require_non_negative("discount", amounts.discount)?;
        if amounts.gross != amounts.table_revenue + amounts.outlet_revenue {
            return Err(LedgerError::InvalidAmount {
                field: "gross",
                value: amounts.gross,
            });
        }

        let amounts = InvoiceAmounts {
            total: amounts.gross - amounts.discount,
            ..amounts
        };
        let lines = if lines.is_empty() {
            lines_for(&amounts)
        } else {
            let line_sum: Decimal = lines.iter().map(|l| l.amount).sum();
            if line_sum != amounts.total {
                return Err(LedgerError::InvalidAmount {
                    field: "lines",
                    value: line_sum,
                });
            }
            lines
        };

        let invoice = self.storage.write(|txn| -> LedgerResult<Invoice> {
            let mut invoice = require_unpaid(txn, invoice_id)?;
            invoice.amounts = amounts;
            invoice.lines = lines;
            invoice.updated_at = now_millis();
            txn.put(&invoice)?;
            Ok(invoice)
        })?;

        tracing::info!(invoice_id, total = %invoice.amounts.total, "Invoice updated");
        Ok(invoice)
    }

    /// Recompute amounts and line items of an unpaid invoice
    pub fn regenerate(&self, invoice_id: i64) -> LedgerResult<Invoice> {
        let invoice = self.storage.write(|txn| -> LedgerResult<Invoice> {
            let mut invoice = require_unpaid(txn, invoice_id)?;
            let reservation = require_reservation(txn, invoice.reservation_id)?;

            let draft = draft_for(txn, &reservation)?;
            invoice.amounts = draft.amounts;
            invoice.lines = draft.lines;
            invoice.updated_at = now_millis();
            txn.put(&invoice)?;
            Ok(invoice)
        })?;

        tracing::info!(invoice_id, total = %invoice.amounts.total, "Invoice regenerated");
        Ok(invoice)
    }

    pub fn delete(&self, invoice_id: i64) -> LedgerResult<()> {
        self.storage.write(|txn| -> LedgerResult<()> {
            require_unpaid(txn, invoice_id)?;
            txn.remove::<Invoice>(invoice_id)?;
            Ok(())
        })?;

        tracing::info!(invoice_id, "Invoice deleted");
        Ok(())
    }

    /// Set the payment status from its wire name
    ///
    /// Accepts `non_paye`, `partiel` and `paye`. Leaving `paye` is allowed.
    pub fn set_payment_status(&self, invoice_id: i64, status: &str) -> LedgerResult<Invoice> {
        let status: PaymentStatus = status
            .parse()
            .map_err(|e: shared::models::InvalidPaymentStatus| LedgerError::InvalidStatus(e.0))?;

        let (invoice, previous) =
            self.storage
                .write(|txn| -> LedgerResult<(Invoice, PaymentStatus)> {
                    let mut invoice = require_invoice(txn, invoice_id)?;
                    let previous = invoice.status;
                    invoice.status = status;
                    invoice.updated_at = now_millis();
                    txn.put(&invoice)?;
                    Ok((invoice, previous))
                })?;

        if previous == PaymentStatus::Paid && status != PaymentStatus::Paid {
            tracing::warn!(invoice_id, status = %status, "Paid invoice reopened");
        } else {
            tracing::info!(invoice_id, status = %status, "Invoice payment status set");
        }
        Ok(invoice)
    }

    pub fn get(&self, invoice_id: i64) -> LedgerResult<Invoice> {
        self.storage.read(|view| require_invoice(view, invoice_id))
    }

    pub fn find_by_reservation(&self, reservation_id: i64) -> LedgerResult<Option<Invoice>> {
        Ok(self
            .storage
            .read(|view| lookup::reservation_invoice(view, reservation_id))?)
    }

    /// Invoices of a festival, newest first
    pub fn list(&self, festival_id: i64) -> LedgerResult<Vec<Invoice>> {
        self.storage.read(|view| {
            require_festival(view, festival_id)?;
            let mut invoices = view.filter(|i: &Invoice| i.festival_id == festival_id)?;
            invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(invoices)
        })
    }

    /// Computed billing of every reservation of a festival, with its invoice
    /// when one exists
    pub fn billing_summary(&self, festival_id: i64) -> LedgerResult<Vec<BillingSummary>> {
        self.storage.read(|view| {
            let festival = require_festival(view, festival_id)?;
            lookup::festival_reservations(view, festival_id)?
                .into_iter()
                .map(|reservation| -> LedgerResult<BillingSummary> {
                    let commitments = named_commitments(view, reservation.id)?;
                    let committed: Vec<ZoneCommitment> =
                        commitments.iter().map(|(c, _)| c.clone()).collect();
                    let draft = compute(&reservation, festival.outlet_unit_price, &commitments);
                    let invoice = lookup::reservation_invoice(view, reservation.id)?;
                    Ok(BillingSummary {
                        reservation_id: reservation.id,
                        reservant_id: reservation.reservant_id,
                        committed_tables: lookup::committed_tables(&committed),
                        computed: draft.amounts,
                        invoice_number: invoice.as_ref().map(|i| i.number.clone()),
                        status: invoice.map(|i| i.status),
                    })
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::FestivalLedger;
    use shared::models::{
        CommitmentRequest, ContactState, FestivalCreate, PresenceState, ReservationCreate,
        ReservationUpdate, TariffZoneCreate, TariffZoneUpdate,
    };

    fn reservation(outlets: u32, table_discount: Decimal, amount_discount: Decimal) -> Reservation {
        Reservation {
            id: 1,
            festival_id: 1,
            reservant_id: 1,
            contact_state: ContactState::Reserved,
            presence_state: PresenceState::Undefined,
            outlet_count: outlets,
            table_discount,
            amount_discount,
            notes: None,
            will_animate: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn commitment(tables: u32, price: Decimal) -> ZoneCommitment {
        ZoneCommitment {
            id: 1,
            reservation_id: 1,
            tariff_zone_id: 1,
            table_count: tables,
            unit_price: price,
            created_at: 0,
        }
    }

    /// Festival (outlet price 5) with zone A at 20 per table and a
    /// reservation committing 10 tables with 2 outlets and both discounts
    fn create_billed_reservation() -> (FestivalLedger, i64) {
        let ledger = FestivalLedger::open_in_memory().unwrap();
        let mut festival = FestivalCreate::new("FJA", 100);
        festival.outlet_unit_price = Decimal::from(5);
        let festival = ledger.festivals().create(festival).unwrap();
        let zone = ledger
            .tariff_zones()
            .create_zone(festival.id, TariffZoneCreate::new("A", 60, Decimal::from(20)))
            .unwrap();

        let mut payload = ReservationCreate::new(7);
        payload.outlet_count = 2;
        payload.zones = vec![CommitmentRequest::new(zone.id, 10)];
        let reservation = ledger.reservations().create(festival.id, payload).unwrap();
        ledger
            .reservations()
            .update(
                reservation.id,
                ReservationUpdate {
                    table_discount: Some(Decimal::ONE),
                    amount_discount: Some(Decimal::from(5)),
                    ..Default::default()
                },
            )
            .unwrap();
        (ledger, reservation.id)
    }

    #[test]
    fn test_compute_formulas() {
        let r = reservation(2, Decimal::ONE, Decimal::from(5));
        let draft = compute(
            &r,
            Decimal::from(5),
            &[(commitment(10, Decimal::from(20)), "A".to_string())],
        );
        assert_eq!(draft.amounts.table_revenue, Decimal::from(200));
        assert_eq!(draft.amounts.outlet_revenue, Decimal::from(10));
        assert_eq!(draft.amounts.gross, Decimal::from(210));
        assert_eq!(draft.amounts.discount, Decimal::from(25));
        assert_eq!(draft.amounts.total, Decimal::from(185));

        let descriptions: Vec<&str> = draft.lines.iter().map(|l| l.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["Tables - A", "Electrical outlets", "Table discount", "Discount"]
        );
        assert_eq!(draft.lines[2].amount, Decimal::from(-20));
        let line_sum: Decimal = draft.lines.iter().map(|l| l.amount).sum();
        assert_eq!(line_sum, draft.amounts.total);
    }

    #[test]
    fn test_compute_average_price_across_zones() {
        // 4 × 20 + 6 × 15 = 170 over 10 tables, average 17
        let r = reservation(0, Decimal::new(15, 1), Decimal::ZERO);
        let draft = compute(
            &r,
            Decimal::from(5),
            &[
                (commitment(4, Decimal::from(20)), "A".to_string()),
                (commitment(6, Decimal::from(15)), "B".to_string()),
            ],
        );
        assert_eq!(draft.amounts.table_revenue, Decimal::from(170));
        assert_eq!(draft.amounts.discount, Decimal::new(2550, 2));
        assert_eq!(draft.amounts.total, Decimal::new(14450, 2));
        assert_eq!(draft.lines.len(), 3);
    }

    #[test]
    fn test_compute_without_tables() {
        let r = reservation(3, Decimal::from(2), Decimal::ZERO);
        let draft = compute(&r, Decimal::new(750, 2), &[]);
        assert_eq!(draft.amounts.table_revenue, Decimal::ZERO);
        assert_eq!(draft.amounts.outlet_revenue, Decimal::new(2250, 2));
        // No committed tables: the table discount is worth nothing
        assert_eq!(draft.amounts.discount, Decimal::ZERO);
        assert_eq!(draft.amounts.total, Decimal::new(2250, 2));
    }

    #[test]
    fn test_generate_invoice() {
        let (ledger, reservation_id) = create_billed_reservation();
        let invoices = ledger.invoices();

        let invoice = invoices.generate(reservation_id).unwrap();
        assert_eq!(invoice.amounts.total, Decimal::from(185));
        assert_eq!(invoice.status, PaymentStatus::Unpaid);
        assert_eq!(invoice.issued_on, today());
        assert!(invoice.number.starts_with("FAC-"));
        assert!(invoice.number.ends_with("-00001"));

        assert!(matches!(
            invoices.generate(reservation_id),
            Err(LedgerError::InvoiceAlreadyExists { invoice_id, .. }) if invoice_id == invoice.id
        ));
        assert!(matches!(
            invoices.generate(9999),
            Err(LedgerError::NoSuchReservation(9999))
        ));
        assert_eq!(
            invoices.find_by_reservation(reservation_id).unwrap(),
            Some(invoice)
        );
    }

    #[test]
    fn test_invoice_uses_committed_price() {
        let (ledger, reservation_id) = create_billed_reservation();
        let zone_id = ledger.budgets().commitments(reservation_id).unwrap()[0].tariff_zone_id;

        // Price edits are refused once tables are committed against the zone
        assert!(
            ledger
                .tariff_zones()
                .update_zone(
                    zone_id,
                    TariffZoneUpdate {
                        price_per_table: Some(Decimal::from(99)),
                        ..Default::default()
                    },
                )
                .is_err()
        );
        let invoice = ledger.invoices().generate(reservation_id).unwrap();
        assert_eq!(invoice.amounts.table_revenue, Decimal::from(200));
    }

    #[test]
    fn test_paid_invoice_is_frozen() {
        let (ledger, reservation_id) = create_billed_reservation();
        let invoices = ledger.invoices();
        let invoice = invoices.generate(reservation_id).unwrap();

        invoices.set_payment_status(invoice.id, "paye").unwrap();
        assert!(matches!(
            invoices.update(invoice.id, InvoiceEdit::new(invoice.amounts)),
            Err(LedgerError::InvoicePaid(_))
        ));
        assert!(matches!(
            invoices.delete(invoice.id),
            Err(LedgerError::InvoicePaid(_))
        ));
        assert!(matches!(
            invoices.regenerate(invoice.id),
            Err(LedgerError::InvoicePaid(_))
        ));
        assert!(matches!(
            ledger.reservations().delete(reservation_id),
            Err(LedgerError::InvoicePaid(_))
        ));

        // Reopening is allowed, after which edits work again
        let reopened = invoices.set_payment_status(invoice.id, "partiel").unwrap();
        assert_eq!(reopened.status, PaymentStatus::Partial);
        invoices.delete(invoice.id).unwrap();
        assert!(matches!(
            invoices.get(invoice.id),
            Err(LedgerError::NoSuchInvoice(_))
        ));
    }

    #[test]
    fn test_invalid_status() {
        let (ledger, reservation_id) = create_billed_reservation();
        let invoice = ledger.invoices().generate(reservation_id).unwrap();
        assert!(matches!(
            ledger.invoices().set_payment_status(invoice.id, "paid"),
            Err(LedgerError::InvalidStatus(value)) if value == "paid"
        ));
        assert_eq!(
            ledger.invoices().get(invoice.id).unwrap().status,
            PaymentStatus::Unpaid
        );
    }

    fn line_sum(invoice: &Invoice) -> Decimal {
        invoice.lines.iter().map(|l| l.amount).sum()
    }

    #[test]
    fn test_update_amounts() {
        let (ledger, reservation_id) = create_billed_reservation();
        let invoices = ledger.invoices();
        let invoice = invoices.generate(reservation_id).unwrap();
        assert_eq!(line_sum(&invoice), invoice.amounts.total);

        let amounts = InvoiceAmounts {
            table_revenue: Decimal::from(150),
            outlet_revenue: Decimal::from(10),
            gross: Decimal::from(160),
            discount: Decimal::from(10),
            total: Decimal::ZERO,
        };
        let updated = invoices.update(invoice.id, InvoiceEdit::new(amounts)).unwrap();
        assert_eq!(updated.amounts.total, Decimal::from(150));
        assert_eq!(line_sum(&updated), updated.amounts.total);
        assert_eq!(updated.lines.len(), 3);
        assert_eq!(updated.number, invoice.number);

        // Stored invoice keeps lines and total in agreement
        let stored = invoices.get(invoice.id).unwrap();
        assert_eq!(line_sum(&stored), Decimal::from(150));

        let negative = InvoiceAmounts {
            discount: Decimal::from(-1),
            ..amounts
        };
        assert!(matches!(
            invoices.update(invoice.id, InvoiceEdit::new(negative)),
            Err(LedgerError::InvalidAmount { field: "discount", .. })
        ));

        let regenerated = invoices.regenerate(invoice.id).unwrap();
        assert_eq!(regenerated.amounts.total, Decimal::from(185));
        assert_eq!(line_sum(&regenerated), Decimal::from(185));
    }

    #[test]
    fn test_update_only_table_revenue() {
        let (ledger, reservation_id) = create_billed_reservation();
        let invoices = ledger.invoices();
        let invoice = invoices.generate(reservation_id).unwrap();

        let amounts = InvoiceAmounts {
            table_revenue: Decimal::from(150),
            gross: Decimal::from(150),
            ..Default::default()
        };
        let updated = invoices.update(invoice.id, InvoiceEdit::new(amounts)).unwrap();
        assert_eq!(updated.amounts.total, Decimal::from(150));
        assert_eq!(line_sum(&updated), Decimal::from(150));
    }

    #[test]
    fn test_update_rejects_inconsistent_figures() {
        let (ledger, reservation_id) = create_billed_reservation();
        let invoices = ledger.invoices();
        let invoice = invoices.generate(reservation_id).unwrap();

        let bad_gross = InvoiceAmounts {
            table_revenue: Decimal::from(150),
            outlet_revenue: Decimal::from(10),
            gross: Decimal::from(999),
            discount: Decimal::ZERO,
            total: Decimal::ZERO,
        };
        assert!(matches!(
            invoices.update(invoice.id, InvoiceEdit::new(bad_gross)),
            Err(LedgerError::InvalidAmount { field: "gross", .. })
        ));

        let amounts = InvoiceAmounts {
            gross: Decimal::from(160),
            ..bad_gross
        };
        let short_lines = vec![InvoiceLine {
            description: "Tables - A".to_string(),
            quantity: Decimal::from(5),
            unit_price: Decimal::from(20),
            amount: Decimal::from(100),
        }];
        assert!(matches!(
            invoices.update(invoice.id, InvoiceEdit::new(amounts).with_lines(short_lines)),
            Err(LedgerError::InvalidAmount { field: "lines", value }) if value == Decimal::from(100)
        ));

        // Nothing was written by the rejected edits
        assert_eq!(invoices.get(invoice.id).unwrap(), invoice);
    }

    #[test]
    fn test_update_with_supplied_lines() {
        let (ledger, reservation_id) = create_billed_reservation();
        let invoices = ledger.invoices();
        let invoice = invoices.generate(reservation_id).unwrap();

        let amounts = InvoiceAmounts {
            table_revenue: Decimal::from(100),
            outlet_revenue: Decimal::ZERO,
            gross: Decimal::from(100),
            discount: Decimal::from(20),
            total: Decimal::ZERO,
        };
        let lines = vec![
            InvoiceLine {
                description: "Tables - A".to_string(),
                quantity: Decimal::from(5),
                unit_price: Decimal::from(20),
                amount: Decimal::from(100),
            },
            InvoiceLine {
                description: "Goodwill".to_string(),
                quantity: Decimal::ONE,
                unit_price: Decimal::from(-20),
                amount: Decimal::from(-20),
            },
        ];
        let updated = invoices
            .update(invoice.id, InvoiceEdit::new(amounts).with_lines(lines.clone()))
            .unwrap();
        assert_eq!(updated.lines, lines);
        assert_eq!(updated.amounts.total, Decimal::from(80));
    }

    #[test]
    fn test_numbers_are_sequential_and_listing() {
        let (ledger, first) = create_billed_reservation();
        let festival_id = ledger.reservations().get(first).unwrap().festival_id;
        let second = ledger
            .reservations()
            .create(festival_id, ReservationCreate::new(8))
            .unwrap();

        let a = ledger.invoices().generate(first).unwrap();
        let b = ledger.invoices().generate(second.id).unwrap();
        assert!(a.number.ends_with("-00001"));
        assert!(b.number.ends_with("-00002"));

        // Deleting does not free the number
        ledger.invoices().delete(b.id).unwrap();
        let c = ledger.invoices().generate(second.id).unwrap();
        assert!(c.number.ends_with("-00003"));

        let listed: Vec<i64> = ledger
            .invoices()
            .list(festival_id)
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(listed.len(), 2);
        assert!(listed.contains(&a.id) && listed.contains(&c.id));
    }

    #[test]
    fn test_billing_summary() {
        let (ledger, reservation_id) = create_billed_reservation();
        let festival_id = ledger.reservations().get(reservation_id).unwrap().festival_id;
        let other = ledger
            .reservations()
            .create(festival_id, ReservationCreate::new(8))
            .unwrap();
        let invoice = ledger.invoices().generate(reservation_id).unwrap();

        let summary = ledger.invoices().billing_summary(festival_id).unwrap();
        assert_eq!(summary.len(), 2);

        let billed = summary
            .iter()
            .find(|s| s.reservation_id == reservation_id)
            .unwrap();
        assert_eq!(billed.committed_tables, 10);
        assert_eq!(billed.computed.total, Decimal::from(185));
        assert_eq!(billed.invoice_number.as_deref(), Some(invoice.number.as_str()));
        assert_eq!(billed.status, Some(PaymentStatus::Unpaid));

        let pending = summary
            .iter()
            .find(|s| s.reservation_id == other.id)
            .unwrap();
        assert_eq!(pending.committed_tables, 0);
        assert_eq!(pending.computed.total, Decimal::ZERO);
        assert!(pending.invoice_number.is_none());
    }
}
