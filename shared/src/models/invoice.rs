//! Invoice Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Invoice payment status
///
/// `Paid` freezes the invoice: amounts can no longer be edited and the
/// invoice cannot be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "non_paye")]
    Unpaid,
    #[serde(rename = "partiel")]
    Partial,
    #[serde(rename = "paye")]
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "non_paye",
            Self::Partial => "partiel",
            Self::Paid => "paye",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid payment status: {0:?}")]
pub struct InvalidPaymentStatus(pub String);

impl FromStr for PaymentStatus {
    type Err = InvalidPaymentStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "non_paye" => Ok(Self::Unpaid),
            "partiel" => Ok(Self::Partial),
            "paye" => Ok(Self::Paid),
            other => Err(InvalidPaymentStatus(other.to_string())),
        }
    }
}

/// Billable amounts of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceAmounts {
    pub table_revenue: Decimal,
    pub outlet_revenue: Decimal,
    /// table_revenue + outlet_revenue
    pub gross: Decimal,
    pub discount: Decimal,
    /// gross - discount
    pub total: Decimal,
}

/// One printed line of an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub amount: Decimal,
}

/// Manual edit of an unpaid invoice
///
/// With no `lines`, one line per non-zero component is derived from
/// `amounts`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceEdit {
    pub amounts: InvoiceAmounts,
    #[serde(default)]
    pub lines: Vec<InvoiceLine>,
}

impl InvoiceEdit {
    pub fn new(amounts: InvoiceAmounts) -> Self {
        Self {
            amounts,
            lines: Vec::new(),
        }
    }

    pub fn with_lines(mut self, lines: Vec<InvoiceLine>) -> Self {
        self.lines = lines;
        self
    }
}

/// Invoice entity, at most one per reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub reservation_id: i64,
    pub festival_id: i64,
    /// FAC-YYYYMMDD-n
    pub number: String,
    pub issued_on: NaiveDate,
    pub amounts: InvoiceAmounts,
    pub status: PaymentStatus,
    pub lines: Vec<InvoiceLine>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Invoice {
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}

/// Billing recap row for one reservation of a festival
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingSummary {
    pub reservation_id: i64,
    pub reservant_id: i64,
    pub committed_tables: u64,
    /// Amounts computed from the current reservation state
    pub computed: InvoiceAmounts,
    pub invoice_number: Option<String>,
    pub status: Option<PaymentStatus>,
}
