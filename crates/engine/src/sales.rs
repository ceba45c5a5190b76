//! Sales receipts and their payment splits.
//!
//! A receipt is the unit of revenue; its payment splits say how the guest
//! paid. For a given receipt the split amounts should add up to the
//! receipt's tax-inclusive total. The engine does not enforce this, it
//! reports violations as a monthly warning.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Receipt lifecycle status.
///
/// Only `Posted` and `Refunded` receipts participate in revenue aggregation;
/// a `Draft` is still being edited at the till.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Posted,
    Refunded,
    Draft,
}

/// How a split was settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Qr,
    Other,
}

impl PaymentMethod {
    /// All methods, in their stable declaration order.
    pub const ALL: [PaymentMethod; 4] = [Self::Cash, Self::Card, Self::Qr, Self::Other];
}

/// One point-of-sale receipt.
///
/// Amounts are signed integers in currency minor units. A refunded receipt
/// carries negative totals as supplied by the source, so summation nets
/// refunds without special-casing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SalesReceipt {
    pub id: String,
    pub store_id: String,
    pub business_date: DateTime<Utc>,
    pub total_incl_tax: i64,
    pub subtotal_excl_tax: i64,
    pub tax_total: i64,
    pub guest_count: i64,
    pub status: ReceiptStatus,
}

/// One payment against a receipt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub id: String,
    pub receipt_id: String,
    pub store_id: String,
    pub business_date: DateTime<Utc>,
    pub method: PaymentMethod,
    pub amount_incl_tax: i64,
}

/// Read access to receipts and payment splits.
///
/// `from`/`to` are inclusive business-day bounds; implementations compare by
/// calendar day, not exact timestamp.
pub trait SalesStore: Send + Sync {
    fn fetch_receipts(
        &self,
        store_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        statuses: &[ReceiptStatus],
    ) -> Vec<SalesReceipt>;

    fn fetch_payment_splits(
        &self,
        store_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<PaymentSplit>;
}
