//! Cash drawer in/out transactions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a drawer movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashTransactionKind {
    In,
    Out,
}

/// Why cash moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashTransactionCategory {
    /// Float put into the drawer before opening.
    ChangePrep,
    /// Float taken back out of the drawer.
    ChangeReturn,
    Purchase,
    /// Settling an employee advance.
    ExpenseReimburse,
    DepositToBank,
    Other,
}

/// One cash in/out transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CashTransaction {
    pub id: String,
    pub store_id: String,
    pub date: DateTime<Utc>,
    pub kind: CashTransactionKind,
    /// Amount in currency minor units, always positive; `kind` carries the
    /// direction.
    pub amount: i64,
    pub category: Option<CashTransactionCategory>,
    pub vendor_name: Option<String>,
    pub description: String,
}

/// Optional predicates for listing cash transactions.
#[derive(Clone, Debug, Default)]
pub struct CashTransactionFilter {
    pub kind: Option<CashTransactionKind>,
    pub category: Option<CashTransactionCategory>,
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
}

impl CashTransactionFilter {
    pub(crate) fn matches(&self, tx: &CashTransaction) -> bool {
        if let Some(kind) = self.kind
            && tx.kind != kind
        {
            return false;
        }
        if let Some(category) = self.category
            && tx.category != Some(category)
        {
            return false;
        }
        if let Some(min_amount) = self.min_amount
            && tx.amount < min_amount
        {
            return false;
        }
        if let Some(max_amount) = self.max_amount
            && tx.amount > max_amount
        {
            return false;
        }
        true
    }
}

/// Read access to cash transactions.
pub trait CashTransactionStore: Send + Sync {
    fn fetch_transactions(
        &self,
        store_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        filter: &CashTransactionFilter,
    ) -> Vec<CashTransaction>;
}
