//! Expense entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// What an expense was for.
///
/// The declaration order below is stable and breaks ties when breakdowns are
/// sorted by amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Food,
    Drink,
    Consumable,
    Utility,
    Misc,
    Transportation,
    Equipment,
}

impl ExpenseCategory {
    /// All categories, in their stable declaration order.
    pub const ALL: [ExpenseCategory; 7] = [
        Self::Food,
        Self::Drink,
        Self::Consumable,
        Self::Utility,
        Self::Misc,
        Self::Transportation,
        Self::Equipment,
    ];

    /// Position in the declaration order, for deterministic tie-breaks.
    pub(crate) fn ordinal(self) -> usize {
        Self::ALL
            .iter()
            .position(|category| *category == self)
            .unwrap_or(Self::ALL.len())
    }
}

/// How an expense was paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpensePaymentMethod {
    Cash,
    Card,
    BankTransfer,
    /// Paid out of pocket by an employee, to be reimbursed from the drawer.
    EmployeeAdvance,
}

/// Expense approval status. Only `Approved` expenses participate in cost
/// aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

/// One expense entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub store_id: String,
    pub date: DateTime<Utc>,
    /// Amount in currency minor units, tax included.
    pub amount: i64,
    pub tax_amount: i64,
    pub category: ExpenseCategory,
    pub payment_method: ExpensePaymentMethod,
    /// Reference into the vendor registry, when the expense was linked.
    pub vendor_id: Option<String>,
    /// Free-text vendor name for unlinked expenses.
    pub vendor_name_raw: Option<String>,
    /// Present for employee advances.
    pub employee_id: Option<i64>,
    pub is_reimbursed: bool,
    pub reimbursed_at: Option<DateTime<Utc>>,
    pub memo: String,
    pub status: ExpenseStatus,
}

/// Optional predicates for listing expenses.
///
/// A `None` field matches everything; set fields are ANDed together.
#[derive(Clone, Debug, Default)]
pub struct ExpenseFilter {
    pub category: Option<ExpenseCategory>,
    pub payment_method: Option<ExpensePaymentMethod>,
    pub reimbursed: Option<bool>,
    pub status: Option<ExpenseStatus>,
    pub employee_id: Option<i64>,
}

impl ExpenseFilter {
    /// Filter down to approved expenses, the set every aggregation reads.
    pub fn approved() -> Self {
        Self {
            status: Some(ExpenseStatus::Approved),
            ..Self::default()
        }
    }

    pub(crate) fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = self.category
            && expense.category != category
        {
            return false;
        }
        if let Some(method) = self.payment_method
            && expense.payment_method != method
        {
            return false;
        }
        if let Some(reimbursed) = self.reimbursed
            && expense.is_reimbursed != reimbursed
        {
            return false;
        }
        if let Some(status) = self.status
            && expense.status != status
        {
            return false;
        }
        if let Some(employee_id) = self.employee_id
            && expense.employee_id != Some(employee_id)
        {
            return false;
        }
        true
    }
}

/// Read access to expenses.
pub trait ExpenseStore: Send + Sync {
    fn fetch_expenses(
        &self,
        store_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        filter: &ExpenseFilter,
    ) -> Vec<Expense>;
}
