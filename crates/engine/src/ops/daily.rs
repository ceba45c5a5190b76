//! Daily aggregation.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::calendar::days_in_range;
use crate::cash::{CashTransactionFilter, CashTransactionKind};
use crate::expense::{ExpenseCategory, ExpenseFilter};
use crate::ratio::safe_ratio;
use crate::report::DailyRow;
use crate::sales::{PaymentMethod, ReceiptStatus};
use crate::timecard::TimeRecordStatus;
use crate::{EngineError, ResultEngine};

use super::Engine;

impl Engine {
    /// Derived metrics for one calendar day.
    ///
    /// A day with no records is not an error: sums come back zero, ratios
    /// and closing fields come back absent.
    pub fn compute_day(&self, store_id: &str, day: NaiveDate) -> DailyRow {
        let receipts = self.sales.fetch_receipts(
            store_id,
            day,
            day,
            &[ReceiptStatus::Posted, ReceiptStatus::Refunded],
        );
        let splits = self.sales.fetch_payment_splits(store_id, day, day);
        let expenses = self
            .expenses
            .fetch_expenses(store_id, day, day, &ExpenseFilter::approved());
        let cash = self.cash_transactions.fetch_transactions(
            store_id,
            day,
            day,
            &CashTransactionFilter::default(),
        );

        let cogs_categories = self.cogs_categories(store_id);

        let sales_total_incl_tax: i64 = receipts.iter().map(|r| r.total_incl_tax).sum();
        let sales_subtotal_excl_tax: i64 = receipts.iter().map(|r| r.subtotal_excl_tax).sum();
        let sales_tax_total: i64 = receipts.iter().map(|r| r.tax_total).sum();
        let guest_count: i64 = receipts.iter().map(|r| r.guest_count).sum();

        let sales_by_method = |method: PaymentMethod| -> i64 {
            splits
                .iter()
                .filter(|s| s.method == method)
                .map(|s| s.amount_incl_tax)
                .sum()
        };

        let expenses_total: i64 = expenses.iter().map(|e| e.amount).sum();
        let cogs_total: i64 = expenses
            .iter()
            .filter(|e| cogs_categories.contains(&e.category))
            .map(|e| e.amount)
            .sum();

        let cash_in_total: i64 = cash
            .iter()
            .filter(|t| t.kind == CashTransactionKind::In)
            .map(|t| t.amount)
            .sum();
        let cash_out_total: i64 = cash
            .iter()
            .filter(|t| t.kind == CashTransactionKind::Out)
            .map(|t| t.amount)
            .sum();

        let labor_minutes_total: i64 = self
            .time_records
            .load_all()
            .iter()
            .filter(|r| r.store_id == store_id)
            .filter(|r| r.status == TimeRecordStatus::Approved)
            .filter(|r| r.date == day)
            .map(|r| r.worked_minutes())
            .sum();

        // Closing fields stay absent unless the day's closing was actually
        // counted; a draft carries nothing trustworthy.
        let closing = self
            .closings
            .load_closing(store_id, day)
            .filter(|c| c.status.is_counted());
        let (expected_cash_balance, actual_cash_balance, closing_difference, closing_issue_flag) =
            match &closing {
                Some(c) => (
                    Some(c.expected_cash_balance()),
                    Some(c.actual_cash_balance),
                    Some(c.difference()),
                    Some(c.has_issue()),
                ),
                None => (None, None, None, None),
            };

        DailyRow {
            date: day,
            store_id: store_id.to_string(),
            store_name: self.store_name.clone(),
            sales_total_incl_tax,
            sales_subtotal_excl_tax,
            sales_tax_total,
            sales_cash_incl_tax: sales_by_method(PaymentMethod::Cash),
            sales_card_incl_tax: sales_by_method(PaymentMethod::Card),
            sales_qr_incl_tax: sales_by_method(PaymentMethod::Qr),
            sales_other_incl_tax: sales_by_method(PaymentMethod::Other),
            guest_count,
            expenses_total,
            cogs_total,
            cogs_ratio: safe_ratio(cogs_total as f64, sales_total_incl_tax as f64),
            cash_in_total,
            cash_out_total,
            labor_minutes_total,
            expected_cash_balance,
            actual_cash_balance,
            closing_difference,
            closing_issue_flag,
        }
    }

    /// One row per calendar day of `[from, to]`, ascending.
    pub fn compute_daily(
        &self,
        store_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ResultEngine<Vec<DailyRow>> {
        if from > to {
            return Err(EngineError::InvalidRange(format!(
                "from {from} is after to {to}"
            )));
        }

        tracing::debug!(store_id, %from, %to, "computing daily series");
        Ok(days_in_range(from, to)
            .map(|day| self.compute_day(store_id, day))
            .collect())
    }

    /// Categories currently flagged as COGS for the store.
    pub(super) fn cogs_categories(&self, store_id: &str) -> HashSet<ExpenseCategory> {
        self.cost_settings
            .load_settings(store_id)
            .into_iter()
            .filter(|s| s.is_cogs)
            .map(|s| s.expense_category)
            .collect()
    }
}
