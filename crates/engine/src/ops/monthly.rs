//! Monthly aggregation.
//!
//! The daily series drives the totals: every numeric monthly field is the
//! per-field sum of the series, while ratios are recomputed at month grain
//! from those sums (averaging daily ratios would distort them). Breakdowns
//! are the exception and come straight from the month's filtered record
//! sets; a per-day detour adds nothing.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::calendar::{month_range, year_month_key};
use crate::cash::{
    CashTransaction, CashTransactionCategory, CashTransactionFilter, CashTransactionKind,
};
use crate::expense::{Expense, ExpenseCategory, ExpenseFilter};
use crate::ratio::safe_ratio;
use crate::report::{
    CategoryAmount, DailyRow, MethodAmount, MonthlyBreakdowns, MonthlyKpi, MonthlyReport,
    MonthlySummary, ReportWarning, SALES_PAYMENT_MISMATCH, UNASSIGNED_VENDOR_LABEL, VendorSpend,
};
use crate::sales::{PaymentMethod, ReceiptStatus};
use crate::ResultEngine;

use super::Engine;

/// Vendor breakdowns list at most this many entries.
const VENDOR_BREAKDOWN_CAP: usize = 10;

impl Engine {
    /// The daily series for the month containing `month`, ascending.
    pub fn compute_monthly_daily(
        &self,
        store_id: &str,
        month: NaiveDate,
    ) -> ResultEngine<Vec<DailyRow>> {
        let (start, end) = month_range(month)?;
        self.compute_daily(store_id, start, end)
    }

    /// The flat monthly roll-up behind the monthly-summary export.
    pub fn compute_monthly_summary(
        &self,
        store_id: &str,
        month: NaiveDate,
    ) -> ResultEngine<MonthlySummary> {
        let (start, end) = month_range(month)?;
        let daily = self.compute_daily(store_id, start, end)?;

        let expenses =
            self.expenses
                .fetch_expenses(store_id, start, end, &ExpenseFilter::approved());
        let cash = self.cash_transactions.fetch_transactions(
            store_id,
            start,
            end,
            &CashTransactionFilter::default(),
        );

        let expenses_in = |category: ExpenseCategory| -> i64 {
            expenses
                .iter()
                .filter(|e| e.category == category)
                .map(|e| e.amount)
                .sum()
        };

        Ok(MonthlySummary {
            year_month: year_month_key(start),
            store_id: store_id.to_string(),
            store_name: self.store_name.clone(),
            sales_total_incl_tax: daily.iter().map(|d| d.sales_total_incl_tax).sum(),
            sales_cash_incl_tax: daily.iter().map(|d| d.sales_cash_incl_tax).sum(),
            sales_card_incl_tax: daily.iter().map(|d| d.sales_card_incl_tax).sum(),
            sales_qr_incl_tax: daily.iter().map(|d| d.sales_qr_incl_tax).sum(),
            sales_other_incl_tax: daily.iter().map(|d| d.sales_other_incl_tax).sum(),
            sales_subtotal_excl_tax: daily.iter().map(|d| d.sales_subtotal_excl_tax).sum(),
            sales_tax_total: daily.iter().map(|d| d.sales_tax_total).sum(),
            expenses_total: daily.iter().map(|d| d.expenses_total).sum(),
            expenses_food: expenses_in(ExpenseCategory::Food),
            expenses_drink: expenses_in(ExpenseCategory::Drink),
            expenses_consumable: expenses_in(ExpenseCategory::Consumable),
            expenses_utility: expenses_in(ExpenseCategory::Utility),
            expenses_misc: expenses_in(ExpenseCategory::Misc),
            cash_in_total: daily.iter().map(|d| d.cash_in_total).sum(),
            cash_out_total: daily.iter().map(|d| d.cash_out_total).sum(),
            cash_out_purchase_total: cash_out_in(&cash, CashTransactionCategory::Purchase),
            cash_out_reimburse_total: cash_out_in(&cash, CashTransactionCategory::ExpenseReimburse),
            cash_out_deposit_to_bank_total: cash_out_in(
                &cash,
                CashTransactionCategory::DepositToBank,
            ),
            closing_difference_total: daily.iter().filter_map(|d| d.closing_difference).sum(),
            closing_issue_days: daily
                .iter()
                .filter(|d| d.closing_issue_flag == Some(true))
                .count() as i64,
        })
    }

    /// The full monthly report: KPI block, breakdowns and warnings.
    pub fn compute_month(&self, store_id: &str, month: NaiveDate) -> ResultEngine<MonthlyReport> {
        let (start, end) = month_range(month)?;
        let daily = self.compute_daily(store_id, start, end)?;

        let receipts = self.sales.fetch_receipts(
            store_id,
            start,
            end,
            &[ReceiptStatus::Posted, ReceiptStatus::Refunded],
        );
        let splits = self.sales.fetch_payment_splits(store_id, start, end);
        let expenses =
            self.expenses
                .fetch_expenses(store_id, start, end, &ExpenseFilter::approved());
        let cash = self.cash_transactions.fetch_transactions(
            store_id,
            start,
            end,
            &CashTransactionFilter::default(),
        );
        let cogs_categories = self.cogs_categories(store_id);

        // Totals are the per-field sums of the daily series.
        let sales_total_incl_tax: i64 = daily.iter().map(|d| d.sales_total_incl_tax).sum();
        let sales_subtotal_excl_tax: i64 = daily.iter().map(|d| d.sales_subtotal_excl_tax).sum();
        let sales_tax_total: i64 = daily.iter().map(|d| d.sales_tax_total).sum();
        let guest_count: i64 = daily.iter().map(|d| d.guest_count).sum();
        let cogs_total: i64 = daily.iter().map(|d| d.cogs_total).sum();
        let labor_minutes_total: i64 = daily.iter().map(|d| d.labor_minutes_total).sum();
        let pay_cash: i64 = daily.iter().map(|d| d.sales_cash_incl_tax).sum();
        let pay_card: i64 = daily.iter().map(|d| d.sales_card_incl_tax).sum();
        let pay_qr: i64 = daily.iter().map(|d| d.sales_qr_incl_tax).sum();
        let pay_other: i64 = daily.iter().map(|d| d.sales_other_incl_tax).sum();
        let pay_total = pay_cash + pay_card + pay_qr + pay_other;

        let receipt_count = receipts.len() as i64;
        let gross_profit = sales_total_incl_tax - cogs_total;

        let closing_difference_total: i64 = daily.iter().filter_map(|d| d.closing_difference).sum();
        let closing_issue_days = daily
            .iter()
            .filter(|d| d.closing_issue_flag == Some(true))
            .count() as i64;
        let deposit_to_bank_total = cash_out_in(&cash, CashTransactionCategory::DepositToBank);

        let kpi = MonthlyKpi {
            sales_total_incl_tax,
            sales_subtotal_excl_tax,
            sales_tax_total,
            receipt_count,
            guest_count,
            avg_spend_per_guest: safe_ratio(sales_total_incl_tax as f64, guest_count as f64),
            avg_spend_per_receipt: safe_ratio(sales_total_incl_tax as f64, receipt_count as f64),
            pay_cash,
            pay_card,
            pay_qr,
            pay_other,
            pay_total,
            cash_ratio: safe_ratio(pay_cash as f64, pay_total as f64),
            card_ratio: safe_ratio(pay_card as f64, pay_total as f64),
            qr_ratio: safe_ratio(pay_qr as f64, pay_total as f64),
            other_ratio: safe_ratio(pay_other as f64, pay_total as f64),
            cogs_total,
            gross_profit,
            cogs_ratio: safe_ratio(cogs_total as f64, sales_total_incl_tax as f64),
            gross_margin_ratio: safe_ratio(gross_profit as f64, sales_total_incl_tax as f64),
            closing_difference_total,
            closing_issue_days,
            deposit_to_bank_total,
            labor_minutes_total,
            sales_per_labor_hour: safe_ratio(
                sales_total_incl_tax as f64,
                labor_minutes_total as f64 / 60.0,
            ),
        };

        // Breakdowns come straight from the month's record sets.
        let cogs_expenses: Vec<&Expense> = expenses
            .iter()
            .filter(|e| cogs_categories.contains(&e.category))
            .collect();
        let breakdowns = MonthlyBreakdowns {
            cogs_by_category: sum_by_category(cogs_expenses.iter().copied()),
            expenses_by_category: sum_by_category(expenses.iter()),
            payments_by_method: PaymentMethod::ALL
                .iter()
                .map(|method| MethodAmount {
                    method: *method,
                    amount: splits
                        .iter()
                        .filter(|s| s.method == *method)
                        .map(|s| s.amount_incl_tax)
                        .sum(),
                })
                .collect(),
            expenses_by_vendor: self.sum_by_vendor(&expenses),
        };

        // The engine's one consistency check: receipts and splits should tell
        // the same story about the month's revenue.
        let mut warnings = Vec::new();
        let mismatch = sales_total_incl_tax - pay_total;
        if mismatch != 0 {
            tracing::warn!(store_id, mismatch, "sales and payment totals disagree");
            warnings.push(ReportWarning {
                code: SALES_PAYMENT_MISMATCH.to_string(),
                message: "sales total and payment total disagree".to_string(),
                value: mismatch,
            });
        }

        Ok(MonthlyReport {
            month: year_month_key(start),
            store_id: store_id.to_string(),
            kpi,
            breakdowns,
            warnings,
        })
    }

    /// Vendor spend, grouped by resolved display name and capped to the top
    /// entries by amount.
    ///
    /// Resolution prefers the vendor registry, then the raw free-text name,
    /// then the shared "unassigned" bucket.
    fn sum_by_vendor(&self, expenses: &[Expense]) -> Vec<VendorSpend> {
        let mut grouped: HashMap<String, VendorSpend> = HashMap::new();

        for expense in expenses {
            let (key, vendor_name) = match &expense.vendor_id {
                Some(vendor_id) => match self.vendors.find_by_id(vendor_id) {
                    Some(vendor) => (format!("vendor:{vendor_id}"), vendor.name),
                    None => resolve_raw_vendor(expense),
                },
                None => resolve_raw_vendor(expense),
            };

            let entry = grouped.entry(key).or_insert_with(|| VendorSpend {
                vendor_name,
                amount: 0,
                count: 0,
            });
            entry.amount += expense.amount;
            entry.count += 1;
        }

        let mut spends: Vec<VendorSpend> = grouped.into_values().collect();
        spends.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.vendor_name.cmp(&b.vendor_name))
        });
        spends.truncate(VENDOR_BREAKDOWN_CAP);
        spends
    }
}

fn resolve_raw_vendor(expense: &Expense) -> (String, String) {
    match expense.vendor_name_raw.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => (format!("raw:{raw}"), raw.to_string()),
        None => (
            "unassigned".to_string(),
            UNASSIGNED_VENDOR_LABEL.to_string(),
        ),
    }
}

fn cash_out_in(cash: &[CashTransaction], category: CashTransactionCategory) -> i64 {
    cash.iter()
        .filter(|t| t.kind == CashTransactionKind::Out && t.category == Some(category))
        .map(|t| t.amount)
        .sum()
}

/// Per-category sums, descending by amount with ties broken by the
/// categories' declaration order.
fn sum_by_category<'a>(expenses: impl Iterator<Item = &'a Expense>) -> Vec<CategoryAmount> {
    let mut sums: HashMap<ExpenseCategory, i64> = HashMap::new();
    for expense in expenses {
        *sums.entry(expense.category).or_default() += expense.amount;
    }

    let mut amounts: Vec<CategoryAmount> = sums
        .into_iter()
        .map(|(category, amount)| CategoryAmount { category, amount })
        .collect();
    amounts.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category.ordinal().cmp(&b.category.ordinal()))
    });
    amounts
}
