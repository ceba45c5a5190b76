//! Report values.
//!
//! Everything here is a pure output: recomputed from the record stores on
//! every request and never persisted. Ratios are `Option<f64>` end to end.
//! An absent ratio means "no data", which is not the same as `0.0`, and the
//! distinction survives until a renderer decides what glyph to show.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::expense::ExpenseCategory;
use crate::sales::PaymentMethod;
use crate::timecard::TimeRecordStatus;

/// Stable code of the sales-vs-payment consistency warning.
pub const SALES_PAYMENT_MISMATCH: &str = "sales_payment_mismatch";

/// Vendor label used when an expense resolves to no vendor at all.
pub const UNASSIGNED_VENDOR_LABEL: &str = "unassigned/other";

/// One calendar day's derived metrics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub store_id: String,
    pub store_name: String,

    pub sales_total_incl_tax: i64,
    pub sales_subtotal_excl_tax: i64,
    pub sales_tax_total: i64,
    pub sales_cash_incl_tax: i64,
    pub sales_card_incl_tax: i64,
    pub sales_qr_incl_tax: i64,
    pub sales_other_incl_tax: i64,
    pub guest_count: i64,

    pub expenses_total: i64,
    pub cogs_total: i64,
    pub cogs_ratio: Option<f64>,

    pub cash_in_total: i64,
    pub cash_out_total: i64,

    pub labor_minutes_total: i64,

    /// The four closing fields are absent (not zero) unless the day has a
    /// confirmed or approved closing.
    pub expected_cash_balance: Option<i64>,
    pub actual_cash_balance: Option<i64>,
    pub closing_difference: Option<i64>,
    pub closing_issue_flag: Option<bool>,
}

/// The flat monthly roll-up behind the monthly-summary export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year_month: String,
    pub store_id: String,
    pub store_name: String,

    pub sales_total_incl_tax: i64,
    pub sales_cash_incl_tax: i64,
    pub sales_card_incl_tax: i64,
    pub sales_qr_incl_tax: i64,
    pub sales_other_incl_tax: i64,
    pub sales_subtotal_excl_tax: i64,
    pub sales_tax_total: i64,

    pub expenses_total: i64,
    pub expenses_food: i64,
    pub expenses_drink: i64,
    pub expenses_consumable: i64,
    pub expenses_utility: i64,
    pub expenses_misc: i64,

    pub cash_in_total: i64,
    pub cash_out_total: i64,
    pub cash_out_purchase_total: i64,
    pub cash_out_reimburse_total: i64,
    pub cash_out_deposit_to_bank_total: i64,

    pub closing_difference_total: i64,
    pub closing_issue_days: i64,
}

/// A cross-record consistency finding. The engine never corrects data, it
/// only reports the discrepancy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWarning {
    /// Stable machine-readable code.
    pub code: String,
    pub message: String,
    /// Signed size of the discrepancy in minor units.
    pub value: i64,
}

/// Month-grain key performance indicators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyKpi {
    pub sales_total_incl_tax: i64,
    pub sales_subtotal_excl_tax: i64,
    pub sales_tax_total: i64,
    pub receipt_count: i64,
    pub guest_count: i64,
    pub avg_spend_per_guest: Option<f64>,
    pub avg_spend_per_receipt: Option<f64>,

    pub pay_cash: i64,
    pub pay_card: i64,
    pub pay_qr: i64,
    pub pay_other: i64,
    pub pay_total: i64,
    pub cash_ratio: Option<f64>,
    pub card_ratio: Option<f64>,
    pub qr_ratio: Option<f64>,
    pub other_ratio: Option<f64>,

    pub cogs_total: i64,
    pub gross_profit: i64,
    pub cogs_ratio: Option<f64>,
    pub gross_margin_ratio: Option<f64>,

    pub closing_difference_total: i64,
    pub closing_issue_days: i64,
    pub deposit_to_bank_total: i64,

    pub labor_minutes_total: i64,
    pub sales_per_labor_hour: Option<f64>,
}

/// One category's share of a breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category: ExpenseCategory,
    pub amount: i64,
}

/// One payment method's share of the mix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodAmount {
    pub method: PaymentMethod,
    pub amount: i64,
}

/// One vendor's share of the month's spend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorSpend {
    pub vendor_name: String,
    pub amount: i64,
    pub count: i64,
}

/// Month-grain breakdowns, computed directly from the month's filtered
/// record sets rather than from the daily series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBreakdowns {
    /// COGS-flagged spend per category, descending by amount.
    pub cogs_by_category: Vec<CategoryAmount>,
    /// All approved spend per category, descending by amount.
    pub expenses_by_category: Vec<CategoryAmount>,
    /// Payment mix in method declaration order.
    pub payments_by_method: Vec<MethodAmount>,
    /// Top vendors by spend, capped at ten entries.
    pub expenses_by_vendor: Vec<VendorSpend>,
}

/// The full monthly report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// `YYYY-MM` of the reported month.
    pub month: String,
    pub store_id: String,
    pub kpi: MonthlyKpi,
    pub breakdowns: MonthlyBreakdowns,
    pub warnings: Vec<ReportWarning>,
}

/// One time record, resolved and labeled for the attendance export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRow {
    pub employee_id: i64,
    pub employee_name: String,
    pub date: NaiveDate,
    pub clock_in_at: Option<DateTime<Utc>>,
    pub clock_out_at: Option<DateTime<Utc>>,
    pub break_minutes: i64,
    pub worked_minutes: i64,
    pub status: TimeRecordStatus,
}
