//! CSV rendering for report values.
//!
//! A pure formatting layer: no aggregation happens here. Each report kind
//! has a fixed header row and column order, and quoting follows RFC 4180:
//! fields containing the delimiter, a quote or a line break are wrapped in
//! quotes with inner quotes doubled, uniformly, via the `csv` writer.
//!
//! Absent closing fields render as empty columns so "no confirmed closing"
//! stays distinguishable from a verified zero difference.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use engine::{AttendanceRow, DailyRow, MonthlySummary};

/// Errors the serializer can surface.
///
/// `Io` only comes out of the file sinks; rendering itself touches no I/O.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("failed to render csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Monthly summary export: a header row and one row for the whole month.
///
/// Columns: `year_month, store_id, store_name, sales_total_incl_tax,
/// sales_cash_incl_tax, sales_card_incl_tax, sales_qr_incl_tax,
/// sales_other_incl_tax, sales_subtotal_excl_tax, sales_tax_total,
/// expenses_total, expenses_food, expenses_drink, expenses_consumable,
/// expenses_utility, expenses_misc, cash_in_total, cash_out_total,
/// cash_out_purchase_total, cash_out_reimburse_total,
/// cash_out_deposit_to_bank_total, closing_difference_total,
/// closing_issue_days`.
pub fn monthly_summary_csv(summary: &MonthlySummary) -> Result<String, ExportError> {
    render(&SUMMARY_HEADERS, [SummaryRow::from(summary)])
}

/// Monthly daily-series export: one row per calendar day.
///
/// Columns: `date, store_id, store_name, sales_total_incl_tax,
/// sales_subtotal_excl_tax, sales_tax_total, sales_cash_incl_tax,
/// sales_card_incl_tax, sales_qr_incl_tax, sales_other_incl_tax,
/// expenses_total, cash_in_total, cash_out_total, expected_cash_balance,
/// actual_cash_balance, difference, issue_flag`, the last four empty when
/// the day has no confirmed or approved closing.
pub fn monthly_daily_csv(rows: &[DailyRow]) -> Result<String, ExportError> {
    render(&DAILY_HEADERS, rows.iter().map(DailySeriesRow::from))
}

/// Attendance export: one row per time record.
///
/// Columns: `employeeId, employeeName, date, clockIn, clockOut,
/// breakMinutes, workedMinutes, workedHours, status`. Clock times render as
/// `HH:MM` (empty when absent); worked hours as a two-decimal number.
pub fn attendance_csv(rows: &[AttendanceRow]) -> Result<String, ExportError> {
    render(&ATTENDANCE_HEADERS, rows.iter().map(AttendanceCsvRow::from))
}

/// Write already-rendered CSV text to `path`.
pub fn write_csv_file(path: &Path, csv_text: &str) -> Result<(), ExportError> {
    fs::write(path, csv_text)?;
    tracing::debug!(path = %path.display(), bytes = csv_text.len(), "wrote csv export");
    Ok(())
}

const SUMMARY_HEADERS: [&str; 23] = [
    "year_month",
    "store_id",
    "store_name",
    "sales_total_incl_tax",
    "sales_cash_incl_tax",
    "sales_card_incl_tax",
    "sales_qr_incl_tax",
    "sales_other_incl_tax",
    "sales_subtotal_excl_tax",
    "sales_tax_total",
    "expenses_total",
    "expenses_food",
    "expenses_drink",
    "expenses_consumable",
    "expenses_utility",
    "expenses_misc",
    "cash_in_total",
    "cash_out_total",
    "cash_out_purchase_total",
    "cash_out_reimburse_total",
    "cash_out_deposit_to_bank_total",
    "closing_difference_total",
    "closing_issue_days",
];

const DAILY_HEADERS: [&str; 17] = [
    "date",
    "store_id",
    "store_name",
    "sales_total_incl_tax",
    "sales_subtotal_excl_tax",
    "sales_tax_total",
    "sales_cash_incl_tax",
    "sales_card_incl_tax",
    "sales_qr_incl_tax",
    "sales_other_incl_tax",
    "expenses_total",
    "cash_in_total",
    "cash_out_total",
    "expected_cash_balance",
    "actual_cash_balance",
    "difference",
    "issue_flag",
];

const ATTENDANCE_HEADERS: [&str; 9] = [
    "employeeId",
    "employeeName",
    "date",
    "clockIn",
    "clockOut",
    "breakMinutes",
    "workedMinutes",
    "workedHours",
    "status",
];

/// Header row first, then one serialized record per row. The header is
/// written even when there are no rows.
fn render<R: Serialize>(
    headers: &[&str],
    rows: impl IntoIterator<Item = R>,
) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    String::from_utf8(bytes)
        .map_err(|err| ExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    year_month: &'a str,
    store_id: &'a str,
    store_name: &'a str,
    sales_total_incl_tax: i64,
    sales_cash_incl_tax: i64,
    sales_card_incl_tax: i64,
    sales_qr_incl_tax: i64,
    sales_other_incl_tax: i64,
    sales_subtotal_excl_tax: i64,
    sales_tax_total: i64,
    expenses_total: i64,
    expenses_food: i64,
    expenses_drink: i64,
    expenses_consumable: i64,
    expenses_utility: i64,
    expenses_misc: i64,
    cash_in_total: i64,
    cash_out_total: i64,
    cash_out_purchase_total: i64,
    cash_out_reimburse_total: i64,
    cash_out_deposit_to_bank_total: i64,
    closing_difference_total: i64,
    closing_issue_days: i64,
}

impl<'a> From<&'a MonthlySummary> for SummaryRow<'a> {
    fn from(summary: &'a MonthlySummary) -> Self {
        Self {
            year_month: &summary.year_month,
            store_id: &summary.store_id,
            store_name: &summary.store_name,
            sales_total_incl_tax: summary.sales_total_incl_tax,
            sales_cash_incl_tax: summary.sales_cash_incl_tax,
            sales_card_incl_tax: summary.sales_card_incl_tax,
            sales_qr_incl_tax: summary.sales_qr_incl_tax,
            sales_other_incl_tax: summary.sales_other_incl_tax,
            sales_subtotal_excl_tax: summary.sales_subtotal_excl_tax,
            sales_tax_total: summary.sales_tax_total,
            expenses_total: summary.expenses_total,
            expenses_food: summary.expenses_food,
            expenses_drink: summary.expenses_drink,
            expenses_consumable: summary.expenses_consumable,
            expenses_utility: summary.expenses_utility,
            expenses_misc: summary.expenses_misc,
            cash_in_total: summary.cash_in_total,
            cash_out_total: summary.cash_out_total,
            cash_out_purchase_total: summary.cash_out_purchase_total,
            cash_out_reimburse_total: summary.cash_out_reimburse_total,
            cash_out_deposit_to_bank_total: summary.cash_out_deposit_to_bank_total,
            closing_difference_total: summary.closing_difference_total,
            closing_issue_days: summary.closing_issue_days,
        }
    }
}

#[derive(Serialize)]
struct DailySeriesRow<'a> {
    date: NaiveDate,
    store_id: &'a str,
    store_name: &'a str,
    sales_total_incl_tax: i64,
    sales_subtotal_excl_tax: i64,
    sales_tax_total: i64,
    sales_cash_incl_tax: i64,
    sales_card_incl_tax: i64,
    sales_qr_incl_tax: i64,
    sales_other_incl_tax: i64,
    expenses_total: i64,
    cash_in_total: i64,
    cash_out_total: i64,
    expected_cash_balance: Option<i64>,
    actual_cash_balance: Option<i64>,
    difference: Option<i64>,
    issue_flag: Option<bool>,
}

impl<'a> From<&'a DailyRow> for DailySeriesRow<'a> {
    fn from(row: &'a DailyRow) -> Self {
        Self {
            date: row.date,
            store_id: &row.store_id,
            store_name: &row.store_name,
            sales_total_incl_tax: row.sales_total_incl_tax,
            sales_subtotal_excl_tax: row.sales_subtotal_excl_tax,
            sales_tax_total: row.sales_tax_total,
            sales_cash_incl_tax: row.sales_cash_incl_tax,
            sales_card_incl_tax: row.sales_card_incl_tax,
            sales_qr_incl_tax: row.sales_qr_incl_tax,
            sales_other_incl_tax: row.sales_other_incl_tax,
            expenses_total: row.expenses_total,
            cash_in_total: row.cash_in_total,
            cash_out_total: row.cash_out_total,
            expected_cash_balance: row.expected_cash_balance,
            actual_cash_balance: row.actual_cash_balance,
            difference: row.closing_difference,
            issue_flag: row.closing_issue_flag,
        }
    }
}

#[derive(Serialize)]
struct AttendanceCsvRow<'a> {
    employee_id: i64,
    employee_name: &'a str,
    date: NaiveDate,
    clock_in: String,
    clock_out: String,
    break_minutes: i64,
    worked_minutes: i64,
    worked_hours: String,
    status: &'static str,
}

impl<'a> From<&'a AttendanceRow> for AttendanceCsvRow<'a> {
    fn from(row: &'a AttendanceRow) -> Self {
        Self {
            employee_id: row.employee_id,
            employee_name: &row.employee_name,
            date: row.date,
            clock_in: clock_label(row.clock_in_at),
            clock_out: clock_label(row.clock_out_at),
            break_minutes: row.break_minutes,
            worked_minutes: row.worked_minutes,
            worked_hours: format!("{:.2}", row.worked_minutes as f64 / 60.0),
            status: row.status.as_str(),
        }
    }
}

fn clock_label(stamp: Option<DateTime<Utc>>) -> String {
    stamp
        .map(|at| at.format("%H:%M").to_string())
        .unwrap_or_default()
}
