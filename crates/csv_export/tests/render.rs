use chrono::{NaiveDate, TimeZone, Utc};

use csv_export::{attendance_csv, monthly_daily_csv, monthly_summary_csv, write_csv_file};
use engine::{AttendanceRow, DailyRow, MonthlySummary, TimeRecordStatus};

fn summary() -> MonthlySummary {
    MonthlySummary {
        year_month: "2024-06".to_string(),
        store_id: "store_1".to_string(),
        store_name: "demo branch".to_string(),
        sales_total_incl_tax: 1_234_567,
        sales_cash_incl_tax: 400_000,
        sales_card_incl_tax: 600_000,
        sales_qr_incl_tax: 200_000,
        sales_other_incl_tax: 34_567,
        sales_subtotal_excl_tax: 1_122_334,
        sales_tax_total: 112_233,
        expenses_total: 345_678,
        expenses_food: 200_000,
        expenses_drink: 80_000,
        expenses_consumable: 30_000,
        expenses_utility: 25_678,
        expenses_misc: 10_000,
        cash_in_total: 90_000,
        cash_out_total: 75_000,
        cash_out_purchase_total: 40_000,
        cash_out_reimburse_total: 15_000,
        cash_out_deposit_to_bank_total: 20_000,
        closing_difference_total: -1_500,
        closing_issue_days: 2,
    }
}

fn daily_row(with_closing: bool) -> DailyRow {
    DailyRow {
        date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        store_id: "store_1".to_string(),
        store_name: "demo branch".to_string(),
        sales_total_incl_tax: 120_000,
        sales_subtotal_excl_tax: 109_091,
        sales_tax_total: 10_909,
        sales_cash_incl_tax: 48_000,
        sales_card_incl_tax: 60_000,
        sales_qr_incl_tax: 0,
        sales_other_incl_tax: 12_000,
        guest_count: 34,
        expenses_total: 6_800,
        cogs_total: 5_000,
        cogs_ratio: Some(5_000.0 / 120_000.0),
        cash_in_total: 30_000,
        cash_out_total: 6_200,
        labor_minutes_total: 960,
        expected_cash_balance: with_closing.then_some(115_000),
        actual_cash_balance: with_closing.then_some(114_200),
        closing_difference: with_closing.then_some(-800),
        closing_issue_flag: with_closing.then_some(false),
    }
}

#[test]
fn summary_header_and_single_row() {
    let text = monthly_summary_csv(&summary()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "year_month,store_id,store_name,sales_total_incl_tax,sales_cash_incl_tax,\
         sales_card_incl_tax,sales_qr_incl_tax,sales_other_incl_tax,sales_subtotal_excl_tax,\
         sales_tax_total,expenses_total,expenses_food,expenses_drink,expenses_consumable,\
         expenses_utility,expenses_misc,cash_in_total,cash_out_total,cash_out_purchase_total,\
         cash_out_reimburse_total,cash_out_deposit_to_bank_total,closing_difference_total,\
         closing_issue_days"
    );
    assert!(lines.next().unwrap().starts_with("2024-06,store_1,demo branch,1234567,"));
    assert_eq!(lines.next(), None);
}

#[test]
fn summary_round_trips_integer_columns_exactly() {
    let original = summary();
    let text = monthly_summary_csv(&original).unwrap();

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let record = reader.records().next().unwrap().unwrap();
    let headers = reader.headers().unwrap().clone();
    let column = |name: &str| -> i64 {
        let index = headers.iter().position(|h| h == name).unwrap();
        record[index].parse().unwrap()
    };

    assert_eq!(column("sales_total_incl_tax"), original.sales_total_incl_tax);
    assert_eq!(column("sales_subtotal_excl_tax"), original.sales_subtotal_excl_tax);
    assert_eq!(column("expenses_total"), original.expenses_total);
    assert_eq!(column("cash_in_total"), original.cash_in_total);
    assert_eq!(
        column("closing_difference_total"),
        original.closing_difference_total
    );
    assert_eq!(column("closing_issue_days"), original.closing_issue_days);
}

#[test]
fn fields_with_delimiters_and_quotes_are_escaped() {
    let mut summary = summary();
    summary.store_name = "demo \"main\", downtown".to_string();
    let text = monthly_summary_csv(&summary).unwrap();
    assert!(text.contains("\"demo \"\"main\"\", downtown\""));

    // And the escaping parses back to the original value.
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(&record[2], "demo \"main\", downtown");
}

#[test]
fn daily_series_renders_absent_closing_as_empty_fields() {
    let text = monthly_daily_csv(&[daily_row(false)]).unwrap();
    let row = text.lines().nth(1).unwrap();
    assert!(row.ends_with(",,,,"));

    let text = monthly_daily_csv(&[daily_row(true)]).unwrap();
    let row = text.lines().nth(1).unwrap();
    assert!(row.ends_with("115000,114200,-800,false"));
}

#[test]
fn daily_series_header_is_written_even_without_rows() {
    let text = monthly_daily_csv(&[]).unwrap();
    assert_eq!(
        text.trim_end(),
        "date,store_id,store_name,sales_total_incl_tax,sales_subtotal_excl_tax,sales_tax_total,\
         sales_cash_incl_tax,sales_card_incl_tax,sales_qr_incl_tax,sales_other_incl_tax,\
         expenses_total,cash_in_total,cash_out_total,expected_cash_balance,actual_cash_balance,\
         difference,issue_flag"
    );
}

#[test]
fn attendance_rows_format_clock_times_and_hours() {
    let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let rows = vec![
        AttendanceRow {
            employee_id: 1,
            employee_name: "Yamada Taro".to_string(),
            date,
            clock_in_at: Some(Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()),
            clock_out_at: Some(Utc.with_ymd_and_hms(2024, 6, 15, 17, 30, 0).unwrap()),
            break_minutes: 60,
            worked_minutes: 450,
            status: TimeRecordStatus::Approved,
        },
        AttendanceRow {
            employee_id: 2,
            employee_name: "Sato Hanako".to_string(),
            date,
            clock_in_at: Some(Utc.with_ymd_and_hms(2024, 6, 15, 18, 5, 0).unwrap()),
            clock_out_at: None,
            break_minutes: 0,
            worked_minutes: 0,
            status: TimeRecordStatus::Draft,
        },
    ];

    let text = attendance_csv(&rows).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "employeeId,employeeName,date,clockIn,clockOut,breakMinutes,workedMinutes,workedHours,status"
    );
    assert_eq!(
        lines.next().unwrap(),
        "1,Yamada Taro,2024-06-15,09:00,17:30,60,450,7.50,approved"
    );
    assert_eq!(
        lines.next().unwrap(),
        "2,Sato Hanako,2024-06-15,18:05,,0,0,0.00,draft"
    );
}

#[test]
fn write_csv_file_surfaces_io_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.csv");
    let text = monthly_summary_csv(&summary()).unwrap();
    write_csv_file(&path, &text).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), text);

    let missing = dir.path().join("no_such_dir").join("summary.csv");
    assert!(write_csv_file(&missing, &text).is_err());
}
