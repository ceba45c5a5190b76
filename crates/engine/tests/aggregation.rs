use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use engine::memory::{
    MemoryCashTransactionStore, MemoryClosingStore, MemoryEmployeeDirectory, MemoryExpenseStore,
    MemorySalesStore, MemoryTimeRecordStore, MemoryVendorStore,
};
use engine::{
    CashTransaction, CashTransactionCategory, CashTransactionKind, ClosingStatus, DailyClosing,
    Employee, Engine, EngineError, Expense, ExpenseCategory, ExpensePaymentMethod, ExpenseStatus,
    PaymentMethod, PaymentSplit, ReceiptStatus, SalesReceipt, TimeRecord, TimeRecordStatus,
    Vendor, VendorCategory, SALES_PAYMENT_MISMATCH, UNASSIGNED_VENDOR_LABEL,
};

const STORE: &str = "store_1";

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn stamp(d: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, d, hour, 0, 0).unwrap()
}

#[derive(Default)]
struct Seed {
    receipts: Vec<SalesReceipt>,
    splits: Vec<PaymentSplit>,
    expenses: Vec<Expense>,
    cash: Vec<CashTransaction>,
    closings: Vec<DailyClosing>,
    time_records: Vec<TimeRecord>,
    vendors: Vec<Vendor>,
    employees: Vec<Employee>,
}

fn build_engine(seed: Seed) -> Engine {
    let employees = MemoryEmployeeDirectory::default();
    for employee in seed.employees {
        employees.add(employee);
    }
    Engine::builder()
        .store_name("demo branch")
        .sales(Arc::new(MemorySalesStore::new(seed.receipts, seed.splits)))
        .expenses(Arc::new(MemoryExpenseStore::new(seed.expenses)))
        .cash_transactions(Arc::new(MemoryCashTransactionStore::new(seed.cash)))
        .closings(Arc::new(MemoryClosingStore::new(seed.closings)))
        .time_records(Arc::new(MemoryTimeRecordStore::new(seed.time_records)))
        .vendors(Arc::new(MemoryVendorStore::new(seed.vendors)))
        .employees(Arc::new(employees))
        .build()
}

fn receipt(id: &str, d: u32, total: i64, subtotal: i64, tax: i64, guests: i64) -> SalesReceipt {
    SalesReceipt {
        id: id.to_string(),
        store_id: STORE.to_string(),
        business_date: stamp(d, 19),
        total_incl_tax: total,
        subtotal_excl_tax: subtotal,
        tax_total: tax,
        guest_count: guests,
        status: ReceiptStatus::Posted,
    }
}

fn split(id: &str, receipt_id: &str, d: u32, method: PaymentMethod, amount: i64) -> PaymentSplit {
    PaymentSplit {
        id: id.to_string(),
        receipt_id: receipt_id.to_string(),
        store_id: STORE.to_string(),
        business_date: stamp(d, 19),
        method,
        amount_incl_tax: amount,
    }
}

fn expense(id: &str, d: u32, amount: i64, category: ExpenseCategory) -> Expense {
    Expense {
        id: id.to_string(),
        store_id: STORE.to_string(),
        date: stamp(d, 11),
        amount,
        tax_amount: 0,
        category,
        payment_method: ExpensePaymentMethod::Cash,
        vendor_id: None,
        vendor_name_raw: None,
        employee_id: None,
        is_reimbursed: false,
        reimbursed_at: None,
        memo: String::new(),
        status: ExpenseStatus::Approved,
    }
}

fn cash_tx(
    id: &str,
    d: u32,
    kind: CashTransactionKind,
    category: CashTransactionCategory,
    amount: i64,
) -> CashTransaction {
    CashTransaction {
        id: id.to_string(),
        store_id: STORE.to_string(),
        date: stamp(d, 14),
        kind,
        amount,
        category: Some(category),
        vendor_name: None,
        description: String::new(),
    }
}

fn closing(d: u32, actual: i64, status: ClosingStatus) -> DailyClosing {
    DailyClosing {
        store_id: STORE.to_string(),
        date: day(d),
        previous_cash_balance: 30_000,
        cash_sales: 50_000,
        cash_in_total: 10_000,
        cash_out_total: 5_000,
        actual_cash_balance: actual,
        note: String::new(),
        status,
    }
}

fn time_record(employee_id: i64, d: u32, hours: (u32, u32), break_minutes: i64) -> TimeRecord {
    TimeRecord {
        id: Uuid::new_v4(),
        employee_id,
        store_id: STORE.to_string(),
        date: day(d),
        clock_in_at: Some(stamp(d, hours.0)),
        clock_out_at: Some(stamp(d, hours.1)),
        break_minutes,
        is_on_break: false,
        last_break_start: None,
        status: TimeRecordStatus::Approved,
    }
}

#[test]
fn single_receipt_scenario_matches_its_payment() {
    let engine = build_engine(Seed {
        receipts: vec![receipt("r1", 15, 10_000, 9_091, 909, 2)],
        splits: vec![split("s1", "r1", 15, PaymentMethod::Cash, 10_000)],
        ..Seed::default()
    });

    let report = engine.compute_month(STORE, day(1)).unwrap();
    assert_eq!(report.month, "2024-06");
    assert_eq!(report.kpi.sales_total_incl_tax, 10_000);
    assert_eq!(report.kpi.pay_cash, 10_000);
    assert_eq!(report.kpi.pay_card, 0);
    assert_eq!(report.kpi.receipt_count, 1);
    assert_eq!(report.kpi.guest_count, 2);
    assert!(report.warnings.is_empty());
}

#[test]
fn empty_day_yields_zero_sums_and_absent_ratio() {
    let engine = build_engine(Seed::default());

    let row = engine.compute_day(STORE, day(15));
    assert_eq!(row.sales_total_incl_tax, 0);
    assert_eq!(row.expenses_total, 0);
    assert_eq!(row.cogs_total, 0);
    assert_eq!(row.labor_minutes_total, 0);
    assert_eq!(row.cogs_ratio, None);
    assert_eq!(row.closing_difference, None);
    assert_eq!(row.closing_issue_flag, None);
}

#[test]
fn refunded_receipts_net_against_sales() {
    let mut refund = receipt("r2", 15, -5_000, -4_545, -455, 0);
    refund.status = ReceiptStatus::Refunded;
    let engine = build_engine(Seed {
        receipts: vec![receipt("r1", 15, 80_000, 72_727, 7_273, 4), refund],
        ..Seed::default()
    });

    let row = engine.compute_day(STORE, day(15));
    assert_eq!(row.sales_total_incl_tax, 75_000);
    assert_eq!(row.sales_tax_total, 6_818);
}

#[test]
fn draft_receipts_do_not_count() {
    let mut draft = receipt("r2", 15, 99_999, 99_999, 0, 1);
    draft.status = ReceiptStatus::Draft;
    let engine = build_engine(Seed {
        receipts: vec![receipt("r1", 15, 10_000, 9_091, 909, 2), draft],
        ..Seed::default()
    });

    assert_eq!(engine.compute_day(STORE, day(15)).sales_total_incl_tax, 10_000);
}

#[test]
fn monthly_totals_equal_sum_of_daily_series() {
    let engine = build_engine(Seed {
        receipts: vec![
            receipt("r1", 3, 12_000, 10_909, 1_091, 2),
            receipt("r2", 14, 8_000, 7_273, 727, 3),
            receipt("r3", 28, 20_000, 18_182, 1_818, 5),
        ],
        splits: vec![
            split("s1", "r1", 3, PaymentMethod::Cash, 12_000),
            split("s2", "r2", 14, PaymentMethod::Card, 8_000),
            split("s3", "r3", 28, PaymentMethod::Qr, 20_000),
        ],
        expenses: vec![
            expense("e1", 3, 4_000, ExpenseCategory::Food),
            expense("e2", 14, 2_500, ExpenseCategory::Utility),
        ],
        cash: vec![
            cash_tx("c1", 3, CashTransactionKind::In, CashTransactionCategory::ChangePrep, 30_000),
            cash_tx("c2", 14, CashTransactionKind::Out, CashTransactionCategory::Purchase, 1_200),
        ],
        time_records: vec![time_record(1, 3, (9, 17), 60), time_record(2, 14, (10, 15), 0)],
        ..Seed::default()
    });

    let daily = engine.compute_monthly_daily(STORE, day(10)).unwrap();
    assert_eq!(daily.len(), 30);
    let report = engine.compute_month(STORE, day(10)).unwrap();

    let sum = |f: fn(&engine::DailyRow) -> i64| -> i64 { daily.iter().map(f).sum() };
    assert_eq!(report.kpi.sales_total_incl_tax, sum(|d| d.sales_total_incl_tax));
    assert_eq!(report.kpi.sales_subtotal_excl_tax, sum(|d| d.sales_subtotal_excl_tax));
    assert_eq!(report.kpi.sales_tax_total, sum(|d| d.sales_tax_total));
    assert_eq!(report.kpi.guest_count, sum(|d| d.guest_count));
    assert_eq!(report.kpi.cogs_total, sum(|d| d.cogs_total));
    assert_eq!(report.kpi.labor_minutes_total, sum(|d| d.labor_minutes_total));
    assert_eq!(report.kpi.pay_cash, sum(|d| d.sales_cash_incl_tax));
    assert_eq!(report.kpi.pay_qr, sum(|d| d.sales_qr_incl_tax));

    let summary = engine.compute_monthly_summary(STORE, day(10)).unwrap();
    assert_eq!(summary.sales_total_incl_tax, report.kpi.sales_total_incl_tax);
    assert_eq!(summary.expenses_total, sum(|d| d.expenses_total));
    assert_eq!(summary.cash_in_total, 30_000);
    assert_eq!(summary.cash_out_total, 1_200);
    assert_eq!(summary.cash_out_purchase_total, 1_200);
    assert_eq!(summary.expenses_food, 4_000);
    assert_eq!(summary.expenses_utility, 2_500);
}

#[test]
fn mismatched_payments_emit_one_warning_with_the_difference() {
    let engine = build_engine(Seed {
        receipts: vec![receipt("r1", 15, 100_000, 90_909, 9_091, 10)],
        splits: vec![split("s1", "r1", 15, PaymentMethod::Card, 95_000)],
        ..Seed::default()
    });

    let report = engine.compute_month(STORE, day(15)).unwrap();
    assert_eq!(report.warnings.len(), 1);
    let warning = &report.warnings[0];
    assert_eq!(warning.code, SALES_PAYMENT_MISMATCH);
    assert_eq!(warning.value, 5_000);
}

#[test]
fn draft_closings_never_reach_the_monthly_totals() {
    // 95_000 actual vs 85_000 expected: a 10_000 difference, well past the
    // issue threshold -- but the closing is still a draft.
    let engine = build_engine(Seed {
        closings: vec![closing(15, 95_000, ClosingStatus::Draft)],
        ..Seed::default()
    });

    let report = engine.compute_month(STORE, day(15)).unwrap();
    assert_eq!(report.kpi.closing_difference_total, 0);
    assert_eq!(report.kpi.closing_issue_days, 0);
    let row = engine.compute_day(STORE, day(15));
    assert_eq!(row.closing_difference, None);
    assert_eq!(row.closing_issue_flag, None);
}

#[test]
fn confirmed_closings_carry_difference_and_issue_flag() {
    // expected = 30_000 + 50_000 + 10_000 - 5_000 = 85_000
    let engine = build_engine(Seed {
        closings: vec![
            closing(10, 85_999, ClosingStatus::Confirmed), // +999: under threshold
            closing(11, 86_000, ClosingStatus::Approved),  // +1000: at threshold
        ],
        ..Seed::default()
    });

    let rows = engine.compute_monthly_daily(STORE, day(1)).unwrap();
    let tenth = rows.iter().find(|r| r.date == day(10)).unwrap();
    assert_eq!(tenth.closing_difference, Some(999));
    assert_eq!(tenth.closing_issue_flag, Some(false));
    assert_eq!(tenth.expected_cash_balance, Some(85_000));
    assert_eq!(tenth.actual_cash_balance, Some(85_999));

    let eleventh = rows.iter().find(|r| r.date == day(11)).unwrap();
    assert_eq!(eleventh.closing_issue_flag, Some(true));

    let report = engine.compute_month(STORE, day(1)).unwrap();
    assert_eq!(report.kpi.closing_difference_total, 999 + 1000);
    assert_eq!(report.kpi.closing_issue_days, 1);
}

#[test]
fn cogs_follows_the_category_settings() {
    let engine = build_engine(Seed {
        receipts: vec![receipt("r1", 15, 100_000, 90_909, 9_091, 10)],
        expenses: vec![
            expense("e1", 15, 30_000, ExpenseCategory::Food),
            expense("e2", 15, 5_000, ExpenseCategory::Drink),
            expense("e3", 15, 8_000, ExpenseCategory::Utility),
        ],
        ..Seed::default()
    });

    let row = engine.compute_day(STORE, day(15));
    // Default settings: food and drink are COGS, utility is not.
    assert_eq!(row.cogs_total, 35_000);
    assert_eq!(row.expenses_total, 43_000);
    assert_eq!(row.cogs_ratio, Some(0.35));

    let report = engine.compute_month(STORE, day(15)).unwrap();
    assert_eq!(report.kpi.gross_profit, 65_000);
    assert_eq!(report.kpi.gross_margin_ratio, Some(0.65));
}

#[test]
fn unapproved_expenses_are_ignored() {
    let mut submitted = expense("e2", 15, 9_999, ExpenseCategory::Food);
    submitted.status = ExpenseStatus::Submitted;
    let engine = build_engine(Seed {
        expenses: vec![expense("e1", 15, 1_000, ExpenseCategory::Food), submitted],
        ..Seed::default()
    });

    assert_eq!(engine.compute_day(STORE, day(15)).expenses_total, 1_000);
}

#[test]
fn labor_minutes_feed_sales_per_labor_hour() {
    let engine = build_engine(Seed {
        receipts: vec![receipt("r1", 15, 60_000, 54_545, 5_455, 6)],
        time_records: vec![
            time_record(1, 15, (9, 17), 60),  // 420 minutes
            time_record(2, 15, (12, 18), 0),  // 360 minutes
        ],
        ..Seed::default()
    });

    let report = engine.compute_month(STORE, day(15)).unwrap();
    assert_eq!(report.kpi.labor_minutes_total, 780);
    assert_eq!(report.kpi.sales_per_labor_hour, Some(60_000.0 / 13.0));
}

#[test]
fn unapproved_time_records_do_not_count() {
    let mut draft = time_record(1, 15, (9, 17), 0);
    draft.status = TimeRecordStatus::Draft;
    let engine = build_engine(Seed {
        time_records: vec![draft, time_record(2, 15, (9, 10), 0)],
        ..Seed::default()
    });

    assert_eq!(engine.compute_day(STORE, day(15)).labor_minutes_total, 60);
}

#[test]
fn vendor_breakdown_resolves_names_and_caps_at_ten() {
    let mut expenses = Vec::new();
    // Twelve distinct raw vendors with descending spend.
    for i in 0..12 {
        let mut e = expense(&format!("e{i}"), 15, 12_000 - (i as i64) * 500, ExpenseCategory::Food);
        e.vendor_name_raw = Some(format!("vendor {i:02}"));
        expenses.push(e);
    }
    // One linked to the registry, one with nothing at all.
    let mut linked = expense("linked", 15, 50_000, ExpenseCategory::Drink);
    linked.vendor_id = Some("vendor_1".to_string());
    expenses.push(linked);
    expenses.push(expense("bare", 15, 40_000, ExpenseCategory::Misc));

    let engine = build_engine(Seed {
        expenses,
        vendors: vec![Vendor {
            id: "vendor_1".to_string(),
            store_id: STORE.to_string(),
            name: "Sakaya B".to_string(),
            category: VendorCategory::DrinkSupplier,
            is_active: true,
        }],
        ..Seed::default()
    });

    let report = engine.compute_month(STORE, day(15)).unwrap();
    let vendors = &report.breakdowns.expenses_by_vendor;
    assert_eq!(vendors.len(), 10);
    assert_eq!(vendors[0].vendor_name, "Sakaya B");
    assert_eq!(vendors[0].amount, 50_000);
    assert_eq!(vendors[1].vendor_name, UNASSIGNED_VENDOR_LABEL);
    // Descending by amount throughout.
    for pair in vendors.windows(2) {
        assert!(pair[0].amount >= pair[1].amount);
    }
}

#[test]
fn category_breakdown_sorts_by_amount_with_stable_ties() {
    let engine = build_engine(Seed {
        expenses: vec![
            expense("e1", 15, 3_000, ExpenseCategory::Misc),
            expense("e2", 15, 7_000, ExpenseCategory::Food),
            expense("e3", 15, 3_000, ExpenseCategory::Consumable),
        ],
        ..Seed::default()
    });

    let report = engine.compute_month(STORE, day(15)).unwrap();
    let categories: Vec<ExpenseCategory> = report
        .breakdowns
        .expenses_by_category
        .iter()
        .map(|c| c.category)
        .collect();
    // Tie between consumable and misc resolves by declaration order.
    assert_eq!(
        categories,
        vec![
            ExpenseCategory::Food,
            ExpenseCategory::Consumable,
            ExpenseCategory::Misc
        ]
    );
}

#[test]
fn invalid_range_is_rejected_whole() {
    let engine = build_engine(Seed::default());
    let err = engine.compute_daily(STORE, day(20), day(10)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidRange(_)));
}

#[test]
fn recomputation_is_deterministic() {
    let engine = build_engine(Seed {
        receipts: vec![receipt("r1", 15, 10_000, 9_091, 909, 2)],
        splits: vec![split("s1", "r1", 15, PaymentMethod::Cash, 10_000)],
        expenses: vec![expense("e1", 15, 4_000, ExpenseCategory::Food)],
        closings: vec![closing(15, 85_000, ClosingStatus::Confirmed)],
        ..Seed::default()
    });

    let first = engine.compute_month(STORE, day(15)).unwrap();
    let second = engine.compute_month(STORE, day(15)).unwrap();
    assert_eq!(first, second);

    let daily_first = engine.compute_monthly_daily(STORE, day(15)).unwrap();
    let daily_second = engine.compute_monthly_daily(STORE, day(15)).unwrap();
    assert_eq!(daily_first, daily_second);
}

#[test]
fn other_stores_records_stay_invisible() {
    let mut foreign = receipt("r2", 15, 77_000, 70_000, 7_000, 3);
    foreign.store_id = "store_2".to_string();
    let engine = build_engine(Seed {
        receipts: vec![receipt("r1", 15, 10_000, 9_091, 909, 2), foreign],
        ..Seed::default()
    });

    assert_eq!(engine.compute_day(STORE, day(15)).sales_total_incl_tax, 10_000);
}

#[test]
fn attendance_rows_sort_by_date_then_name_and_fall_back_on_ids() {
    let engine = build_engine(Seed {
        time_records: vec![
            time_record(2, 16, (9, 17), 0),
            time_record(1, 15, (9, 17), 0),
            time_record(7, 15, (10, 12), 0), // not in the directory
        ],
        employees: vec![
            Employee {
                id: 1,
                name: "Yamada Taro".to_string(),
                role: "staff".to_string(),
            },
            Employee {
                id: 2,
                name: "Sato Hanako".to_string(),
                role: "staff".to_string(),
            },
        ],
        ..Seed::default()
    });

    let rows = engine.compute_monthly_attendance(day(1)).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].date, day(15));
    assert_eq!(rows[0].employee_name, "Yamada Taro");
    assert_eq!(rows[1].employee_name, "employee 7");
    assert_eq!(rows[2].date, day(16));
    assert_eq!(rows[2].employee_name, "Sato Hanako");
    assert_eq!(rows[0].worked_minutes, 480);
}
