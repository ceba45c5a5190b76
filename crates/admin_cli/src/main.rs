//! Operator CLI for chobo.
//!
//! Builds the aggregation engine over a seeded demo dataset, prints the
//! monthly report and writes the CSV exports. The demo stores stand in for
//! whatever backend a deployment wires into the engine.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use engine::memory::{
    MemoryCashTransactionStore, MemoryClosingStore, MemoryEmployeeDirectory, MemoryExpenseStore,
    MemorySalesStore, MemoryTimeRecordStore, MemoryVendorStore,
};
use engine::{
    CashTransaction, CashTransactionCategory, CashTransactionKind, ClosingStatus, DailyClosing,
    Employee, Engine, Expense, ExpenseCategory, ExpensePaymentMethod, ExpenseStatus,
    MonthlyReport, PaymentMethod, PaymentSplit, ReceiptStatus, SalesReceipt, TimeRecord,
    TimeRecordStatus, Vendor, VendorCategory,
};

#[derive(Parser, Debug)]
#[command(name = "chobo_admin")]
#[command(about = "Reporting utilities for chobo (monthly reports and CSV exports)")]
struct Cli {
    /// Store to report on (also read from `CHOBO_STORE_ID`).
    #[arg(long, env = "CHOBO_STORE_ID", default_value = "store_1")]
    store_id: String,

    /// Store display name carried into report rows and exports.
    #[arg(long, env = "CHOBO_STORE_NAME", default_value = "demo branch")]
    store_name: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the monthly report for the month containing the given date.
    Report(MonthArgs),
    /// Write the monthly summary, daily series and attendance CSVs.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct MonthArgs {
    /// Any date inside the target month (YYYY-MM-DD).
    #[arg(long)]
    month: NaiveDate,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Any date inside the target month (YYYY-MM-DD).
    #[arg(long)]
    month: NaiveDate,

    /// Directory the CSV files are written into.
    #[arg(long, default_value = "exports")]
    out_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Report(args) => {
            let engine = demo_engine(&cli.store_id, &cli.store_name, args.month);
            print_report(&engine, &cli.store_id, args.month)?;
        }
        Command::Export(args) => {
            let engine = demo_engine(&cli.store_id, &cli.store_name, args.month);
            export_csvs(&engine, &cli.store_id, &args)?;
        }
    }
    Ok(())
}

fn print_report(
    engine: &Engine,
    store_id: &str,
    month: NaiveDate,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let report: MonthlyReport = engine.compute_month(store_id, month)?;
    let kpi = &report.kpi;

    println!("monthly report {} / {}", report.store_id, report.month);
    println!();
    println!("sales (incl tax):     {:>12}", kpi.sales_total_incl_tax);
    println!("sales (excl tax):     {:>12}", kpi.sales_subtotal_excl_tax);
    println!("tax:                  {:>12}", kpi.sales_tax_total);
    println!(
        "receipts / guests:    {:>6} / {:<6}",
        kpi.receipt_count, kpi.guest_count
    );
    println!(
        "avg spend per guest:  {:>12}",
        fmt_amount_ratio(kpi.avg_spend_per_guest)
    );
    println!();
    println!(
        "payments: cash {} / card {} / qr {} / other {} (total {})",
        kpi.pay_cash, kpi.pay_card, kpi.pay_qr, kpi.pay_other, kpi.pay_total
    );
    println!(
        "mix:      cash {} / card {} / qr {} / other {}",
        fmt_percent(kpi.cash_ratio),
        fmt_percent(kpi.card_ratio),
        fmt_percent(kpi.qr_ratio),
        fmt_percent(kpi.other_ratio)
    );
    println!();
    println!("cogs total:           {:>12}", kpi.cogs_total);
    println!("cogs ratio:           {:>12}", fmt_percent(kpi.cogs_ratio));
    println!("gross profit:         {:>12}", kpi.gross_profit);
    println!(
        "gross margin:         {:>12}",
        fmt_percent(kpi.gross_margin_ratio)
    );
    println!();
    println!(
        "closing difference:   {:>12} over {} issue day(s)",
        kpi.closing_difference_total, kpi.closing_issue_days
    );
    println!("deposited to bank:    {:>12}", kpi.deposit_to_bank_total);
    println!("labor minutes:        {:>12}", kpi.labor_minutes_total);
    println!(
        "sales per labor hour: {:>12}",
        fmt_amount_ratio(kpi.sales_per_labor_hour)
    );

    if !report.breakdowns.expenses_by_vendor.is_empty() {
        println!();
        println!("top vendors:");
        for spend in &report.breakdowns.expenses_by_vendor {
            println!(
                "  {:<24} {:>10} ({} entries)",
                spend.vendor_name, spend.amount, spend.count
            );
        }
    }

    for warning in &report.warnings {
        println!();
        println!("warning [{}]: {} ({})", warning.code, warning.message, warning.value);
    }

    Ok(())
}

fn export_csvs(
    engine: &Engine,
    store_id: &str,
    args: &ExportArgs,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    std::fs::create_dir_all(&args.out_dir)?;

    let summary = engine.compute_monthly_summary(store_id, args.month)?;
    let daily = engine.compute_monthly_daily(store_id, args.month)?;
    let attendance = engine.compute_monthly_attendance(args.month)?;
    let label = &summary.year_month;

    let targets = [
        (
            args.out_dir.join(format!("monthly_summary_{label}.csv")),
            csv_export::monthly_summary_csv(&summary)?,
        ),
        (
            args.out_dir.join(format!("monthly_daily_{label}.csv")),
            csv_export::monthly_daily_csv(&daily)?,
        ),
        (
            args.out_dir.join(format!("attendance_{label}.csv")),
            csv_export::attendance_csv(&attendance)?,
        ),
    ];

    for (path, text) in &targets {
        csv_export::write_csv_file(path, text)?;
        tracing::info!(path = %path.display(), "export written");
    }
    Ok(())
}

fn fmt_percent(ratio: Option<f64>) -> String {
    match ratio {
        Some(value) => format!("{:.1}%", value * 100.0),
        None => "-".to_string(),
    }
}

fn fmt_amount_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(value) => format!("{value:.0}"),
        None => "-".to_string(),
    }
}

/// An engine over in-memory stores seeded with a few days of demo records
/// inside the target month.
fn demo_engine(store_id: &str, store_name: &str, month: NaiveDate) -> Engine {
    let seed_day = |d: u32| month.with_day(d).unwrap_or(month);
    let stamp = |day: NaiveDate, hour: u32, minute: u32| {
        Utc.from_utc_datetime(&day.and_hms_opt(hour, minute, 0).unwrap_or_default())
    };

    let d05 = seed_day(5);
    let d06 = seed_day(6);
    let d07 = seed_day(7);

    let receipts = vec![
        SalesReceipt {
            id: "r_0501".to_string(),
            store_id: store_id.to_string(),
            business_date: stamp(d05, 19, 30),
            total_incl_tax: 120_000,
            subtotal_excl_tax: 109_091,
            tax_total: 10_909,
            guest_count: 38,
            status: ReceiptStatus::Posted,
        },
        SalesReceipt {
            id: "r_0601".to_string(),
            store_id: store_id.to_string(),
            business_date: stamp(d06, 20, 0),
            total_incl_tax: 80_000,
            subtotal_excl_tax: 72_727,
            tax_total: 7_273,
            guest_count: 21,
            status: ReceiptStatus::Posted,
        },
        SalesReceipt {
            id: "r_0602".to_string(),
            store_id: store_id.to_string(),
            business_date: stamp(d06, 21, 15),
            total_incl_tax: -5_000,
            subtotal_excl_tax: -4_545,
            tax_total: -455,
            guest_count: 0,
            status: ReceiptStatus::Refunded,
        },
    ];

    // 40% cash, 50% card, remainder other -- signs follow the receipt.
    let mut splits = Vec::new();
    for receipt in &receipts {
        let abs_total = receipt.total_incl_tax.abs();
        let sign = if receipt.total_incl_tax >= 0 { 1 } else { -1 };
        let cash = abs_total * 4 / 10;
        let card = abs_total / 2;
        let other = abs_total - cash - card;
        for (method, amount) in [
            (PaymentMethod::Cash, cash),
            (PaymentMethod::Card, card),
            (PaymentMethod::Other, other),
        ] {
            if amount != 0 {
                splits.push(PaymentSplit {
                    id: Uuid::new_v4().to_string(),
                    receipt_id: receipt.id.clone(),
                    store_id: store_id.to_string(),
                    business_date: receipt.business_date,
                    method,
                    amount_incl_tax: sign * amount,
                });
            }
        }
    }

    let expenses = vec![
        Expense {
            id: "e_0501".to_string(),
            store_id: store_id.to_string(),
            date: stamp(d05, 10, 0),
            amount: 5_000,
            tax_amount: 0,
            category: ExpenseCategory::Food,
            payment_method: ExpensePaymentMethod::Cash,
            vendor_id: Some("vendor_1".to_string()),
            vendor_name_raw: None,
            employee_id: None,
            is_reimbursed: false,
            reimbursed_at: None,
            memo: "vegetables".to_string(),
            status: ExpenseStatus::Approved,
        },
        Expense {
            id: "e_0502".to_string(),
            store_id: store_id.to_string(),
            date: stamp(d05, 14, 0),
            amount: 12_000,
            tax_amount: 0,
            category: ExpenseCategory::Drink,
            payment_method: ExpensePaymentMethod::BankTransfer,
            vendor_id: Some("vendor_2".to_string()),
            vendor_name_raw: None,
            employee_id: None,
            is_reimbursed: false,
            reimbursed_at: None,
            memo: "monthly beer order".to_string(),
            status: ExpenseStatus::Approved,
        },
        Expense {
            id: "e_0601".to_string(),
            store_id: store_id.to_string(),
            date: stamp(d06, 13, 0),
            amount: 1_800,
            tax_amount: 0,
            category: ExpenseCategory::Consumable,
            payment_method: ExpensePaymentMethod::EmployeeAdvance,
            vendor_id: None,
            vendor_name_raw: Some("convenience store".to_string()),
            employee_id: Some(1),
            is_reimbursed: false,
            reimbursed_at: None,
            memo: "ice".to_string(),
            status: ExpenseStatus::Approved,
        },
    ];

    let cash = vec![
        CashTransaction {
            id: "c_0501".to_string(),
            store_id: store_id.to_string(),
            date: stamp(d05, 9, 30),
            kind: CashTransactionKind::In,
            amount: 30_000,
            category: Some(CashTransactionCategory::ChangePrep),
            vendor_name: None,
            description: "opening float".to_string(),
        },
        CashTransaction {
            id: "c_0601".to_string(),
            store_id: store_id.to_string(),
            date: stamp(d06, 14, 0),
            kind: CashTransactionKind::Out,
            amount: 1_200,
            category: Some(CashTransactionCategory::Purchase),
            vendor_name: Some("convenience store".to_string()),
            description: "ice run".to_string(),
        },
        CashTransaction {
            id: "c_0701".to_string(),
            store_id: store_id.to_string(),
            date: stamp(d07, 11, 0),
            kind: CashTransactionKind::Out,
            amount: 50_000,
            category: Some(CashTransactionCategory::DepositToBank),
            vendor_name: None,
            description: "sales deposit".to_string(),
        },
    ];

    let closings = vec![
        DailyClosing {
            store_id: store_id.to_string(),
            date: d05,
            previous_cash_balance: 30_000,
            cash_sales: 48_000,
            cash_in_total: 30_000,
            cash_out_total: 0,
            actual_cash_balance: 108_000,
            note: String::new(),
            status: ClosingStatus::Confirmed,
        },
        DailyClosing {
            store_id: store_id.to_string(),
            date: d06,
            previous_cash_balance: 108_000,
            cash_sales: 30_000,
            cash_in_total: 0,
            cash_out_total: 1_200,
            actual_cash_balance: 135_300,
            note: "drawer short by 1,500".to_string(),
            status: ClosingStatus::Confirmed,
        },
    ];

    let time_records = vec![
        TimeRecord {
            id: Uuid::new_v4(),
            employee_id: 1,
            store_id: store_id.to_string(),
            date: d05,
            clock_in_at: Some(stamp(d05, 17, 0)),
            clock_out_at: Some(stamp(d05, 23, 0)),
            break_minutes: 30,
            is_on_break: false,
            last_break_start: None,
            status: TimeRecordStatus::Approved,
        },
        TimeRecord {
            id: Uuid::new_v4(),
            employee_id: 2,
            store_id: store_id.to_string(),
            date: d06,
            clock_in_at: Some(stamp(d06, 17, 0)),
            clock_out_at: Some(stamp(d06, 22, 30)),
            break_minutes: 15,
            is_on_break: false,
            last_break_start: None,
            status: TimeRecordStatus::Approved,
        },
    ];

    let vendors = vec![
        Vendor {
            id: "vendor_1".to_string(),
            store_id: store_id.to_string(),
            name: "Yaoya A".to_string(),
            category: VendorCategory::FoodSupplier,
            is_active: true,
        },
        Vendor {
            id: "vendor_2".to_string(),
            store_id: store_id.to_string(),
            name: "Sakaya B".to_string(),
            category: VendorCategory::DrinkSupplier,
            is_active: true,
        },
    ];

    let employees = MemoryEmployeeDirectory::default();
    employees.add(Employee {
        id: 1,
        name: "Yamada Taro".to_string(),
        role: "staff".to_string(),
    });
    employees.add(Employee {
        id: 2,
        name: "Sato Hanako".to_string(),
        role: "staff".to_string(),
    });

    Engine::builder()
        .store_name(store_name)
        .sales(Arc::new(MemorySalesStore::new(receipts, splits)))
        .expenses(Arc::new(MemoryExpenseStore::new(expenses)))
        .cash_transactions(Arc::new(MemoryCashTransactionStore::new(cash)))
        .closings(Arc::new(MemoryClosingStore::new(closings)))
        .time_records(Arc::new(MemoryTimeRecordStore::new(time_records)))
        .vendors(Arc::new(MemoryVendorStore::new(vendors)))
        .employees(Arc::new(employees))
        .build()
}
