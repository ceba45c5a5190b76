//! Aggregation engine for a single store's back-office reports.
//!
//! Six kinds of operational records (sales receipts, payment splits,
//! expenses, cash drawer transactions, daily closings and staff time
//! records) are read through collaborator store traits and joined into
//! derived report values: a daily series, a monthly report with KPIs,
//! breakdowns and consistency warnings, a flat monthly summary, and
//! attendance rows.
//!
//! The engine is synchronous and stateless: it owns no records, every
//! operation is a pure function of the stores' current contents, and the
//! same inputs always produce the same report. Reference in-memory store
//! implementations live in [`memory`].

pub use cash::{
    CashTransaction, CashTransactionCategory, CashTransactionFilter, CashTransactionKind,
    CashTransactionStore,
};
pub use closing::{CLOSING_ISSUE_THRESHOLD, ClosingStatus, ClosingStore, DailyClosing};
pub use employee::{Employee, EmployeeDirectory};
pub use error::EngineError;
pub use expense::{
    Expense, ExpenseCategory, ExpenseFilter, ExpensePaymentMethod, ExpenseStatus, ExpenseStore,
};
pub use ops::{Engine, EngineBuilder};
pub use ratio::safe_ratio;
pub use report::{
    AttendanceRow, CategoryAmount, DailyRow, MethodAmount, MonthlyBreakdowns, MonthlyKpi,
    MonthlyReport, MonthlySummary, ReportWarning, SALES_PAYMENT_MISMATCH, UNASSIGNED_VENDOR_LABEL,
    VendorSpend,
};
pub use sales::{PaymentMethod, PaymentSplit, ReceiptStatus, SalesReceipt, SalesStore};
pub use settings::{
    CostCategorySetting, CostCategorySettingsStore, default_settings, merge_with_defaults,
};
pub use timecard::{TimeRecord, TimeRecordStatus, TimeRecordStore};
pub use vendor::{Vendor, VendorCategory, VendorStore};

pub mod calendar;
mod cash;
mod closing;
mod employee;
mod error;
mod expense;
pub mod memory;
mod ops;
mod ratio;
mod report;
mod sales;
mod settings;
mod timecard;
mod vendor;

type ResultEngine<T> = Result<T, EngineError>;
