//! In-memory reference implementations of the record stores.
//!
//! These behave the way a real backing store is expected to: range filters
//! compare by calendar day, optional predicates are ANDed, and results come
//! back newest first. Reads take `&self` and are safe to run concurrently;
//! writers go through the same locks, so a snapshot read during a write is
//! simply whichever side won the lock.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, NaiveDate, Utc};

use crate::cash::{CashTransaction, CashTransactionFilter, CashTransactionStore};
use crate::closing::{ClosingStore, DailyClosing};
use crate::employee::{Employee, EmployeeDirectory};
use crate::expense::{Expense, ExpenseFilter, ExpenseStore};
use crate::sales::{PaymentSplit, ReceiptStatus, SalesReceipt, SalesStore};
use crate::settings::{self, CostCategorySetting, CostCategorySettingsStore};
use crate::timecard::{TimeRecord, TimeRecordStore};
use crate::vendor::{Vendor, VendorStore};

fn in_day_range(stamp: DateTime<Utc>, from: NaiveDate, to: NaiveDate) -> bool {
    let day = stamp.date_naive();
    day >= from && day <= to
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Receipts and payment splits.
#[derive(Debug, Default)]
pub struct MemorySalesStore {
    receipts: RwLock<Vec<SalesReceipt>>,
    splits: RwLock<Vec<PaymentSplit>>,
}

impl MemorySalesStore {
    pub fn new(receipts: Vec<SalesReceipt>, splits: Vec<PaymentSplit>) -> Self {
        Self {
            receipts: RwLock::new(receipts),
            splits: RwLock::new(splits),
        }
    }

    /// Insert or replace a receipt by id.
    pub fn save_receipt(&self, receipt: SalesReceipt) {
        let mut receipts = write_lock(&self.receipts);
        match receipts.iter_mut().find(|r| r.id == receipt.id) {
            Some(existing) => *existing = receipt,
            None => receipts.push(receipt),
        }
    }

    /// Insert or replace a payment split by id.
    pub fn save_split(&self, split: PaymentSplit) {
        let mut splits = write_lock(&self.splits);
        match splits.iter_mut().find(|s| s.id == split.id) {
            Some(existing) => *existing = split,
            None => splits.push(split),
        }
    }
}

impl SalesStore for MemorySalesStore {
    fn fetch_receipts(
        &self,
        store_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        statuses: &[ReceiptStatus],
    ) -> Vec<SalesReceipt> {
        let mut out: Vec<SalesReceipt> = read_lock(&self.receipts)
            .iter()
            .filter(|r| r.store_id == store_id)
            .filter(|r| in_day_range(r.business_date, from, to))
            .filter(|r| statuses.contains(&r.status))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.business_date.cmp(&a.business_date));
        out
    }

    fn fetch_payment_splits(
        &self,
        store_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<PaymentSplit> {
        read_lock(&self.splits)
            .iter()
            .filter(|s| s.store_id == store_id)
            .filter(|s| in_day_range(s.business_date, from, to))
            .cloned()
            .collect()
    }
}

/// Expense entries.
#[derive(Debug, Default)]
pub struct MemoryExpenseStore {
    items: RwLock<Vec<Expense>>,
}

impl MemoryExpenseStore {
    pub fn new(items: Vec<Expense>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Insert or replace an expense by id.
    pub fn save(&self, expense: Expense) {
        let mut items = write_lock(&self.items);
        match items.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => *existing = expense,
            None => items.push(expense),
        }
    }

    pub fn delete(&self, id: &str) {
        write_lock(&self.items).retain(|e| e.id != id);
    }

    pub fn find_by_id(&self, id: &str) -> Option<Expense> {
        read_lock(&self.items).iter().find(|e| e.id == id).cloned()
    }
}

impl ExpenseStore for MemoryExpenseStore {
    fn fetch_expenses(
        &self,
        store_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        filter: &ExpenseFilter,
    ) -> Vec<Expense> {
        let mut out: Vec<Expense> = read_lock(&self.items)
            .iter()
            .filter(|e| e.store_id == store_id)
            .filter(|e| in_day_range(e.date, from, to))
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        out
    }
}

/// Cash drawer transactions.
#[derive(Debug, Default)]
pub struct MemoryCashTransactionStore {
    items: RwLock<Vec<CashTransaction>>,
}

impl MemoryCashTransactionStore {
    pub fn new(items: Vec<CashTransaction>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Insert or replace a transaction by id.
    pub fn save(&self, tx: CashTransaction) {
        let mut items = write_lock(&self.items);
        match items.iter_mut().find(|t| t.id == tx.id) {
            Some(existing) => *existing = tx,
            None => items.push(tx),
        }
    }

    pub fn delete(&self, id: &str) {
        write_lock(&self.items).retain(|t| t.id != id);
    }
}

impl CashTransactionStore for MemoryCashTransactionStore {
    fn fetch_transactions(
        &self,
        store_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        filter: &CashTransactionFilter,
    ) -> Vec<CashTransaction> {
        let mut out: Vec<CashTransaction> = read_lock(&self.items)
            .iter()
            .filter(|t| t.store_id == store_id)
            .filter(|t| in_day_range(t.date, from, to))
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        out
    }
}

/// Daily closings, one per store and day.
#[derive(Debug, Default)]
pub struct MemoryClosingStore {
    items: RwLock<HashMap<(String, NaiveDate), DailyClosing>>,
}

impl MemoryClosingStore {
    pub fn new(closings: Vec<DailyClosing>) -> Self {
        let items = closings
            .into_iter()
            .map(|c| ((c.store_id.clone(), c.date), c))
            .collect();
        Self {
            items: RwLock::new(items),
        }
    }

    /// Insert or replace the closing for its store and day.
    pub fn save_closing(&self, closing: DailyClosing) {
        write_lock(&self.items).insert((closing.store_id.clone(), closing.date), closing);
    }
}

impl ClosingStore for MemoryClosingStore {
    fn load_closing(&self, store_id: &str, date: NaiveDate) -> Option<DailyClosing> {
        read_lock(&self.items)
            .get(&(store_id.to_string(), date))
            .cloned()
    }
}

/// Staff time records, keyed by employee and day.
#[derive(Debug, Default)]
pub struct MemoryTimeRecordStore {
    items: RwLock<Vec<TimeRecord>>,
}

impl MemoryTimeRecordStore {
    pub fn new(items: Vec<TimeRecord>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub fn load(&self, employee_id: i64, date: NaiveDate) -> Option<TimeRecord> {
        read_lock(&self.items)
            .iter()
            .find(|r| r.employee_id == employee_id && r.date == date)
            .cloned()
    }

    /// Insert or replace the record for its employee and day.
    pub fn save(&self, record: TimeRecord) {
        let mut items = write_lock(&self.items);
        match items
            .iter_mut()
            .find(|r| r.employee_id == record.employee_id && r.date == record.date)
        {
            Some(existing) => *existing = record,
            None => items.push(record),
        }
    }

    pub fn delete(&self, employee_id: i64, date: NaiveDate) {
        write_lock(&self.items).retain(|r| !(r.employee_id == employee_id && r.date == date));
    }
}

impl TimeRecordStore for MemoryTimeRecordStore {
    fn load_all(&self) -> Vec<TimeRecord> {
        read_lock(&self.items).clone()
    }
}

/// Cost category settings, persisted as a JSON payload per store.
///
/// The JSON round-trip mirrors how a real key-value backend stores the set,
/// which is what makes the merge-on-read migration observable: a payload
/// written before a category existed decodes without it, and `load_settings`
/// fills the gap from the defaults.
#[derive(Debug, Default)]
pub struct MemoryCostCategorySettingsStore {
    payloads: RwLock<HashMap<String, String>>,
}

impl MemoryCostCategorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw payload, bypassing `save_settings`. Lets tests seed
    /// old-format state.
    pub fn set_raw_payload(&self, store_id: &str, payload: String) {
        write_lock(&self.payloads).insert(store_id.to_string(), payload);
    }
}

impl CostCategorySettingsStore for MemoryCostCategorySettingsStore {
    fn load_settings(&self, store_id: &str) -> Vec<CostCategorySetting> {
        if let Some(raw) = read_lock(&self.payloads).get(store_id)
            && let Ok(decoded) = serde_json::from_str::<Vec<CostCategorySetting>>(raw)
        {
            return settings::merge_with_defaults(decoded);
        }

        let seeded = settings::default_settings();
        self.save_settings(store_id, &seeded);
        seeded
    }

    fn save_settings(&self, store_id: &str, settings: &[CostCategorySetting]) {
        match serde_json::to_string(settings) {
            Ok(raw) => {
                write_lock(&self.payloads).insert(store_id.to_string(), raw);
            }
            Err(err) => tracing::warn!("failed to encode cost category settings: {err}"),
        }
    }
}

/// Vendor registry.
#[derive(Debug, Default)]
pub struct MemoryVendorStore {
    items: RwLock<Vec<Vendor>>,
}

impl MemoryVendorStore {
    pub fn new(items: Vec<Vendor>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Insert or replace a vendor by id.
    pub fn save(&self, vendor: Vendor) {
        let mut items = write_lock(&self.items);
        match items.iter_mut().find(|v| v.id == vendor.id) {
            Some(existing) => *existing = vendor,
            None => items.push(vendor),
        }
    }
}

impl VendorStore for MemoryVendorStore {
    fn find_by_id(&self, vendor_id: &str) -> Option<Vendor> {
        read_lock(&self.items)
            .iter()
            .find(|v| v.id == vendor_id)
            .cloned()
    }
}

/// Employee directory.
#[derive(Debug, Default)]
pub struct MemoryEmployeeDirectory {
    items: RwLock<Vec<Employee>>,
}

impl MemoryEmployeeDirectory {
    pub fn new(items: Vec<Employee>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub fn add(&self, employee: Employee) {
        let mut items = write_lock(&self.items);
        match items.iter_mut().find(|e| e.id == employee.id) {
            Some(existing) => *existing = employee,
            None => items.push(employee),
        }
    }
}

impl EmployeeDirectory for MemoryEmployeeDirectory {
    fn name_for(&self, employee_id: i64) -> Option<String> {
        read_lock(&self.items)
            .iter()
            .find(|e| e.id == employee_id)
            .map(|e| e.name.clone())
    }
}
