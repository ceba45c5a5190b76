//! Aggregation operations.
//!
//! The engine owns no records: every operation is a pure function of the
//! collaborating stores' current contents, so repeated calls over unchanged
//! data return identical values.

use std::sync::Arc;

use crate::cash::CashTransactionStore;
use crate::closing::ClosingStore;
use crate::employee::EmployeeDirectory;
use crate::expense::ExpenseStore;
use crate::memory::{
    MemoryCashTransactionStore, MemoryClosingStore, MemoryCostCategorySettingsStore,
    MemoryEmployeeDirectory, MemoryExpenseStore, MemorySalesStore, MemoryTimeRecordStore,
    MemoryVendorStore,
};
use crate::sales::SalesStore;
use crate::settings::CostCategorySettingsStore;
use crate::timecard::TimeRecordStore;
use crate::vendor::VendorStore;

mod attendance;
mod daily;
mod monthly;

/// The aggregation engine.
///
/// Holds its record stores behind trait objects; swap any of them out to
/// point the same computation at a different backend.
pub struct Engine {
    pub(crate) sales: Arc<dyn SalesStore>,
    pub(crate) expenses: Arc<dyn ExpenseStore>,
    pub(crate) cash_transactions: Arc<dyn CashTransactionStore>,
    pub(crate) closings: Arc<dyn ClosingStore>,
    pub(crate) time_records: Arc<dyn TimeRecordStore>,
    pub(crate) vendors: Arc<dyn VendorStore>,
    pub(crate) employees: Arc<dyn EmployeeDirectory>,
    pub(crate) cost_settings: Arc<dyn CostCategorySettingsStore>,
    pub(crate) store_name: String,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`.
///
/// Every store defaults to an empty in-memory implementation, so tests and
/// demos only override what they seed.
pub struct EngineBuilder {
    sales: Arc<dyn SalesStore>,
    expenses: Arc<dyn ExpenseStore>,
    cash_transactions: Arc<dyn CashTransactionStore>,
    closings: Arc<dyn ClosingStore>,
    time_records: Arc<dyn TimeRecordStore>,
    vendors: Arc<dyn VendorStore>,
    employees: Arc<dyn EmployeeDirectory>,
    cost_settings: Arc<dyn CostCategorySettingsStore>,
    store_name: String,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            sales: Arc::new(MemorySalesStore::default()),
            expenses: Arc::new(MemoryExpenseStore::default()),
            cash_transactions: Arc::new(MemoryCashTransactionStore::default()),
            closings: Arc::new(MemoryClosingStore::default()),
            time_records: Arc::new(MemoryTimeRecordStore::default()),
            vendors: Arc::new(MemoryVendorStore::default()),
            employees: Arc::new(MemoryEmployeeDirectory::default()),
            cost_settings: Arc::new(MemoryCostCategorySettingsStore::default()),
            store_name: String::new(),
        }
    }
}

impl EngineBuilder {
    pub fn sales(mut self, store: Arc<dyn SalesStore>) -> Self {
        self.sales = store;
        self
    }

    pub fn expenses(mut self, store: Arc<dyn ExpenseStore>) -> Self {
        self.expenses = store;
        self
    }

    pub fn cash_transactions(mut self, store: Arc<dyn CashTransactionStore>) -> Self {
        self.cash_transactions = store;
        self
    }

    pub fn closings(mut self, store: Arc<dyn ClosingStore>) -> Self {
        self.closings = store;
        self
    }

    pub fn time_records(mut self, store: Arc<dyn TimeRecordStore>) -> Self {
        self.time_records = store;
        self
    }

    pub fn vendors(mut self, store: Arc<dyn VendorStore>) -> Self {
        self.vendors = store;
        self
    }

    pub fn employees(mut self, directory: Arc<dyn EmployeeDirectory>) -> Self {
        self.employees = directory;
        self
    }

    pub fn cost_settings(mut self, store: Arc<dyn CostCategorySettingsStore>) -> Self {
        self.cost_settings = store;
        self
    }

    /// Display name carried into report rows and exports.
    pub fn store_name(mut self, name: impl Into<String>) -> Self {
        self.store_name = name.into();
        self
    }

    /// Construct `Engine`.
    pub fn build(self) -> Engine {
        Engine {
            sales: self.sales,
            expenses: self.expenses,
            cash_transactions: self.cash_transactions,
            closings: self.closings,
            time_records: self.time_records,
            vendors: self.vendors,
            employees: self.employees,
            cost_settings: self.cost_settings,
            store_name: self.store_name,
        }
    }
}
