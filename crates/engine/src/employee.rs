//! The employee directory, used to label attendance rows.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    /// Free-form role label ("staff", "manager", ...).
    pub role: String,
}

/// Name lookup for employees.
pub trait EmployeeDirectory: Send + Sync {
    fn name_for(&self, employee_id: i64) -> Option<String>;
}
