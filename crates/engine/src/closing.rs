//! End-of-day register closings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A counted-vs-expected difference at or above this many minor units flags
/// the day for review.
pub const CLOSING_ISSUE_THRESHOLD: i64 = 1000;

/// Closing lifecycle status.
///
/// A `Draft` closing only carries the automatically computed side and has no
/// counted balance worth trusting; aggregation counts `Confirmed` and
/// `Approved` closings only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingStatus {
    Draft,
    Confirmed,
    Approved,
}

impl ClosingStatus {
    /// Whether a closing with this status contributes to aggregation.
    pub fn is_counted(self) -> bool {
        matches!(self, Self::Confirmed | Self::Approved)
    }
}

/// One day's register closing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyClosing {
    pub store_id: String,
    pub date: NaiveDate,
    /// Drawer balance carried over from the previous closing.
    pub previous_cash_balance: i64,
    pub cash_sales: i64,
    pub cash_in_total: i64,
    pub cash_out_total: i64,
    /// What was actually counted in the drawer.
    pub actual_cash_balance: i64,
    pub note: String,
    pub status: ClosingStatus,
}

impl DailyClosing {
    /// The balance the drawer should hold.
    pub fn expected_cash_balance(&self) -> i64 {
        self.previous_cash_balance + self.cash_sales + self.cash_in_total - self.cash_out_total
    }

    /// Counted minus expected.
    pub fn difference(&self) -> i64 {
        self.actual_cash_balance - self.expected_cash_balance()
    }

    /// Whether the difference is large enough to need review.
    pub fn has_issue(&self) -> bool {
        self.difference().abs() >= CLOSING_ISSUE_THRESHOLD
    }
}

/// Read access to closings, one per store and day at most.
pub trait ClosingStore: Send + Sync {
    fn load_closing(&self, store_id: &str, date: NaiveDate) -> Option<DailyClosing>;
}
