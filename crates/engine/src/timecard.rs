//! Staff time records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Approval status of a time record. Only `Approved` records count toward
/// labor totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRecordStatus {
    Draft,
    Approved,
    Rejected,
}

impl TimeRecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// One employee-day of attendance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeRecord {
    pub id: Uuid,
    pub employee_id: i64,
    pub store_id: String,
    /// The business day the shift belongs to.
    pub date: NaiveDate,
    pub clock_in_at: Option<DateTime<Utc>>,
    pub clock_out_at: Option<DateTime<Utc>>,
    pub break_minutes: i64,
    /// Live-shift state: whether the employee is currently on break.
    pub is_on_break: bool,
    pub last_break_start: Option<DateTime<Utc>>,
    pub status: TimeRecordStatus,
}

impl TimeRecord {
    /// Worked minutes for closed-period aggregation.
    ///
    /// A record with no clock-in, or no clock-out, contributes zero: an
    /// unclosed shift is not settled labor.
    pub fn worked_minutes(&self) -> i64 {
        let Some(clock_in) = self.clock_in_at else {
            return 0;
        };
        self.minutes_until(clock_in, self.clock_out_at.unwrap_or(clock_in))
    }

    /// Worked minutes with `now` standing in for a missing clock-out.
    ///
    /// This is the live view of an in-progress shift; `now` is passed
    /// explicitly so callers stay deterministic.
    pub fn worked_minutes_live(&self, now: DateTime<Utc>) -> i64 {
        let Some(clock_in) = self.clock_in_at else {
            return 0;
        };
        self.minutes_until(clock_in, self.clock_out_at.unwrap_or(now))
    }

    fn minutes_until(&self, clock_in: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        let seconds = (end - clock_in).num_seconds() - self.break_minutes * 60;
        (seconds / 60).max(0)
    }
}

/// Read access to time records. Callers filter by store, status and date.
pub trait TimeRecordStore: Send + Sync {
    fn load_all(&self) -> Vec<TimeRecord>;
}
