//! Monthly attendance aggregation.

use chrono::NaiveDate;

use crate::ResultEngine;
use crate::calendar::month_range;
use crate::report::AttendanceRow;

use super::Engine;

impl Engine {
    /// Attendance rows for every time record in the month containing
    /// `month`, ordered by date then employee name.
    ///
    /// Rows are deliberately not scoped to a store: the export this feeds
    /// covers the whole roster, and a record's own `store_id` stays
    /// available on the time record itself. All statuses are included; the
    /// status column is part of the export.
    pub fn compute_monthly_attendance(&self, month: NaiveDate) -> ResultEngine<Vec<AttendanceRow>> {
        let (start, end) = month_range(month)?;

        let mut rows: Vec<AttendanceRow> = self
            .time_records
            .load_all()
            .into_iter()
            .filter(|r| r.date >= start && r.date <= end)
            .map(|r| AttendanceRow {
                employee_id: r.employee_id,
                employee_name: self
                    .employees
                    .name_for(r.employee_id)
                    .unwrap_or_else(|| format!("employee {}", r.employee_id)),
                date: r.date,
                clock_in_at: r.clock_in_at,
                clock_out_at: r.clock_out_at,
                break_minutes: r.break_minutes,
                worked_minutes: r.worked_minutes(),
                status: r.status,
            })
            .collect();

        rows.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.employee_name.cmp(&b.employee_name))
        });
        Ok(rows)
    }
}
