//! Calendar-day arithmetic shared by the aggregators.
//!
//! Records join on a business-day key: a timestamp truncated to its calendar
//! date. All range comparisons here are by calendar day, never by exact
//! timestamp, and month boundaries come from calendar arithmetic rather than
//! fixed 30/31-day assumptions.

use chrono::{Datelike, Months, NaiveDate};

use crate::{EngineError, ResultEngine};

/// First and last calendar day (inclusive) of the month containing `day`.
pub fn month_range(day: NaiveDate) -> ResultEngine<(NaiveDate, NaiveDate)> {
    let start = day
        .with_day(1)
        .ok_or_else(|| EngineError::InvalidMonth(format!("no first day for {day}")))?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next_month| next_month.pred_opt())
        .ok_or_else(|| EngineError::InvalidMonth(format!("no last day for {day}")))?;
    Ok((start, end))
}

/// Every calendar day of `[from, to]` in ascending order.
pub fn days_in_range(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |day| *day <= to)
}

/// The `YYYY-MM` key used to label monthly reports.
pub fn year_month_key(day: NaiveDate) -> String {
    day.format("%Y-%m").to_string()
}
