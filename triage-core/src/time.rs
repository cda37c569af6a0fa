//! Date utilities: due-date parsing and day arithmetic.
//!
//! Nothing in the engine reads the clock; callers pass the evaluation date in.

use anyhow::Result;
use chrono::{Local, NaiveDate};

/// Parse an ISO calendar date like "2026-02-20".
pub fn parse_due_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid due date '{s}': {e}"))
}

/// Whole days from `today` to `due`; negative when `due` has passed.
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Today's date in the local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
