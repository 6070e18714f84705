//! Month calendar grid
//!
//! Builds the 6x7 cell grid the meeting calendar renders: leading and
//! trailing days pad out to full weeks starting on Sunday, and each
//! cell carries the meetings scheduled on that UTC date.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::store::models::Meeting;

/// Six weeks of seven days
const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// False for the padding days of the neighboring months
    pub in_month: bool,
    pub meetings: Vec<Meeting>,
}

pub fn month_grid(year: i32, month: u32, meetings: &[Meeting]) -> Result<Vec<CalendarCell>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Validation(format!("Invalid month: {}-{}", year, month)))?;

    let offset = first.weekday().num_days_from_sunday() as i64;
    let grid_start = first - Duration::days(offset);

    let cells = (0..GRID_CELLS as i64)
        .map(|i| {
            let date = grid_start + Duration::days(i);
            let on_this_day = meetings
                .iter()
                .filter(|m| m.scheduled_at.date_naive() == date)
                .cloned()
                .collect();
            CalendarCell {
                date,
                in_month: date.year() == year && date.month() == month,
                meetings: on_this_day,
            }
        })
        .collect();

    Ok(cells)
}
