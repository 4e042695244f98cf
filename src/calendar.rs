use chrono::{Months, NaiveDate};

use crate::errors::{Result, ScheduleError};

/// advance by whole calendar months, clamping the day to the end of a shorter month
///
/// Jan 31 + 1 month is Feb 29 in a leap year and Feb 28 otherwise. Each due
/// date is computed from the schedule's start date, so Jan 31 + 2 months is
/// Mar 31 rather than the clamped Feb day carried forward.
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| ScheduleError::InvalidDate {
            message: format!("{date} + {months} months is out of range"),
        })
}
