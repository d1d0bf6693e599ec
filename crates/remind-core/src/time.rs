//! Date/time parsing and alarm-time derivation.
//!
//! Dates are `YEAR-MONTH-DAY` with a 1-based month, times are `HOUR:MINUTE`
//! on a 24-hour clock. Zero padding is accepted but never required, so
//! `2025-3-1` and `2025-03-01` name the same day.
//!
//! The alarm instant is the local wall-clock time with seconds and millis
//! zeroed. Wall times that fall in a DST gap move forward one hour; wall
//! times that occur twice resolve to the earlier instant.

use chrono::{Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};

use crate::errors::{ReminderError, Result};

/// Parse a `YEAR-MONTH-DAY` date into a calendar date.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    let invalid = || ReminderError::validation("date", format!("expected YEAR-MONTH-DAY, got {date:?}"));

    let parts: Vec<&str> = date.trim().split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(invalid());
    };
    let year: i32 = year.trim().parse().map_err(|_| invalid())?;
    let month: u32 = month.trim().parse().map_err(|_| invalid())?;
    let day: u32 = day.trim().parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ReminderError::validation("date", format!("{date:?} is not a calendar date")))
}

/// Parse an `HOUR:MINUTE` 24-hour time.
pub fn parse_time(time: &str) -> Result<NaiveTime> {
    let invalid = || ReminderError::validation("time", format!("expected HOUR:MINUTE, got {time:?}"));

    let (hour, minute) = time.trim().split_once(':').ok_or_else(invalid)?;
    let hour: u32 = hour.trim().parse().map_err(|_| invalid())?;
    let minute: u32 = minute.trim().parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| ReminderError::validation("time", format!("{time:?} is not a wall-clock time")))
}

/// Epoch millis for `(date, time)` in the local time zone.
pub fn alarm_epoch_millis(date: &str, time: &str) -> Result<i64> {
    alarm_epoch_millis_in(date, time, &Local)
}

/// Epoch millis for `(date, time)` interpreted in `tz`.
pub fn alarm_epoch_millis_in<Tz: TimeZone>(date: &str, time: &str, tz: &Tz) -> Result<i64> {
    let naive = NaiveDateTime::new(parse_date(date)?, parse_time(time)?);

    let instant = match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t,
        LocalResult::None => {
            let shifted = naive.checked_add_signed(TimeDelta::hours(1)).ok_or_else(|| {
                ReminderError::validation("date", format!("{date} {time} is out of range"))
            })?;
            tz.from_local_datetime(&shifted).earliest().ok_or_else(|| {
                ReminderError::validation("time", format!("{date} {time} does not exist locally"))
            })?
        }
    };
    Ok(instant.timestamp_millis())
}

/// Current time as epoch millis.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
