//! Calendar-date parsing and formatting, centralized so that the two input
//! formats (`YYYY-MM-DD` in data, `YYYY_MM_DD` embedded in snapshot file
//! names) and epoch-millisecond log timestamps are handled in one place.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const SNAPSHOT_DATE_FORMAT: &str = "%Y_%m_%d";

pub fn parse_iso_date(s: &str) -> Result<NaiveDate, Error> {
    Ok(NaiveDate::parse_from_str(s, DATE_FORMAT)?)
}

/// Extract the capture date embedded in a snapshot file name
/// (e.g. `users_2023_07_14.csv` → 2023-07-14). Returns `None` when no
/// `YYYY_MM_DD` token is present or the token is not a valid date.
pub fn snapshot_date_from_name(name: &str) -> Option<NaiveDate> {
    let bytes = name.as_bytes();
    for window in bytes.windows(10) {
        let shaped = window.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'_',
            _ => b.is_ascii_digit(),
        });
        if !shaped {
            continue;
        }
        // All-ASCII window, safe to reinterpret as str.
        let token = std::str::from_utf8(window).ok()?;
        if let Ok(date) = NaiveDate::parse_from_str(token, SNAPSHOT_DATE_FORMAT) {
            return Some(date);
        }
    }
    None
}

/// Raw event logs carry millisecond epoch timestamps.
pub fn datetime_from_epoch_ms(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

/// `MM-DD` key used by the holiday list.
pub fn month_day(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}
