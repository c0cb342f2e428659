//! Local wall-clock helpers.
//!
//! Calendar days in pomodesk are always the device's local day: `today()`
//! derives the date from local year/month/day components, never from a UTC
//! timestamp string, so sessions finished after midnight UTC but before local
//! midnight still land on the right day.

use chrono::{DateTime, Local, NaiveDate};

/// Current instant in the local time zone.
pub fn now_local() -> DateTime<Local> {
    Local::now()
}

/// Today's local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Seconds since the Unix epoch, for the persisted tick anchor.
pub fn epoch_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
