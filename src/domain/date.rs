/// Calendar utilities for timezone-aware day resolution and date arithmetic
///
/// All date handling in this crate works on whole calendar days. Internally
/// dates are `chrono::NaiveDate`; the `YYYY-MM-DD` string form only appears
/// at the tool and storage boundaries (which is what NaiveDate's Display
/// prints). "Today" depends on the user's IANA timezone, never on the UTC
/// day: a user at UTC+5:30 rolls to a new day 5.5 hours before UTC midnight.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::domain::DomainError;

/// The calendar date of the instant `now` as perceived in `tz`.
///
/// Taking the instant as a parameter keeps everything below the server
/// entry points testable with fixed dates.
pub fn local_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Today's calendar date in the given timezone.
pub fn today_in_tz(tz: Tz) -> NaiveDate {
    local_date(Utc::now(), tz)
}

/// Parse an IANA timezone name (e.g. "Asia/Kolkata").
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse::<Tz>()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

/// Offset a date by whole calendar days.
///
/// Whole-date arithmetic on NaiveDate is immune to DST shifts by
/// construction; there is no wall clock involved.
pub fn add_days(date: NaiveDate, offset: i64) -> NaiveDate {
    date + chrono::Duration::days(offset)
}

/// Parse a strict `YYYY-MM-DD` date key.
///
/// The shape check rejects anything that is not exactly four digits, a dash,
/// two digits, a dash, two digits; chrono then rejects impossible dates such
/// as 2026-02-30.
pub fn parse_date_key(s: &str) -> Result<NaiveDate, DomainError> {
    if !has_date_key_shape(s) {
        return Err(DomainError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidDate(s.to_string()))
}

/// Parse a strict `YYYY-MM` month key into (year, month).
pub fn parse_month_key(s: &str) -> Result<(i32, u32), DomainError> {
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 7
        && bytes[4] == b'-'
        && bytes.iter().enumerate().all(|(i, b)| i == 4 || b.is_ascii_digit());
    if !shape_ok {
        return Err(DomainError::InvalidMonth(s.to_string()));
    }

    let year: i32 = s[..4].parse().map_err(|_| DomainError::InvalidMonth(s.to_string()))?;
    let month: u32 = s[5..].parse().map_err(|_| DomainError::InvalidMonth(s.to_string()))?;
    if !(1..=12).contains(&month) {
        return Err(DomainError::InvalidMonth(s.to_string()));
    }

    Ok((year, month))
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    // Both dates are valid for any month in 1..=12.
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
    };
    (next - first).num_days() as u32
}

/// First day of the given month.
pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Last day of the given month.
pub fn last_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
}

fn has_date_key_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}
