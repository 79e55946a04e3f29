use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{ImportError, Result};

/// Modified Julian Date of the Unix epoch (1970-01-01 00:00 UTC).
pub const MJD_UNIX_EPOCH: f64 = 40587.0;

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Convert a Modified Julian Date to UTC, rounded to the nearest minute.
///
/// Forecast rows land on whole hours; the rounding absorbs the sub-second
/// error left by the file's six-decimal MJD values.
pub fn mjd_to_utc(mjd: f64) -> Option<DateTime<Utc>> {
    if !mjd.is_finite() {
        return None;
    }
    let seconds = (mjd - MJD_UNIX_EPOCH) * SECONDS_PER_DAY;
    let minutes = (seconds / SECONDS_PER_MINUTE).round();
    if minutes < (i64::MIN / 60) as f64 || minutes > (i64::MAX / 60) as f64 {
        return None;
    }
    DateTime::from_timestamp(minutes as i64 * 60, 0)
}

/// Convert a UTC timestamp to a Modified Julian Date.
pub fn utc_to_mjd(timestamp: DateTime<Utc>) -> f64 {
    timestamp.timestamp() as f64 / SECONDS_PER_DAY + MJD_UNIX_EPOCH
}

pub fn truncate_to_hour(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    let secs = timestamp.timestamp();
    DateTime::from_timestamp(secs - secs.rem_euclid(3600), 0).unwrap_or(timestamp)
}

pub fn truncate_to_minute(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    let secs = timestamp.timestamp();
    DateTime::from_timestamp(secs - secs.rem_euclid(60), 0).unwrap_or(timestamp)
}

/// Parse a user-supplied reference time.
///
/// Accepts RFC 3339 (`2009-12-01T06:00:00Z`) and the shorter
/// `YYYY-MM-DD HH:MM` form, which is taken as UTC.
pub fn parse_reference(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(ImportError::InvalidReference(input.to_string()))
}
