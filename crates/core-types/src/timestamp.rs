use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%b %d, %Y"];

/// Coerces a raw timestamp label into a calendar timestamp.
///
/// Accepts RFC 3339 (the offset is dropped and the local wall-clock time kept),
/// plain dates and date-times in the common provider layouts, and Unix epoch
/// seconds.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, CoreError> {
    let trimmed = raw.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(parsed.and_time(NaiveTime::MIN));
        }
    }

    if let Ok(seconds) = trimmed.parse::<f64>() {
        if seconds.is_finite() {
            if let Some(parsed) = DateTime::from_timestamp(seconds.trunc() as i64, 0) {
                return Ok(parsed.naive_utc());
            }
        }
    }

    Err(CoreError::InvalidTimestamp(raw.to_string()))
}
