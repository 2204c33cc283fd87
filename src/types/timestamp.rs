//! Parsing for the forecast API's hour-resolution timestamps (`2024-01-01:12`).

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("expected 'YYYY-MM-DD:HH', got '{0}'")]
    Format(String),
    #[error("invalid calendar date in '{0}'")]
    Date(String),
    #[error("hour out of range in '{0}'")]
    Hour(String),
}

/// Parses a `YYYY-MM-DD:HH` timestamp into a timezone-naive date-hour.
///
/// The format carries no minutes, seconds or offset, so those are always
/// zero in the result.
///
/// ```
/// use chrono::{NaiveDate, Timelike};
/// use forecast_insights::parse_timestamp;
///
/// let ts = parse_timestamp("2024-01-01:12").unwrap();
/// assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
/// assert_eq!(ts.hour(), 12);
/// ```
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TimestampError> {
    // chrono refuses a time without minutes, so split the hour off by hand.
    let (date_part, hour_part) = value
        .split_once(':')
        .ok_or_else(|| TimestampError::Format(value.to_string()))?;

    if hour_part.len() != 2 || !hour_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimestampError::Format(value.to_string()));
    }
    let hour: u32 = hour_part
        .parse()
        .map_err(|_| TimestampError::Format(value.to_string()))?;

    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| TimestampError::Date(value.to_string()))?;

    date.and_hms_opt(hour, 0, 0)
        .ok_or_else(|| TimestampError::Hour(value.to_string()))
}
