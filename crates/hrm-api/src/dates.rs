//! Wire formats for calendar dates and clock times.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

use crate::error::{ApiError, Result};

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]");

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str, field: &str) -> Result<Date> {
    Date::parse(value.trim(), DATE_FORMAT)
        .map_err(|_| ApiError::validation(format!("{field} must be a date in YYYY-MM-DD format")))
}

/// Parses an `HH:MM` 24-hour clock time.
pub fn parse_time(value: &str, field: &str) -> Result<Time> {
    Time::parse(value.trim(), TIME_FORMAT)
        .map_err(|_| ApiError::validation(format!("{field} must be a time in HH:MM format")))
}

pub fn format_date(date: Date) -> String {
    // Formatting a Date with a date-only description cannot fail.
    date.format(DATE_FORMAT).unwrap_or_default()
}

pub fn format_time(time: Time) -> String {
    time.format(TIME_FORMAT).unwrap_or_default()
}

/// Today's date in UTC.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-03-01", "Start date").unwrap(), date!(2024 - 03 - 01));
        assert_eq!(parse_date(" 2024-12-31 ", "Start date").unwrap(), date!(2024 - 12 - 31));

        let err = parse_date("01/03/2024", "Start date").unwrap_err();
        assert_eq!(err.to_string(), "Start date must be a date in YYYY-MM-DD format");
        assert!(parse_date("2024-02-30", "Start date").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("09:30", "Start time").unwrap(), time!(09:30));
        assert_eq!(parse_time("23:59", "End time").unwrap(), time!(23:59));
        assert!(parse_time("24:00", "End time").is_err());
        assert!(parse_time("9am", "End time").is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(format_date(date!(2024 - 03 - 01)), "2024-03-01");
        assert_eq!(format_time(time!(07:05)), "07:05");
    }
}
