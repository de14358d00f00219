//! Date parsing and display for page timing.
//!
//! Front matter dates are matched against an ordered list of formats and the
//! first one that parses wins. Values without an offset are taken as UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Timestamp type used for page timing.
pub type Timestamp = DateTime<FixedOffset>;

/// Display format for dates in templates, e.g. `Jan 02, 2006`.
pub const DISPLAY_FORMAT: &str = "%b %d, %Y";

/// One accepted front matter date layout.
#[derive(Debug, Clone, Copy)]
enum Format {
    /// Date only, midnight UTC.
    Date(&'static str),
    /// Date and time without offset, UTC.
    Naive(&'static str),
    /// Date and time with an explicit offset.
    Offset(&'static str),
    Rfc3339,
    Rfc2822,
}

/// Accepted formats, tried in order.
const FORMATS: &[Format] = &[
    Format::Date("%Y-%m-%d"),
    Format::Naive("%Y-%m-%d %H:%M"),
    Format::Naive("%Y-%m-%d %H:%M:%S"),
    Format::Naive("%Y-%m-%dT%H:%M:%S"),
    Format::Rfc3339,
    Format::Offset("%Y-%m-%d %H:%M:%S %z"),
    Format::Rfc2822,
    Format::Date("%b %d, %Y"),
    Format::Naive("%b %d, %Y %H:%M"),
    Format::Naive("%b %d, %Y %H:%M:%S"),
];

impl Format {
    fn parse(self, s: &str) -> Option<Timestamp> {
        match self {
            Self::Date(fmt) => NaiveDate::parse_from_str(s, fmt)
                .ok()?
                .and_hms_opt(0, 0, 0)
                .map(|naive| naive.and_utc().fixed_offset()),
            Self::Naive(fmt) => NaiveDateTime::parse_from_str(s, fmt)
                .ok()
                .map(|naive| naive.and_utc().fixed_offset()),
            Self::Offset(fmt) => DateTime::parse_from_str(s, fmt).ok(),
            Self::Rfc3339 => DateTime::parse_from_rfc3339(s).ok(),
            Self::Rfc2822 => DateTime::parse_from_rfc2822(s).ok(),
        }
    }
}

/// Parse a front matter date. Returns `None` when no format matches.
pub fn parse_date(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    FORMATS.iter().find_map(|format| format.parse(s))
}

/// Format a timestamp for display.
pub fn format_date(time: &Timestamp) -> String {
    time.format(DISPLAY_FORMAT).to_string()
}

/// Build a timestamp from unix seconds and an offset in seconds east of UTC.
pub fn from_unix(seconds: i64, offset: i32) -> Option<Timestamp> {
    let offset = FixedOffset::east_opt(offset)?;
    DateTime::from_timestamp(seconds, 0).map(|utc| utc.with_timezone(&offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_iso_date() {
        let date = parse_date("2024-01-01").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 1));
        assert_eq!(date.hour(), 0);
        assert_eq!(date.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_iso_datetime_variants() {
        assert_eq!(parse_date("2024-03-05 14:30").unwrap().minute(), 30);
        assert_eq!(parse_date("2024-03-05 14:30:09").unwrap().second(), 9);
        assert_eq!(parse_date("2024-03-05T14:30:09").unwrap().hour(), 14);
    }

    #[test]
    fn test_parse_with_offset() {
        let date = parse_date("2024-03-05T14:30:00+02:00").unwrap();
        assert_eq!(date.offset().local_minus_utc(), 2 * 3600);

        let date = parse_date("2024-03-05 14:30:00 -0500").unwrap();
        assert_eq!(date.offset().local_minus_utc(), -5 * 3600);

        let date = parse_date("2024-03-05T14:30:00Z").unwrap();
        assert_eq!(date.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_rfc2822() {
        let date = parse_date("Tue, 5 Mar 2024 14:30:00 +0000").unwrap();
        assert_eq!((date.month(), date.day()), (3, 5));
    }

    #[test]
    fn test_parse_month_name_formats() {
        let date = parse_date("Jan 2, 2006").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2006, 1, 2));

        let date = parse_date("Jan 02, 2006 15:04").unwrap();
        assert_eq!((date.hour(), date.minute()), (15, 4));

        let date = parse_date("Jan 02, 2006 15:04:05").unwrap();
        assert_eq!(date.second(), 5);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_date("yesterday").is_none());
        assert!(parse_date("2024-13-01").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_format_date() {
        let date = parse_date("2024-01-01").unwrap();
        assert_eq!(format_date(&date), "Jan 01, 2024");
    }

    #[test]
    fn test_from_unix() {
        let date = from_unix(0, 3600).unwrap();
        assert_eq!(date.hour(), 1);
        assert_eq!(date.year(), 1970);
        assert!(from_unix(0, 100 * 3600).is_none());
    }
}
