//! Calendar dates on both sides of the bridge.
//!
//! Input dates are `YYYY-MM-DD` and must name a real day. Dates coming back
//! from Things are AppleScript's locale-formatted text and are normalized to
//! the same canonical form when possible.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Date layouts AppleScript produces when coercing a date to text, tried in order.
const APP_DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%A, %B %d, %Y",
    "%A, %d %B %Y",
    "%A %d %B %Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%d. %B %Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
];

const APP_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// True when `value` has the `YYYY-MM-DD` shape and names a real calendar day.
pub fn is_valid_date(value: &str) -> bool {
    parse_canonical(value).is_some()
}

/// Validate a user-supplied date, naming the offending option on failure.
pub fn validate_date(label: &str, value: &str) -> Result<NaiveDate> {
    parse_canonical(value).ok_or_else(|| {
        Error::Validation(format!(
            "invalid {label} '{value}': expected a real calendar date as YYYY-MM-DD"
        ))
    })
}

fn parse_canonical(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let shape_ok = bytes.iter().enumerate().all(|(idx, byte)| match idx {
        4 | 7 => *byte == b'-',
        _ => byte.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }

    let year = value[0..4].parse().ok()?;
    let month = value[5..7].parse().ok()?;
    let day = value[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Normalize a date string reported by Things to `YYYY-MM-DD`.
///
/// Any trailing time component (`at 12:00:00 AM`, `00:00:00`) is ignored.
/// Returns `None` when no known layout matches.
pub fn normalize_app_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    APP_DATE_FORMATS.iter().find_map(|format| {
        let (date, rest) = NaiveDate::parse_and_remainder(raw, format).ok()?;
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            Some(date.format(CANONICAL_FORMAT).to_string())
        } else {
            None
        }
    })
}

/// Parse an ISO-8601 timestamp produced by AppleScript's `«class isot»` coercion.
pub fn parse_app_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    APP_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_real_dates() {
        for value in ["2025-01-31", "2024-02-29", "1999-12-31", "2025-03-14"] {
            assert!(is_valid_date(value), "{value} should be valid");
        }
    }

    #[test]
    fn rejects_impossible_dates() {
        for value in ["2025-13-01", "2025-02-30", "2023-02-29", "2025-00-10", "2025-04-31"] {
            assert!(!is_valid_date(value), "{value} should be invalid");
        }
    }

    #[test]
    fn rejects_wrong_shape() {
        for value in ["2025-3-14", "14-03-2025", "2025/03/14", "20250314", "", "2025-03-14 ", "２０２５-03-14"] {
            assert!(!is_valid_date(value), "{value:?} should be invalid");
        }
    }

    #[test]
    fn validate_date_names_the_option() {
        let err = validate_date("due date", "2025-02-30").expect_err("invalid");
        assert!(err.to_string().contains("due date"));
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn normalizes_english_applescript_dates() {
        assert_eq!(
            normalize_app_date("Friday, March 14, 2025 at 12:00:00 AM").as_deref(),
            Some("2025-03-14")
        );
        assert_eq!(
            normalize_app_date("Friday, March 7, 2025 00:00:00").as_deref(),
            Some("2025-03-07")
        );
    }

    #[test]
    fn normalizes_day_first_dates() {
        assert_eq!(
            normalize_app_date("Friday, 14 March 2025 at 00:00:00").as_deref(),
            Some("2025-03-14")
        );
        assert_eq!(normalize_app_date("14.03.2025").as_deref(), Some("2025-03-14"));
    }

    #[test]
    fn unknown_layout_is_not_normalized() {
        assert_eq!(normalize_app_date("vendredi 14 mars 2025"), None);
        assert_eq!(normalize_app_date("   "), None);
    }

    #[test]
    fn parses_isot_timestamps() {
        let parsed = parse_app_timestamp("2025-03-14T09:30:00").expect("timestamp");
        assert_eq!(parsed.to_string(), "2025-03-14 09:30:00");
        assert!(parse_app_timestamp("yesterday").is_none());
    }
}
