//! Timestamp parsing for the bracketed prefix of header lines.
//!
//! PHP writes `16-Oct-2026 10:20:30 UTC` (or a named zone such as
//! `Europe/Paris`); other producers write ISO-8601 or Apache-style dates.
//! Named zones are read as UTC, numeric offsets are honoured.

use chrono::{DateTime, NaiveDateTime};

/// Formats carrying a numeric UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%d-%b-%Y %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

/// Formats without zone information.
const NAIVE_FORMATS: &[&str] = &[
    "%d-%b-%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%a %b %d %H:%M:%S%.f %Y",
    "%a %b %e %H:%M:%S %Y",
];

/// Parse the contents of a header's leading `[...]` into epoch seconds.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp());
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.timestamp());
        }
    }

    if let Some(ts) = parse_naive(raw) {
        return Some(ts);
    }

    // Trailing zone name: "16-Oct-2026 10:20:30 America/New_York"
    let (head, zone) = raw.rsplit_once(' ')?;
    if is_zone_name(zone) {
        return parse_naive(head.trim_end());
    }

    None
}

fn parse_naive(text: &str) -> Option<i64> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc().timestamp())
}

fn is_zone_name(token: &str) -> bool {
    !token.is_empty()
        && token.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '+'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn epoch(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap().timestamp()
    }

    #[test]
    fn test_php_default_format() {
        assert_eq!(
            parse_timestamp("16-Oct-2026 10:20:30 UTC"),
            Some(epoch(2026, 10, 16, 10, 20, 30))
        );
    }

    #[test]
    fn test_named_zone_read_as_utc() {
        assert_eq!(
            parse_timestamp("01-Feb-2025 23:59:59 Europe/Paris"),
            Some(epoch(2025, 2, 1, 23, 59, 59))
        );
        assert_eq!(
            parse_timestamp("01-Feb-2025 23:59:59 America/New_York"),
            Some(epoch(2025, 2, 1, 23, 59, 59))
        );
    }

    #[test]
    fn test_numeric_offset_honoured() {
        assert_eq!(
            parse_timestamp("16-Oct-2026 10:20:30 +0200"),
            Some(epoch(2026, 10, 16, 8, 20, 30))
        );
    }

    #[test]
    fn test_iso_formats() {
        assert_eq!(
            parse_timestamp("2026-10-16T10:20:30Z"),
            Some(epoch(2026, 10, 16, 10, 20, 30))
        );
        assert_eq!(
            parse_timestamp("2026-10-16 10:20:30"),
            Some(epoch(2026, 10, 16, 10, 20, 30))
        );
    }

    #[test]
    fn test_apache_style() {
        assert_eq!(
            parse_timestamp("Fri Oct 16 10:20:30.123456 2026"),
            Some(epoch(2026, 10, 16, 10, 20, 30))
        );
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("client 10.0.0.1"), None);
    }
}
