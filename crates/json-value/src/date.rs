use chrono::{DateTime, SecondsFormat, Utc};

/// Parses an ISO-8601 timestamp such as `2014-01-02T03:04:05.678Z`.
///
/// Only full date-time strings with a `T` separator and an explicit `Z` or
/// `+hh:mm` offset are recognized, so plain strings that merely start with a
/// date are left alone.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let bytes = s.as_bytes();
    if bytes.len() < 20 || bytes[10] != b'T' || !bytes[..4].iter().all(u8::is_ascii_digit) {
        return None;
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Formats a date the way JavaScript's `toISOString` does.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}
