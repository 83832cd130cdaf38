//! Date parsing for free-form frontmatter dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats tried after ISO and RFC 3339, in order.
///
/// `%d/%m/%Y` precedes `%m/%d/%Y`, so an ambiguous `03/04/2024` reads as 3 April.
const FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%d/%m/%Y", "%m/%d/%Y"];

/// Datetimes without an offset, as TOML local datetimes and YAML timestamps are written.
const LOCAL_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a date string in one of the accepted textual formats.
///
/// Accepts `2024-01-15`, RFC 3339 datetimes, local datetimes (`2024-01-15T10:30:00` or
/// `2024-01-15 10:30:00`), `January 15, 2024`, `Jan 15, 2024`, `15/01/2024` and
/// `01/15/2024`. Datetimes keep only their date part. Surrounding whitespace is ignored and runs of inner
/// whitespace count as one space.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let normalized = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(datetime.date_naive());
    }

    if let Some(datetime) = LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
    {
        return Some(datetime.date());
    }

    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&normalized, format).ok())
}
