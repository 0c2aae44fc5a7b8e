// ABOUTME: Date normalization for the loosely formatted dates found on blog pages.
// ABOUTME: Tries a fixed, ordered list of formats and returns the first successful parse as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Full timestamp formats, tried in order. Zone-less values are taken as UTC.
const DATETIME_FORMATS: &[&str] = &[
    // "2021-03-03T10:15:30.123Z"
    "%Y-%m-%dT%H:%M:%S%.fZ",
    // "2021-03-03T10:15:30Z"
    "%Y-%m-%dT%H:%M:%SZ",
    // "2021-03-03T10:15:30"
    "%Y-%m-%dT%H:%M:%S",
];

/// Date-only formats, tried in order after the timestamp formats.
///
/// Slash dates are ambiguous; the US reading is tried before the EU one, so
/// "03/04/2021" is March 4th.
const DATE_FORMATS: &[&str] = &[
    // "2021-03-03"
    "%Y-%m-%d",
    // "March 3, 2021"
    "%B %d, %Y",
    // "Mar 3, 2021"
    "%b %d, %Y",
    // "03/04/2021" (month first)
    "%m/%d/%Y",
    // "25/04/2021" (day first)
    "%d/%m/%Y",
];

/// Parses a raw date string into a UTC instant.
///
/// Returns `None` when the input is empty or no format matches. A miss means
/// "unknown date", not a failure.
pub fn normalize_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            let naive = date.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    None
}
