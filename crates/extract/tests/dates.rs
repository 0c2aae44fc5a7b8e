// ABOUTME: Round-trip tests for the date normalizer.
// ABOUTME: Formats known instants in each supported layout and parses them back.

use blogport_extract::normalize_date;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;

fn sample_instants() -> Vec<DateTime<Utc>> {
    let start = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap();
    (0..40)
        .map(|i| start + Duration::days(i * 97) + Duration::seconds(i * 3_607))
        .collect()
}

#[test]
fn full_timestamps_round_trip() {
    for t in sample_instants() {
        let utc_z = t.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        assert_eq!(normalize_date(&utc_z), Some(t), "{utc_z}");

        let naive = t.format("%Y-%m-%dT%H:%M:%S").to_string();
        assert_eq!(normalize_date(&naive), Some(t), "{naive}");
    }
}

#[test]
fn fractional_timestamps_round_trip() {
    for (i, t) in sample_instants().into_iter().enumerate() {
        let t = t + Duration::milliseconds(i as i64 * 13);
        let s = t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
        assert_eq!(normalize_date(&s), Some(t), "{s}");
    }
}

#[test]
fn calendar_dates_round_trip_to_midnight() {
    for t in sample_instants() {
        let midnight = Utc
            .from_utc_datetime(&t.date_naive().and_hms_opt(0, 0, 0).unwrap());
        for fmt in ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%m/%d/%Y"] {
            let s = t.format(fmt).to_string();
            assert_eq!(normalize_date(&s), Some(midnight), "{s}");
        }
    }
}

#[test]
fn day_first_dates_parse_when_unambiguous() {
    let expected = Utc.with_ymd_and_hms(2021, 4, 25, 0, 0, 0).unwrap();
    assert_eq!(normalize_date("25/04/2021"), Some(expected));
}

#[test]
fn ambiguous_slash_dates_read_month_first() {
    let expected = Utc.with_ymd_and_hms(2021, 3, 4, 0, 0, 0).unwrap();
    assert_eq!(normalize_date("03/04/2021"), Some(expected));
}

#[test]
fn long_month_name_without_padding() {
    let expected = Utc.with_ymd_and_hms(2021, 3, 3, 0, 0, 0).unwrap();
    assert_eq!(normalize_date("March 3, 2021"), Some(expected));
}
