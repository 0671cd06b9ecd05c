//! Timestamp parsing and calendar truncation.
//!
//! Every instant is normalized to a zoneless UTC frame: offset-bearing values
//! are converted to UTC and the offset dropped, zoneless values are kept as-is.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M",
];

/// Parse a dataset timestamp. Returns `None` for blank or unrecognized text.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]` with or without a numeric
/// offset or `Z`, `YYYY-MM-DDTHH:MM:SS[.f]`, and bare `YYYY-MM-DD` (midnight).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// First day of the month containing `date`.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Monday of the week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        assert_eq!(
            parse_timestamp("2006-02-01"),
            Some(ymd_hms(2006, 2, 1, 0, 0, 0))
        );
    }

    #[test]
    fn parses_space_separated_naive_datetime() {
        assert_eq!(
            parse_timestamp("2006-06-06 16:06:42"),
            Some(ymd_hms(2006, 6, 6, 16, 6, 42))
        );
    }

    #[test]
    fn parses_fractional_seconds() {
        let parsed = parse_timestamp("2010-03-04T05:06:07.250").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2010, 3, 4).unwrap());
    }

    #[test]
    fn converts_offset_to_utc() {
        assert_eq!(
            parse_timestamp("2006-06-06 16:06:42+00:00"),
            Some(ymd_hms(2006, 6, 6, 16, 6, 42))
        );
        assert_eq!(
            parse_timestamp("2006-06-06 01:00:00+02:00"),
            Some(ymd_hms(2006, 6, 5, 23, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2006-06-06T01:00:00-0500"),
            Some(ymd_hms(2006, 6, 6, 6, 0, 0))
        );
    }

    #[test]
    fn offset_can_move_instant_across_month_boundary() {
        let parsed = parse_timestamp("2006-02-01T00:30:00+01:00").unwrap();
        assert_eq!(parsed, ymd_hms(2006, 1, 31, 23, 30, 0));
    }

    #[test]
    fn parses_rfc3339_zulu() {
        assert_eq!(
            parse_timestamp("2011-12-31T23:59:59Z"),
            Some(ymd_hms(2011, 12, 31, 23, 59, 59))
        );
    }

    #[test]
    fn rejects_garbage_and_blank() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2006-13-01"), None);
        assert_eq!(parse_timestamp("2006-02-30 10:00:00"), None);
    }

    #[test]
    fn month_start_truncates_to_first() {
        let d = NaiveDate::from_ymd_opt(2008, 2, 29).unwrap();
        assert_eq!(month_start(d), NaiveDate::from_ymd_opt(2008, 2, 1).unwrap());
        assert_eq!(month_start(month_start(d)), month_start(d));
    }

    #[test]
    fn week_start_is_monday() {
        // 2006-01-15 is a Sunday.
        let sunday = NaiveDate::from_ymd_opt(2006, 1, 15).unwrap();
        assert_eq!(
            week_start(sunday),
            NaiveDate::from_ymd_opt(2006, 1, 9).unwrap()
        );
        let monday = NaiveDate::from_ymd_opt(2006, 1, 16).unwrap();
        assert_eq!(week_start(monday), monday);
    }
}
