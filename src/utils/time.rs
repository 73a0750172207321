//! Time utilities: parsing stored timestamps in every form the ledger has
//! seen, and the canonical form new rows are written in.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local, NaiveDateTime};

/// Canonical on-disk form (ISO-8601 without offset, local wall clock).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const NAIVE_FORMATS: [&str; 10] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    // en-US locale, e.g. "1/15/2024, 8:00:00 AM"
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y %I:%M:%S %p",
    // fr-FR locale, e.g. "15/01/2024 08:00:00"
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y, %H:%M:%S",
];

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a user-supplied instant (`--at`), reporting what was wrong.
pub fn parse_instant_arg(s: &str) -> AppResult<NaiveDateTime> {
    parse_timestamp(s).ok_or_else(|| AppError::InvalidTimestamp(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn accepts_iso_forms() {
        assert_eq!(
            parse_timestamp("2024-01-01T08:00"),
            Some(at(2024, 1, 1, 8, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-01 12:30:15"),
            Some(at(2024, 1, 1, 12, 30, 15))
        );
    }

    #[test]
    fn accepts_locale_forms() {
        assert_eq!(
            parse_timestamp("1/15/2024, 8:05:00 PM"),
            Some(at(2024, 1, 15, 20, 5, 0))
        );
        assert_eq!(
            parse_timestamp("15/01/2024 08:05:00"),
            Some(at(2024, 1, 15, 8, 5, 0))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2024-13-40T99:00"), None);
    }

    #[test]
    fn canonical_form_parses_back() {
        let ts = at(2024, 2, 29, 23, 59, 59);
        assert_eq!(parse_timestamp(&format_timestamp(&ts)), Some(ts));
    }
}
