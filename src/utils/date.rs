//! Date helpers: day-count windows and the period expressions accepted by
//! `range` and `export --range`.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Days, NaiveDate};

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// `[today - days, today]`, with `days` given as raw user text.
pub fn last_days(today: NaiveDate, days: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let n: u64 = days
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidDayCount(days.to_string()))?;
    let from = today
        .checked_sub_days(Days::new(n))
        .ok_or_else(|| AppError::InvalidDayCount(days.to_string()))?;
    Ok((from, today))
}

/// Parse a period expression into inclusive date bounds.
///
/// Accepted:
/// - `YYYY`, `YYYY-MM`, `YYYY-MM-DD`
/// - `YYYY:YYYY`, `YYYY-MM:YYYY-MM`, `YYYY-MM-DD:YYYY-MM-DD`
pub fn parse_period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::InvalidDate(p.to_string());

    let (start_raw, end_raw) = match p.split_once(':') {
        Some((s, e)) => (s.trim(), e.trim()),
        None => (p.trim(), p.trim()),
    };

    if start_raw.len() != end_raw.len() {
        return Err(invalid());
    }

    let (from, _) = period_bounds(start_raw).ok_or_else(invalid)?;
    let (_, to) = period_bounds(end_raw).ok_or_else(invalid)?;

    if from > to {
        return Err(AppError::InvalidDate(format!(
            "{p} (start is after end)"
        )));
    }
    Ok((from, to))
}

fn period_bounds(s: &str) -> Option<(NaiveDate, NaiveDate)> {
    match s.len() {
        // YYYY
        4 => {
            let y: i32 = s.parse().ok()?;
            Some((
                NaiveDate::from_ymd_opt(y, 1, 1)?,
                NaiveDate::from_ymd_opt(y, 12, 31)?,
            ))
        }
        // YYYY-MM
        7 => {
            let first = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok()?;
            Some((first, month_last_day(first)?))
        }
        // YYYY-MM-DD
        10 => {
            let d = parse_date(s)?;
            Some((d, d))
        }
        _ => None,
    }
}

fn month_last_day(first: NaiveDate) -> Option<NaiveDate> {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)?
    };
    next.pred_opt()
}
