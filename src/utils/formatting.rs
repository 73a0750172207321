//! Formatting utilities used for CLI and export outputs.

use chrono::TimeDelta;

/// Whole minutes of a duration, rounded to the nearest minute.
pub fn round_minutes(d: TimeDelta) -> i64 {
    (d.num_seconds() + 30).div_euclid(60)
}

pub fn mins2readable(mins: i64, short: bool) -> String {
    let sign = if mins < 0 { "-" } else { "" };
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;

    if short {
        // 02:25
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        // 2h 25m
        format!("{}{}h {:02}m", sign, hours, minutes)
    }
}

/// Human form of a worked duration, e.g. `4h 00m`.
pub fn format_duration(d: TimeDelta) -> String {
    mins2readable(round_minutes(d), false)
}
