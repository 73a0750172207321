/// ANSI color helper utilities for terminal output.
use crate::models::Status;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const CYAN: &str = "\x1b[36m";

/// On duty → green, off duty → red.
pub fn color_for_status(status: Status) -> &'static str {
    match status {
        Status::OnDuty => GREEN,
        Status::OffDuty => RED,
    }
}

pub fn paint_status(status: Status) -> String {
    format!("{}{status}{RESET}", color_for_status(status))
}

/// Grey out zero durations so worked time stands out in listings.
pub fn colorize_duration(value: &str) -> String {
    if value.trim() == "0h 00m" {
        format!("{GREY}{value}{RESET}")
    } else {
        format!("{CYAN}{value}{RESET}")
    }
}
