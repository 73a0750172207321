use crate::core::desk::Reply;
use std::fmt;

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";
const ICON_CLOCK: &str = "⏱️";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{FG_BLUE}{BOLD}{ICON_INFO}{RESET} {msg}");
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{FG_GREEN}{BOLD}{ICON_OK}{RESET} {msg}");
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{FG_YELLOW}{BOLD}{ICON_WARN}{RESET} {msg}");
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{FG_RED}{BOLD}{ICON_ERR}{RESET} {msg}");
}

/// Show a façade reply: changes as success, answers as info, refusals as
/// warnings and failures on stderr.
pub fn reply(r: &Reply) {
    match r {
        Reply::Clocked(_) => success(r),
        Reply::Prompted(_) => println!("{FG_BLUE}{BOLD}{ICON_CLOCK}{RESET} {r}"),
        Reply::Rejected(_) | Reply::Stale => warning(r),
        Reply::Failure => error(r),
        Reply::Status { .. } | Reply::Duration { .. } | Reply::History { .. } => info(r),
    }
}
