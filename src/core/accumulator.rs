//! Pairing of on/off duty events and summation of the time spent on duty
//! inside a window.
//!
//! Every query shape (one day, a range of days, two instants, the whole log)
//! goes through [`accumulate`]; only the [`Window`] changes.

use crate::models::{Event, Status};
use chrono::{Days, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Inclusive bounds of a duration query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// The whole log.
    All,
    /// Compared on the event's calendar date.
    Days { from: NaiveDate, to: NaiveDate },
    /// Compared on the exact instant.
    Instants {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },
}

impl Window {
    pub fn day(day: NaiveDate) -> Self {
        Window::Days { from: day, to: day }
    }

    pub fn days(from: NaiveDate, to: NaiveDate) -> Self {
        Window::Days { from, to }
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        match *self {
            Window::All => true,
            Window::Days { from, to } => (from..=to).contains(&t.date()),
            Window::Instants { from, to } => (from..=to).contains(&t),
        }
    }

    /// First instant after the window, `None` when unbounded.
    fn end(&self) -> Option<NaiveDateTime> {
        match *self {
            Window::All => None,
            Window::Days { to, .. } => to
                .checked_add_days(Days::new(1))
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
            Window::Instants { to, .. } => Some(to),
        }
    }

    /// Whether the window's upper bound reaches `now`.
    fn reaches(&self, now: NaiveDateTime) -> bool {
        match (*self, self.end()) {
            (_, None) => true,
            (Window::Days { .. }, Some(end)) => now < end,
            (_, Some(end)) => now <= end,
        }
    }
}

/// What to do with a shift that is still open when the scan ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenShiftPolicy {
    /// Never count an open shift.
    Ignore,
    /// Count it up to now, only when the window reaches now.
    #[default]
    UntilNow,
    /// Count it up to now or the end of the window, whichever comes first.
    Truncate,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DurationReport {
    pub total: TimeDelta,
    /// Closed shifts that contributed to `total`.
    pub shifts: usize,
    /// Start of the shift left open inside the window, if any.
    pub open_since: Option<NaiveDateTime>,
    /// Whether the open shift was added to `total`.
    pub open_counted: bool,
    /// Pairs whose stop was not after their start; counted as zero.
    pub clamped: usize,
    /// Starts replaced by a later start before any stop.
    pub overwritten_starts: usize,
}

impl DurationReport {
    fn add_span(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        let span = end - start;
        if span <= TimeDelta::zero() {
            warn!(%start, %end, "non-positive shift duration clamped to zero");
            self.clamped += 1;
            return false;
        }
        self.total += span;
        true
    }
}

/// Single pass over `events` in stored order.
pub fn accumulate(
    events: &[Event],
    window: &Window,
    now: NaiveDateTime,
    policy: OpenShiftPolicy,
) -> DurationReport {
    let mut report = DurationReport::default();
    let mut open_start: Option<NaiveDateTime> = None;

    for ev in events.iter().filter(|ev| window.contains(ev.timestamp)) {
        match (ev.status, open_start) {
            (Status::OnDuty, prev) => {
                if prev.is_some() {
                    report.overwritten_starts += 1;
                }
                open_start = Some(ev.timestamp);
            }
            (Status::OffDuty, Some(start)) => {
                if report.add_span(start, ev.timestamp) {
                    report.shifts += 1;
                }
                open_start = None;
            }
            (Status::OffDuty, None) => {}
        }
    }

    if let Some(start) = open_start {
        report.open_since = Some(start);
        let until = match policy {
            OpenShiftPolicy::Ignore => None,
            OpenShiftPolicy::UntilNow => window.reaches(now).then_some(now),
            OpenShiftPolicy::Truncate => Some(window.end().map_or(now, |end| end.min(now))),
        };
        if let Some(until) = until {
            report.open_counted = report.add_span(start, until);
        }
    }

    report
}

pub fn duration_for_day(
    events: &[Event],
    day: NaiveDate,
    now: NaiveDateTime,
    policy: OpenShiftPolicy,
) -> DurationReport {
    accumulate(events, &Window::day(day), now, policy)
}

pub fn duration_for_range(
    events: &[Event],
    from: NaiveDate,
    to: NaiveDate,
    now: NaiveDateTime,
    policy: OpenShiftPolicy,
) -> DurationReport {
    accumulate(events, &Window::days(from, to), now, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::parse_timestamp;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn on(s: &str) -> Event {
        Event::on_duty(ts(s))
    }

    fn off(s: &str) -> Event {
        Event::off_duty(ts(s))
    }

    const LATER: &str = "2030-01-01T00:00";

    #[test]
    fn single_shift_in_a_day() {
        let log = [on("2024-01-01T08:00"), off("2024-01-01T12:00")];
        let r = duration_for_day(&log, day("2024-01-01"), ts(LATER), OpenShiftPolicy::UntilNow);
        assert_eq!(r.total, TimeDelta::hours(4));
        assert_eq!(r.shifts, 1);
        assert_eq!(r.open_since, None);
    }

    #[test]
    fn open_shift_counts_until_now_on_the_current_day() {
        let log = [on("2024-01-01T08:00")];
        let r = duration_for_day(
            &log,
            day("2024-01-01"),
            ts("2024-01-01T09:30"),
            OpenShiftPolicy::UntilNow,
        );
        assert_eq!(r.total, TimeDelta::minutes(90));
        assert!(r.open_counted);
    }

    #[test]
    fn empty_log_is_zero() {
        let r = accumulate(&[], &Window::All, ts(LATER), OpenShiftPolicy::UntilNow);
        assert_eq!(r, DurationReport::default());
    }

    #[test]
    fn trailing_open_start_is_ignored_when_asked() {
        let log = [
            on("2024-01-01T08:00"),
            off("2024-01-01T16:00"),
            on("2024-01-02T09:00"),
            off("2024-01-02T17:00"),
            on("2024-01-03T08:00"),
        ];
        let r = duration_for_range(
            &log,
            day("2024-01-01"),
            day("2024-01-03"),
            ts("2024-01-03T10:00"),
            OpenShiftPolicy::Ignore,
        );
        assert_eq!(r.total, TimeDelta::hours(16));
        assert_eq!(r.shifts, 2);
        assert_eq!(r.open_since, Some(ts("2024-01-03T08:00")));
        assert!(!r.open_counted);
    }

    #[test]
    fn unbounded_window_sums_every_matched_pair() {
        let log = [
            on("2024-03-01T08:00"),
            off("2024-03-01T08:45"),
            on("2024-03-04T22:00"),
            off("2024-03-05T01:30"),
            on("2024-03-06T10:00"),
            off("2024-03-06T10:01"),
        ];
        let r = accumulate(&log, &Window::All, ts(LATER), OpenShiftPolicy::UntilNow);
        assert_eq!(
            r.total,
            TimeDelta::minutes(45) + TimeDelta::minutes(210) + TimeDelta::minutes(1)
        );
    }

    #[test]
    fn stop_outside_window_does_not_close_shift() {
        let log = [on("2024-01-01T22:00"), off("2024-01-02T06:00")];
        let r = duration_for_day(&log, day("2024-01-01"), ts(LATER), OpenShiftPolicy::UntilNow);
        assert_eq!(r.total, TimeDelta::zero());
        assert_eq!(r.open_since, Some(ts("2024-01-01T22:00")));
        assert!(!r.open_counted);
    }

    #[test]
    fn truncate_policy_cuts_a_past_open_shift_at_window_end() {
        let log = [on("2024-01-01T22:00"), off("2024-01-02T06:00")];
        let r = duration_for_day(&log, day("2024-01-01"), ts(LATER), OpenShiftPolicy::Truncate);
        assert_eq!(r.total, TimeDelta::hours(2));
        assert!(r.open_counted);
    }

    #[test]
    fn latest_of_repeated_starts_wins() {
        let log = [
            on("2024-01-01T08:00"),
            on("2024-01-01T10:00"),
            off("2024-01-01T11:00"),
        ];
        let r = accumulate(&log, &Window::All, ts(LATER), OpenShiftPolicy::UntilNow);
        assert_eq!(r.total, TimeDelta::hours(1));
        assert_eq!(r.overwritten_starts, 1);
    }

    #[test]
    fn unmatched_stop_is_ignored() {
        let log = [
            off("2024-01-01T07:00"),
            on("2024-01-01T08:00"),
            off("2024-01-01T09:00"),
            off("2024-01-01T10:00"),
        ];
        let r = accumulate(&log, &Window::All, ts(LATER), OpenShiftPolicy::UntilNow);
        assert_eq!(r.total, TimeDelta::hours(1));
        assert_eq!(r.shifts, 1);
    }

    #[test]
    fn stop_before_start_is_clamped_not_subtracted() {
        let log = [
            on("2024-01-01T08:00"),
            off("2024-01-01T10:00"),
            on("2024-01-01T15:00"),
            off("2024-01-01T14:00"),
        ];
        let r = accumulate(&log, &Window::All, ts(LATER), OpenShiftPolicy::UntilNow);
        assert_eq!(r.total, TimeDelta::hours(2));
        assert_eq!(r.clamped, 1);
        assert_eq!(r.shifts, 1);
    }

    #[test]
    fn open_shift_started_after_now_is_clamped() {
        let log = [on("2024-01-01T12:00")];
        let r = duration_for_day(
            &log,
            day("2024-01-01"),
            ts("2024-01-01T11:00"),
            OpenShiftPolicy::UntilNow,
        );
        assert_eq!(r.total, TimeDelta::zero());
        assert_eq!(r.clamped, 1);
    }

    #[test]
    fn instant_window_compares_exact_times() {
        let log = [
            on("2024-01-01T08:00"),
            off("2024-01-01T12:00"),
            on("2024-01-01T13:00"),
            off("2024-01-01T17:00"),
        ];
        let w = Window::Instants {
            from: ts("2024-01-01T07:00"),
            to: ts("2024-01-01T12:00"),
        };
        let r = accumulate(&log, &w, ts(LATER), OpenShiftPolicy::UntilNow);
        assert_eq!(r.total, TimeDelta::hours(4));
    }

    #[test]
    fn nested_windows_never_exceed_outer() {
        let log = [
            on("2024-01-01T08:00"),
            off("2024-01-01T16:00"),
            on("2024-01-02T09:00"),
            off("2024-01-02T17:00"),
            on("2024-01-03T08:00"),
            off("2024-01-03T12:00"),
            on("2024-01-04T08:00"),
        ];
        let now = ts("2024-01-04T09:00");
        let policies = [
            OpenShiftPolicy::Ignore,
            OpenShiftPolicy::UntilNow,
            OpenShiftPolicy::Truncate,
        ];
        let bounds = [
            ("2024-01-01", "2024-01-04"),
            ("2024-01-01", "2024-01-03"),
            ("2024-01-02", "2024-01-03"),
            ("2024-01-02", "2024-01-02"),
        ];
        for policy in policies {
            let totals: Vec<TimeDelta> = bounds
                .iter()
                .map(|(f, t)| duration_for_range(&log, day(f), day(t), now, policy).total)
                .collect();
            assert!(totals.windows(2).all(|w| w[0] >= w[1]), "{policy:?}: {totals:?}");
        }
    }

    #[test]
    fn truncate_with_repeated_starts_is_not_monotonic() {
        // The later start replaces the earlier one once both are in the window.
        let log = [
            on("2024-01-01T08:00"),
            on("2024-01-03T08:00"),
            off("2024-01-03T09:00"),
        ];
        let now = ts(LATER);
        let policy = OpenShiftPolicy::Truncate;

        let inner = duration_for_range(&log, day("2024-01-01"), day("2024-01-01"), now, policy);
        let outer = duration_for_range(&log, day("2024-01-01"), day("2024-01-03"), now, policy);

        assert_eq!(inner.total, TimeDelta::hours(16));
        assert_eq!(outer.total, TimeDelta::hours(1));
        assert_eq!(outer.overwritten_starts, 1);
    }
}
