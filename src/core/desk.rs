//! Command façade: turns a request from the presentation layer into a plain
//! reply value. Nothing here knows how a request arrived or how the reply is
//! shown.

use crate::core::accumulator::{DurationReport, OpenShiftPolicy, Window};
use crate::core::clock::Clock;
use crate::core::ledger::ShiftLedger;
use crate::core::prompts::{Origin, PromptId, PromptStore};
use crate::errors::{AppError, AppResult};
use crate::models::{Event, Status, Subject};
use crate::store::EventStore;
use crate::utils::date::last_days;
use crate::utils::formatting::format_duration;
use crate::utils::time::format_timestamp;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Clone)]
pub struct DeskSettings {
    pub open_shift: OpenShiftPolicy,
    pub prompt_ttl: TimeDelta,
    pub max_pending_prompts: usize,
    /// Most recent entries shown by a history query; 0 shows everything.
    pub history_limit: usize,
}

impl Default for DeskSettings {
    fn default() -> Self {
        Self {
            open_shift: OpenShiftPolicy::default(),
            prompt_ttl: TimeDelta::minutes(15),
            max_pending_prompts: 64,
            history_limit: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    Start,
    End,
}

/// A subject's log in chronological order, or nothing to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum History {
    Empty,
    Entries(Vec<Event>),
}

impl History {
    fn from_events(mut events: Vec<Event>, limit: usize) -> Self {
        if events.is_empty() {
            return History::Empty;
        }
        // stable: rows sharing a timestamp keep their stored order
        events.sort_by_key(|ev| ev.timestamp);
        if limit > 0 && events.len() > limit {
            events = events.split_off(events.len() - limit);
        }
        History::Entries(events)
    }

    /// One `timestamp — status` line per event.
    pub fn lines(&self) -> Vec<String> {
        match self {
            History::Empty => Vec::new(),
            History::Entries(events) => events
                .iter()
                .map(|ev| format!("{} — {}", format_timestamp(&ev.timestamp), ev.status))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Today,
    LastDays(i64),
    Between(NaiveDate, NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompted {
    pub prompt: PromptId,
    pub subject: Subject,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clocked {
    pub subject: Subject,
    pub status: Status,
    pub at: NaiveDateTime,
    /// Set when the change came from a prompt.
    pub origin: Option<Origin>,
}

/// Everything the presentation layer can ask for. Subjects are given as
/// display names and resolved here.
#[derive(Debug, Clone)]
pub enum Request {
    Prompt {
        subject: String,
        origin: Origin,
    },
    PromptAction {
        prompt: PromptId,
        actor: String,
        action: PromptAction,
    },
    ClockToggle {
        subject: String,
    },
    ClockIn {
        subject: String,
    },
    ClockOut {
        subject: String,
    },
    Status {
        subject: String,
    },
    DurationToday {
        subject: String,
    },
    DurationRange {
        subject: String,
        days: String,
    },
    DurationBetween {
        subject: String,
        from: NaiveDate,
        to: NaiveDate,
    },
    History {
        subject: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Prompted(Prompted),
    Clocked(Clocked),
    Status {
        subject: Subject,
        status: Status,
    },
    Duration {
        subject: Subject,
        scope: Scope,
        report: DurationReport,
    },
    History {
        subject: Subject,
        history: History,
    },
    /// The request was refused; nothing changed.
    Rejected(String),
    /// The prompt acted on no longer exists.
    Stale,
    /// The ledger could not be reached; details went to the diagnostics.
    Failure,
}

impl Reply {
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Rejected(_) | Reply::Stale | Reply::Failure)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Prompted(p) => write!(
                f,
                "Prompt #{} for {} (currently {}): start or end the service.",
                p.prompt, p.subject, p.status
            ),
            Reply::Clocked(c) => {
                let verb = match c.status {
                    Status::OnDuty => "started",
                    Status::OffDuty => "ended",
                };
                write!(
                    f,
                    "{} {verb} their service at {}.",
                    c.subject,
                    format_timestamp(&c.at)
                )
            }
            Reply::Status { subject, status } => write!(f, "{subject} is {status}."),
            Reply::Duration {
                subject,
                scope,
                report,
            } => {
                let total = format_duration(report.total);
                match scope {
                    Scope::Today => write!(f, "{subject} worked a total of {total} today.")?,
                    Scope::LastDays(n) => write!(
                        f,
                        "{subject} worked a total of {total} over the last {n} day(s)."
                    )?,
                    Scope::Between(from, to) => write!(
                        f,
                        "{subject} worked a total of {total} between {from} and {to}."
                    )?,
                }
                if let (Some(since), false) = (report.open_since, report.open_counted) {
                    write!(
                        f,
                        " The shift open since {} is not counted.",
                        format_timestamp(&since)
                    )?;
                }
                Ok(())
            }
            Reply::History { subject, history } => match history {
                History::Empty => write!(f, "No service history for {subject}."),
                History::Entries(_) => {
                    writeln!(f, "Service history of {subject}:")?;
                    write!(f, "{}", history.lines().join("\n"))
                }
            },
            Reply::Rejected(msg) => f.write_str(msg),
            Reply::Stale => f.write_str("This action is no longer valid."),
            Reply::Failure => {
                f.write_str("The service ledger is unavailable right now, please try again later.")
            }
        }
    }
}

pub struct ServiceDesk<S: EventStore> {
    ledger: ShiftLedger<S>,
    prompts: PromptStore,
    clock: Arc<dyn Clock>,
    settings: DeskSettings,
}

impl<S: EventStore> ServiceDesk<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>, settings: DeskSettings) -> Self {
        Self {
            ledger: ShiftLedger::new(store),
            prompts: PromptStore::new(settings.prompt_ttl, settings.max_pending_prompts),
            clock,
            settings,
        }
    }

    pub fn ledger(&self) -> &ShiftLedger<S> {
        &self.ledger
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Answer a request, folding every error into a reply.
    pub fn dispatch(&self, request: Request) -> Reply {
        match self.serve(request) {
            Ok(reply) => reply,
            Err(e) if e.is_rejection() => Reply::Rejected(e.to_string()),
            Err(e) if e.is_stale() => {
                debug!("stale interaction: {e}");
                Reply::Stale
            }
            Err(e) => {
                error!("request failed: {e}");
                Reply::Failure
            }
        }
    }

    fn serve(&self, request: Request) -> AppResult<Reply> {
        Ok(match request {
            Request::Prompt { subject, origin } => {
                Reply::Prompted(self.issue_prompt(&resolve(&subject)?, origin)?)
            }
            Request::PromptAction {
                prompt,
                actor,
                action,
            } => Reply::Clocked(self.handle_prompt_action(prompt, &resolve(&actor)?, action)?),
            Request::ClockToggle { subject } => {
                Reply::Clocked(self.handle_clock_toggle(&resolve(&subject)?)?)
            }
            Request::ClockIn { subject } => Reply::Clocked(self.clock_in(&resolve(&subject)?)?),
            Request::ClockOut { subject } => Reply::Clocked(self.clock_out(&resolve(&subject)?)?),
            Request::Status { subject } => {
                let subject = resolve(&subject)?;
                let status = self.query_status(&subject)?;
                Reply::Status { subject, status }
            }
            Request::DurationToday { subject } => {
                let subject = resolve(&subject)?;
                let report = self.query_duration_today(&subject)?;
                Reply::Duration {
                    subject,
                    scope: Scope::Today,
                    report,
                }
            }
            Request::DurationRange { subject, days } => {
                let subject = resolve(&subject)?;
                let (scope, report) = self.query_duration_range(&subject, &days)?;
                Reply::Duration {
                    subject,
                    scope,
                    report,
                }
            }
            Request::DurationBetween { subject, from, to } => {
                let subject = resolve(&subject)?;
                let report = self.query_duration_between(&subject, from, to)?;
                Reply::Duration {
                    subject,
                    scope: Scope::Between(from, to),
                    report,
                }
            }
            Request::History { subject } => {
                let subject = resolve(&subject)?;
                let history = self.query_history(&subject)?;
                Reply::History { subject, history }
            }
        })
    }

    pub fn handle_clock_toggle(&self, subject: &Subject) -> AppResult<Clocked> {
        let at = self.now();
        let status = self.ledger.toggle(subject, at)?;
        Ok(self.clocked(subject, status, at, None))
    }

    pub fn clock_in(&self, subject: &Subject) -> AppResult<Clocked> {
        let at = self.now();
        let status = self.ledger.clock_in(subject, at)?;
        Ok(self.clocked(subject, status, at, None))
    }

    pub fn clock_out(&self, subject: &Subject) -> AppResult<Clocked> {
        let at = self.now();
        let status = self.ledger.clock_out(subject, at)?;
        Ok(self.clocked(subject, status, at, None))
    }

    pub fn query_status(&self, subject: &Subject) -> AppResult<Status> {
        self.ledger.current_status(subject)
    }

    pub fn query_duration_today(&self, subject: &Subject) -> AppResult<DurationReport> {
        let now = self.now();
        self.ledger
            .duration(subject, &Window::day(now.date()), now, self.settings.open_shift)
    }

    /// Time worked over `[today - days, today]`. `days` is the raw text the
    /// member typed; the returned scope carries the parsed count.
    pub fn query_duration_range(
        &self,
        subject: &Subject,
        days: &str,
    ) -> AppResult<(Scope, DurationReport)> {
        let (from, to) = last_days(self.now().date(), days)?;
        let report = self.query_duration_between(subject, from, to)?;
        Ok((Scope::LastDays((to - from).num_days()), report))
    }

    pub fn query_duration_between(
        &self,
        subject: &Subject,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<DurationReport> {
        if from > to {
            return Err(AppError::InvalidDate(format!("{from} is after {to}")));
        }
        self.ledger.duration(
            subject,
            &Window::days(from, to),
            self.now(),
            self.settings.open_shift,
        )
    }

    pub fn query_history(&self, subject: &Subject) -> AppResult<History> {
        Ok(History::from_events(
            self.ledger.events(subject)?,
            self.settings.history_limit,
        ))
    }

    /// Open a prompt for `subject`. The returned status tells the caller
    /// which of start/end makes sense.
    pub fn issue_prompt(&self, subject: &Subject, origin: Origin) -> AppResult<Prompted> {
        let status = self.ledger.current_status(subject)?;
        let prompt = self.prompts.issue(subject, origin, self.now())?;
        Ok(Prompted {
            prompt,
            subject: subject.clone(),
            status,
        })
    }

    /// Act on a prompt. The prompt is consumed before the clock action runs,
    /// so it fires at most once even if the action is then refused.
    pub fn handle_prompt_action(
        &self,
        prompt: PromptId,
        actor: &Subject,
        action: PromptAction,
    ) -> AppResult<Clocked> {
        let at = self.now();
        let pending = self.prompts.claim(prompt, actor, at)?;
        let status = match action {
            PromptAction::Start => self.ledger.clock_in(&pending.subject, at)?,
            PromptAction::End => self.ledger.clock_out(&pending.subject, at)?,
        };
        Ok(self.clocked(&pending.subject, status, at, Some(pending.origin)))
    }

    pub fn pending_prompts(&self) -> usize {
        self.prompts.len()
    }

    fn clocked(
        &self,
        subject: &Subject,
        status: Status,
        at: NaiveDateTime,
        origin: Option<Origin>,
    ) -> Clocked {
        self.ledger.store().audit(
            "service",
            subject.as_str(),
            &format!("{status} at {}", format_timestamp(&at)),
        );
        Clocked {
            subject: subject.clone(),
            status,
            at,
            origin,
        }
    }
}

fn resolve(display_name: &str) -> AppResult<Subject> {
    Subject::sanitize(display_name)
}
