//! Shift state machine over an [`EventStore`].
//!
//! Status is never stored: it is the status of the last event of the log,
//! or off duty when the log is empty.

use crate::core::accumulator::{DurationReport, OpenShiftPolicy, Window, accumulate};
use crate::errors::{AppError, AppResult};
use crate::models::{Event, Status, Subject};
use crate::store::EventStore;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct ShiftLedger<S: EventStore> {
    store: S,
    locks: Mutex<HashMap<Subject, Arc<Mutex<()>>>>,
}

pub fn status_of(events: &[Event]) -> Status {
    events.last().map(|ev| ev.status).unwrap_or_default()
}

impl<S: EventStore> ShiftLedger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn events(&self, subject: &Subject) -> AppResult<Vec<Event>> {
        self.store.read_all(subject)
    }

    pub fn current_status(&self, subject: &Subject) -> AppResult<Status> {
        Ok(status_of(&self.events(subject)?))
    }

    pub fn clock_in(&self, subject: &Subject, now: NaiveDateTime) -> AppResult<Status> {
        self.transition(subject, now, Status::OnDuty)
    }

    pub fn clock_out(&self, subject: &Subject, now: NaiveDateTime) -> AppResult<Status> {
        self.transition(subject, now, Status::OffDuty)
    }

    /// Clock in when off duty, clock out when on duty.
    pub fn toggle(&self, subject: &Subject, now: NaiveDateTime) -> AppResult<Status> {
        let lock = self.subject_lock(subject)?;
        let _guard = lock.lock().map_err(|_| poisoned(subject))?;

        let event = self.store.append_with(subject, &mut |events| {
            Ok(Event::new(now, status_of(events).flipped()))
        })?;
        debug!(subject = %subject, status = %event.status, "transition recorded");
        Ok(event.status)
    }

    pub fn duration(
        &self,
        subject: &Subject,
        window: &Window,
        now: NaiveDateTime,
        policy: OpenShiftPolicy,
    ) -> AppResult<DurationReport> {
        Ok(accumulate(&self.events(subject)?, window, now, policy))
    }

    /// The status check and the append form one store operation, so two
    /// racing requests cannot both record the same transition, whether they
    /// share this ledger or not. The subject lock keeps callers of this
    /// ledger from contending inside the store.
    fn transition(
        &self,
        subject: &Subject,
        now: NaiveDateTime,
        target: Status,
    ) -> AppResult<Status> {
        let lock = self.subject_lock(subject)?;
        let _guard = lock.lock().map_err(|_| poisoned(subject))?;

        self.store.append_with(subject, &mut |events| {
            match (target, status_of(events)) {
                (Status::OnDuty, Status::OnDuty) => {
                    Err(AppError::AlreadyOnDuty(subject.to_string()))
                }
                (Status::OffDuty, Status::OffDuty) => {
                    Err(AppError::NotOnDuty(subject.to_string()))
                }
                _ => Ok(Event::new(now, target)),
            }
        })?;
        debug!(subject = %subject, status = %target, "transition recorded");
        Ok(target)
    }

    fn subject_lock(&self, subject: &Subject) -> AppResult<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| AppError::StoreUnavailable("subject lock table poisoned".into()))?;
        Ok(locks.entry(subject.clone()).or_default().clone())
    }
}

fn poisoned(subject: &Subject) -> AppError {
    AppError::StoreUnavailable(format!("lock for {subject} poisoned"))
}
