//! Pending interaction tokens.
//!
//! A prompt is the "start / end service" message shown to a member. The
//! token remembers who may act on it and where it was issued, until it is
//! consumed, superseded by a newer prompt for the same member, pushed out by
//! capacity, or expired.

use crate::errors::{AppError, AppResult};
use crate::models::Subject;
use chrono::{NaiveDateTime, TimeDelta};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PromptId(pub u64);

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a prompt was issued, so a follow-up can be routed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub channel: String,
    pub author: String,
}

impl Origin {
    pub fn new(channel: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            author: author.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPrompt {
    pub id: PromptId,
    pub subject: Subject,
    pub origin: Origin,
    pub issued_at: NaiveDateTime,
}

#[derive(Debug, Default)]
struct Pending {
    next_id: u64,
    // oldest first
    entries: VecDeque<PendingPrompt>,
}

impl Pending {
    fn evict_expired(&mut self, now: NaiveDateTime, ttl: TimeDelta) {
        while let Some(front) = self.entries.front() {
            if now - front.issued_at < ttl {
                break;
            }
            debug!(prompt = %front.id, subject = %front.subject, "prompt expired");
            self.entries.pop_front();
        }
    }

    fn position(&self, id: PromptId) -> Option<usize> {
        self.entries.iter().position(|p| p.id == id)
    }
}

/// Bounded, time-evicting token store.
#[derive(Debug)]
pub struct PromptStore {
    pending: Mutex<Pending>,
    ttl: TimeDelta,
    capacity: usize,
}

impl PromptStore {
    pub fn new(ttl: TimeDelta, capacity: usize) -> Self {
        Self {
            pending: Mutex::new(Pending::default()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Pending>> {
        self.pending
            .lock()
            .map_err(|_| AppError::Other("prompt store lock poisoned".into()))
    }

    /// Register a new prompt for `subject`. Any earlier prompt for the same
    /// subject is discarded.
    pub fn issue(
        &self,
        subject: &Subject,
        origin: Origin,
        now: NaiveDateTime,
    ) -> AppResult<PromptId> {
        let mut pending = self.lock()?;
        pending.evict_expired(now, self.ttl);

        pending.entries.retain(|p| {
            let keep = &p.subject != subject;
            if !keep {
                debug!(prompt = %p.id, subject = %p.subject, "prompt superseded");
            }
            keep
        });

        while pending.entries.len() >= self.capacity {
            if let Some(old) = pending.entries.pop_front() {
                debug!(prompt = %old.id, subject = %old.subject, "prompt evicted at capacity");
            }
        }

        pending.next_id += 1;
        let id = PromptId(pending.next_id);
        pending.entries.push_back(PendingPrompt {
            id,
            subject: subject.clone(),
            origin,
            issued_at: now,
        });
        Ok(id)
    }

    /// Consume the prompt on behalf of `actor`.
    ///
    /// Unknown or expired prompts are stale. A prompt owned by someone else
    /// is refused and stays pending.
    pub fn claim(
        &self,
        id: PromptId,
        actor: &Subject,
        now: NaiveDateTime,
    ) -> AppResult<PendingPrompt> {
        let mut pending = self.lock()?;
        pending.evict_expired(now, self.ttl);

        let idx = pending
            .position(id)
            .ok_or(AppError::StaleInteraction(id.0))?;

        if &pending.entries[idx].subject != actor {
            return Err(AppError::InvalidRequest(format!(
                "Only {} can act on prompt #{id}.",
                pending.entries[idx].subject
            )));
        }

        pending
            .entries
            .remove(idx)
            .ok_or(AppError::StaleInteraction(id.0))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|p| p.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::parse_timestamp;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn who(name: &str) -> Subject {
        Subject::sanitize(name).unwrap()
    }

    fn origin() -> Origin {
        Origin::new("general", "moderator")
    }

    #[test]
    fn a_prompt_is_consumed_once() {
        let store = PromptStore::new(TimeDelta::minutes(15), 8);
        let id = store.issue(&who("Alice"), origin(), ts("2024-01-01T08:00")).unwrap();

        let p = store.claim(id, &who("Alice"), ts("2024-01-01T08:01")).unwrap();
        assert_eq!(p.subject, who("Alice"));
        assert_eq!(p.origin, origin());

        let err = store.claim(id, &who("Alice"), ts("2024-01-01T08:02")).unwrap_err();
        assert!(err.is_stale());
    }

    #[test]
    fn foreign_actor_is_refused_and_prompt_survives() {
        let store = PromptStore::new(TimeDelta::minutes(15), 8);
        let id = store.issue(&who("Alice"), origin(), ts("2024-01-01T08:00")).unwrap();

        let err = store.claim(id, &who("Bob"), ts("2024-01-01T08:01")).unwrap_err();
        assert!(err.is_rejection());
        assert!(store.claim(id, &who("Alice"), ts("2024-01-01T08:01")).is_ok());
    }

    #[test]
    fn newer_prompt_supersedes_older_one() {
        let store = PromptStore::new(TimeDelta::minutes(15), 8);
        let first = store.issue(&who("Alice"), origin(), ts("2024-01-01T08:00")).unwrap();
        let second = store.issue(&who("Alice"), origin(), ts("2024-01-01T08:01")).unwrap();

        assert_ne!(first, second);
        assert_eq!(store.len(), 1);
        assert!(store.claim(first, &who("Alice"), ts("2024-01-01T08:02")).unwrap_err().is_stale());
        assert!(store.claim(second, &who("Alice"), ts("2024-01-01T08:02")).is_ok());
    }

    #[test]
    fn prompts_expire_after_ttl() {
        let store = PromptStore::new(TimeDelta::minutes(15), 8);
        let id = store.issue(&who("Alice"), origin(), ts("2024-01-01T08:00")).unwrap();
        let err = store.claim(id, &who("Alice"), ts("2024-01-01T08:15")).unwrap_err();
        assert!(err.is_stale());
        assert!(store.is_empty());
    }

    #[test]
    fn oldest_prompt_is_evicted_at_capacity() {
        let store = PromptStore::new(TimeDelta::minutes(15), 2);
        let t = ts("2024-01-01T08:00");
        let a = store.issue(&who("A"), origin(), t).unwrap();
        let b = store.issue(&who("B"), origin(), t).unwrap();
        let c = store.issue(&who("C"), origin(), t).unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.claim(a, &who("A"), t).unwrap_err().is_stale());
        assert!(store.claim(b, &who("B"), t).is_ok());
        assert!(store.claim(c, &who("C"), t).is_ok());
    }
}
