//! Persistence-agnostic event log storage.
//!
//! A store only knows how to append a row to a subject's log and how to hand
//! back every row of that log in insertion order. Parsing, pairing and status
//! derivation live above it, in `core`.

mod memory;

pub use memory::MemoryStore;

use crate::errors::AppResult;
use crate::models::{Event, RawRow, Subject};
use tracing::warn;

pub trait EventStore: Send + Sync {
    /// Append one event at the end of `subject`'s log, creating the log if it
    /// does not exist yet. The row is durable once this returns `Ok`.
    fn append(&self, subject: &Subject, event: &Event) -> AppResult<()>;

    /// Every stored row of `subject`, in insertion order, unparsed.
    /// An unknown subject yields an empty list.
    fn read_rows(&self, subject: &Subject) -> AppResult<Vec<RawRow>>;

    /// Known subjects, in the order they were created.
    fn subjects(&self) -> AppResult<Vec<Subject>>;

    /// Every parseable event of `subject`, in insertion order.
    ///
    /// Rows with a missing or unparseable field are skipped with a warning;
    /// they never make the rest of the log unreadable.
    fn read_all(&self, subject: &Subject) -> AppResult<Vec<Event>> {
        Ok(parse_rows(subject, &self.read_rows(subject)?))
    }

    /// Hand `subject`'s current events to `decide` and append the event it
    /// returns, with no other append to that log in between. When `decide`
    /// returns an error nothing is written.
    ///
    /// The provided version is only atomic for callers that already serialize
    /// writers of `subject`; stores shared across processes override it.
    fn append_with(
        &self,
        subject: &Subject,
        decide: &mut dyn FnMut(&[Event]) -> AppResult<Event>,
    ) -> AppResult<Event> {
        let event = decide(&self.read_all(subject)?)?;
        self.append(subject, &event)?;
        Ok(event)
    }

    /// Record an operation in the store's audit trail, if it keeps one.
    /// Never fails the operation being recorded.
    fn audit(&self, _operation: &str, _target: &str, _message: &str) {}
}

pub(crate) fn parse_rows(subject: &Subject, rows: &[RawRow]) -> Vec<Event> {
    rows.iter()
        .filter_map(|row| match Event::from_raw(row) {
            Ok(ev) => Some(ev),
            Err(e) => {
                warn!(
                    subject = %subject,
                    row = row.position,
                    "skipping malformed row: {e}"
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let subject = Subject::sanitize("Alice").unwrap();
        let rows = vec![
            RawRow {
                position: 1,
                timestamp: "2024-01-01T08:00:00".into(),
                status: "en service".into(),
            },
            RawRow {
                position: 2,
                timestamp: "#VALUE!".into(),
                status: "hors service".into(),
            },
            RawRow {
                position: 3,
                timestamp: "2024-01-01T12:00:00".into(),
                status: "".into(),
            },
            RawRow {
                position: 4,
                timestamp: "2024-01-01T12:00:00".into(),
                status: "hors service".into(),
            },
        ];

        let events = parse_rows(&subject, &rows);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].status, Status::OnDuty);
        assert_eq!(events[1].status, Status::OffDuty);
    }
}
