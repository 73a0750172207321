use super::{EventStore, parse_rows};
use crate::errors::{AppError, AppResult};
use crate::models::{Event, RawRow, Subject};
use std::sync::{Mutex, MutexGuard};

/// Process-local store. Nothing survives the process; used for tests and
/// dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Vec<(Subject, Vec<RawRow>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row verbatim, bypassing event validation.
    /// Lets callers reproduce logs that were corrupted outside the ledger.
    pub fn push_raw(&self, subject: &Subject, timestamp: &str, status: &str) -> AppResult<()> {
        let mut tables = self.lock()?;
        let rows = table_mut(&mut tables, subject);
        let position = rows.len() as i64 + 1;
        rows.push(RawRow {
            position,
            timestamp: timestamp.to_string(),
            status: status.to_string(),
        });
        Ok(())
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Vec<(Subject, Vec<RawRow>)>>> {
        self.tables
            .lock()
            .map_err(|_| AppError::StoreUnavailable("memory store lock poisoned".into()))
    }
}

fn table_mut<'a>(
    tables: &'a mut Vec<(Subject, Vec<RawRow>)>,
    subject: &Subject,
) -> &'a mut Vec<RawRow> {
    let idx = match tables.iter().position(|(s, _)| s == subject) {
        Some(idx) => idx,
        None => {
            tables.push((subject.clone(), Vec::new()));
            tables.len() - 1
        }
    };
    &mut tables[idx].1
}

impl EventStore for MemoryStore {
    fn append(&self, subject: &Subject, event: &Event) -> AppResult<()> {
        let mut tables = self.lock()?;
        let rows = table_mut(&mut tables, subject);
        let position = rows.len() as i64 + 1;
        rows.push(event.to_raw(position));
        Ok(())
    }

    fn append_with(
        &self,
        subject: &Subject,
        decide: &mut dyn FnMut(&[Event]) -> AppResult<Event>,
    ) -> AppResult<Event> {
        let mut tables = self.lock()?;
        let current = tables
            .iter()
            .find(|(s, _)| s == subject)
            .map(|(_, rows)| parse_rows(subject, rows))
            .unwrap_or_default();
        let event = decide(&current)?;
        let rows = table_mut(&mut tables, subject);
        let position = rows.len() as i64 + 1;
        rows.push(event.to_raw(position));
        Ok(event)
    }

    fn read_rows(&self, subject: &Subject) -> AppResult<Vec<RawRow>> {
        let tables = self.lock()?;
        Ok(tables
            .iter()
            .find(|(s, _)| s == subject)
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }

    fn subjects(&self) -> AppResult<Vec<Subject>> {
        let tables = self.lock()?;
        Ok(tables.iter().map(|(s, _)| s.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::parse_timestamp;

    #[test]
    fn unknown_subject_reads_empty() {
        let store = MemoryStore::new();
        let nobody = Subject::sanitize("nobody").unwrap();
        assert!(store.read_all(&nobody).unwrap().is_empty());
        assert!(store.subjects().unwrap().is_empty());
    }

    #[test]
    fn append_keeps_insertion_order_per_subject() {
        let store = MemoryStore::new();
        let a = Subject::sanitize("a").unwrap();
        let b = Subject::sanitize("b").unwrap();
        let t1 = parse_timestamp("2024-01-02T08:00").unwrap();
        let t0 = parse_timestamp("2024-01-01T08:00").unwrap();

        store.append(&a, &Event::on_duty(t1)).unwrap();
        store.append(&b, &Event::on_duty(t0)).unwrap();
        store.append(&a, &Event::off_duty(t0)).unwrap();

        let rows = store.read_all(&a).unwrap();
        assert_eq!(rows, vec![Event::on_duty(t1), Event::off_duty(t0)]);
        assert_eq!(store.subjects().unwrap(), vec![a, b]);
    }
}
