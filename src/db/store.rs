//! SQLite-backed event store.

use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{append_decided, insert_event, insert_row, load_rows, load_subjects};
use crate::errors::{AppError, AppResult};
use crate::models::{Event, RawRow, Subject};
use crate::store::EventStore;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Every statement runs on one connection behind one mutex, so a read can
/// never observe a half-written append. Checked appends also take SQLite's
/// write lock, which orders them against other handles on the same file.
pub struct SqliteStore {
    pool: Mutex<DbPool>,
    path: String,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and bring its schema up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)
            .map_err(|e| AppError::StoreUnavailable(format!("{path}: {e}")))?;
        init_db(&pool.conn)?;
        Ok(Self {
            pool: Mutex::new(pool),
            path: path.to_string(),
        })
    }

    pub fn in_memory() -> AppResult<Self> {
        let pool = DbPool::in_memory()?;
        init_db(&pool.conn)?;
        Ok(Self {
            pool: Mutex::new(pool),
            path: ":memory:".to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, DbPool>> {
        self.pool
            .lock()
            .map_err(|_| AppError::StoreUnavailable(format!("{}: lock poisoned", self.path)))
    }

    /// Run `func` with exclusive access to the connection.
    pub fn with_pool<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut DbPool) -> AppResult<T>,
    {
        let mut pool = self.lock()?;
        func(&mut pool)
    }

    /// Append a row verbatim (see [`insert_row`]).
    pub fn append_raw(
        &self,
        subject: &Subject,
        timestamp: Option<&str>,
        status: Option<&str>,
    ) -> AppResult<()> {
        let mut pool = self.lock()?;
        insert_row(&mut pool.conn, subject, timestamp, status, "import")
    }
}

impl EventStore for SqliteStore {
    fn append(&self, subject: &Subject, event: &Event) -> AppResult<()> {
        let mut pool = self.lock()?;
        insert_event(&mut pool.conn, subject, event, "cli")
    }

    /// Atomic across connections and processes: see [`append_decided`].
    fn append_with(
        &self,
        subject: &Subject,
        decide: &mut dyn FnMut(&[Event]) -> AppResult<Event>,
    ) -> AppResult<Event> {
        let mut pool = self.lock()?;
        append_decided(&mut pool.conn, subject, "cli", decide)
    }

    fn read_rows(&self, subject: &Subject) -> AppResult<Vec<RawRow>> {
        let pool = self.lock()?;
        load_rows(&pool.conn, subject)
    }

    fn subjects(&self) -> AppResult<Vec<Subject>> {
        let pool = self.lock()?;
        load_subjects(&pool.conn)
    }

    fn audit(&self, operation: &str, target: &str, message: &str) {
        let result = self
            .lock()
            .and_then(|pool| ttlog(&pool.conn, operation, target, message));
        if let Err(e) = result {
            warn!("failed to write internal log: {e}");
        }
    }
}
