use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::time::Duration;
use tracing::debug;

/// How long a statement waits on a database locked by another process
/// (a second `shiftledger` or a running backup) before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

/// Prepare a freshly opened ledger connection and bring its schema up to date.
///
/// `events.subject` references `subjects(name)`; every insert path creates the
/// subject first, so enforcing the key never rejects a legitimate append.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    run_pending_migrations(conn)?;
    debug!("ledger schema ready");
    Ok(())
}
