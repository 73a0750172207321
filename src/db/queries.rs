use crate::errors::AppResult;
use crate::models::{Event, RawRow, Subject};
use crate::store::parse_rows;
use chrono::Local;
use rusqlite::{Connection, Result, Row, TransactionBehavior, params};

/// Map an `events` row without interpreting it. A NULL cell reads as an
/// empty string and is rejected later, when the row is parsed.
pub fn map_row(row: &Row) -> Result<RawRow> {
    Ok(RawRow {
        position: row.get("position")?,
        timestamp: row
            .get::<_, Option<String>>("timestamp")?
            .unwrap_or_default(),
        status: row.get::<_, Option<String>>("status")?.unwrap_or_default(),
    })
}

pub fn ensure_subject(conn: &Connection, subject: &Subject) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO subjects (name, created_at) VALUES (?1, ?2)",
        params![subject.as_str(), Local::now().to_rfc3339()],
    )?;
    Ok(())
}

/// Append an event to the subject's log, creating the subject if needed.
/// Both writes commit together or not at all.
pub fn insert_event(
    conn: &mut Connection,
    subject: &Subject,
    ev: &Event,
    source: &str,
) -> AppResult<()> {
    insert_row(conn, subject, Some(&ev.timestamp_str()), Some(ev.status.to_db_str()), source)
}

/// Append a row verbatim. Used by imports and by tests that need
/// malformed data in the log.
pub fn insert_row(
    conn: &mut Connection,
    subject: &Subject,
    timestamp: Option<&str>,
    status: Option<&str>,
    source: &str,
) -> AppResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    write_row(&tx, subject, timestamp, status, source)?;
    tx.commit()?;
    Ok(())
}

/// Read the subject's log, let `decide` choose the next event and append it,
/// all inside one `BEGIN IMMEDIATE` transaction.
///
/// The write lock is taken before the read, so a writer on another connection
/// (or in another process) waits for this commit and then reads the new row.
/// A refusal from `decide` rolls the transaction back.
pub fn append_decided(
    conn: &mut Connection,
    subject: &Subject,
    source: &str,
    decide: &mut dyn FnMut(&[Event]) -> AppResult<Event>,
) -> AppResult<Event> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let rows = load_rows(&tx, subject)?;
    let event = decide(&parse_rows(subject, &rows))?;
    write_row(
        &tx,
        subject,
        Some(&event.timestamp_str()),
        Some(event.status.to_db_str()),
        source,
    )?;
    tx.commit()?;
    Ok(event)
}

fn write_row(
    conn: &Connection,
    subject: &Subject,
    timestamp: Option<&str>,
    status: Option<&str>,
    source: &str,
) -> AppResult<()> {
    ensure_subject(conn, subject)?;
    conn.execute(
        "INSERT INTO events (subject, timestamp, status, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            subject.as_str(),
            timestamp,
            status,
            source,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn load_rows(conn: &Connection, subject: &Subject) -> AppResult<Vec<RawRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT ROW_NUMBER() OVER (ORDER BY id) AS position, timestamp, status
         FROM events
         WHERE subject = ?1
         ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([subject.as_str()], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_subjects(conn: &Connection) -> AppResult<Vec<Subject>> {
    let mut stmt = conn.prepare_cached("SELECT name FROM subjects ORDER BY rowid ASC")?;

    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(Subject::from_stored(r?));
    }
    Ok(out)
}
