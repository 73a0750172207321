use crate::models::{RawRow, Subject};
use serde::Serialize;

/// One stored row, flattened with its subject. Cells are exported verbatim,
/// malformed ones included.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct EventExport {
    pub subject: String,
    pub position: i64,
    pub timestamp: String,
    pub status: String,
}

impl EventExport {
    pub fn from_row(subject: &Subject, row: &RawRow) -> Self {
        Self {
            subject: subject.to_string(),
            position: row.position,
            timestamp: row.timestamp.clone(),
            status: row.status.clone(),
        }
    }
}

/// Header of every worksheet, as in the historical spreadsheet layout.
pub(crate) const SHEET_HEADERS: [&str; 2] = ["Timestamp", "Status"];
