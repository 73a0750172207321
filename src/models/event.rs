use super::status::Status;
use crate::errors::{AppError, AppResult};
use crate::utils::time::{format_timestamp, parse_timestamp};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One entry of a subject's log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Event {
    pub timestamp: NaiveDateTime, // ⇔ events.timestamp (TEXT, ISO-8601 or locale form)
    pub status: Status,           // ⇔ events.status ('en service' | 'hors service')
}

/// A row exactly as it sits in the store, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRow {
    pub position: i64,
    pub timestamp: String,
    pub status: String,
}

impl Event {
    pub fn new(timestamp: NaiveDateTime, status: Status) -> Self {
        Self { timestamp, status }
    }

    pub fn on_duty(timestamp: NaiveDateTime) -> Self {
        Self::new(timestamp, Status::OnDuty)
    }

    pub fn off_duty(timestamp: NaiveDateTime) -> Self {
        Self::new(timestamp, Status::OffDuty)
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn timestamp_str(&self) -> String {
        format_timestamp(&self.timestamp)
    }

    /// Parse a stored row. Fails on an unparseable timestamp or status.
    pub fn from_raw(row: &RawRow) -> AppResult<Self> {
        let timestamp = parse_timestamp(&row.timestamp)
            .ok_or_else(|| AppError::InvalidTimestamp(row.timestamp.clone()))?;
        let status = Status::from_db_str(&row.status)
            .ok_or_else(|| AppError::InvalidStatus(row.status.clone()))?;
        Ok(Self { timestamp, status })
    }

    pub fn to_raw(&self, position: i64) -> RawRow {
        RawRow {
            position,
            timestamp: self.timestamp_str(),
            status: self.status.to_db_str().to_string(),
        }
    }
}
