//! Unified application error type.
//! All modules (store, db, core, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / storage
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Event store unavailable: {0}")]
    StoreUnavailable(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    // ---------------------------
    // Rejected requests
    // ---------------------------
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Invalid day count '{0}': expected a non-negative whole number")]
    InvalidDayCount(String),

    #[error("{0} is already on duty")]
    AlreadyOnDuty(String),

    #[error("{0} is not on duty")]
    NotOnDuty(String),

    #[error("Prompt #{0} is no longer valid")]
    StaleInteraction(u64),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The user was already shown why the request did not go through.
    #[error("request not completed")]
    Reported,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Errors caused by the request itself rather than by the system.
    /// They are answered with an explanation and never mutate state.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AppError::InvalidRequest(_)
                | AppError::InvalidDayCount(_)
                | AppError::InvalidDate(_)
                | AppError::AlreadyOnDuty(_)
                | AppError::NotOnDuty(_)
        )
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, AppError::StaleInteraction(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_state_toggles_are_rejections() {
        assert!(AppError::AlreadyOnDuty("Bob".into()).is_rejection());
        assert!(AppError::NotOnDuty("Bob".into()).is_rejection());
        assert!(AppError::InvalidDayCount("abc".into()).is_rejection());
        assert!(!AppError::StoreUnavailable("gone".into()).is_rejection());
        assert!(AppError::StaleInteraction(3).is_stale());
    }
}
