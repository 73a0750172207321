use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// Whose shifts are tracked. Doubles as the key of the subject's log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Subject(String);

impl Subject {
    pub const MAX_LEN: usize = 31;
    const FORBIDDEN: [char; 7] = ['\\', '/', '?', '*', '[', ']', ':'];

    /// Build a subject from a display name: forbidden characters become `_`
    /// and the result is cut to [`Subject::MAX_LEN`] characters.
    pub fn sanitize(display_name: &str) -> AppResult<Self> {
        let trimmed = display_name.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidRequest(
                "No subject could be resolved from an empty name.".into(),
            ));
        }

        let name: String = trimmed
            .chars()
            .map(|c| if Self::FORBIDDEN.contains(&c) { '_' } else { c })
            .take(Self::MAX_LEN)
            .collect();

        Ok(Self(name))
    }

    /// Wrap a name read back from the store; it was sanitized on the way in.
    pub(crate) fn from_stored(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Subject {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
