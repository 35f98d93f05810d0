use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::datetime;

/// A recording session. Keyed by `(subject, session_datetime)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub subject: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(with = "datetime::naive")]
    pub session_datetime: NaiveDateTime,
    #[serde(default)]
    pub session_dir: Option<String>,
    #[serde(default)]
    pub session_note: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

impl Session {
    /// The `(subject, datetime)` primary key rendered for log lines.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}@{}", self.subject, datetime::format(&self.session_datetime))
    }
}
