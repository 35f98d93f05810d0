use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::datetime;
use crate::enums::Sex;

/// An experimental subject. Keyed by `subject`.
///
/// `death_date` and `cull_method` are optional; an empty CSV cell means the
/// subject is alive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub subject: String,
    pub sex: Sex,
    #[serde(with = "datetime::naive")]
    pub subject_birth_date: NaiveDateTime,
    #[serde(default)]
    pub subject_description: String,
    #[serde(default, with = "datetime::naive_option")]
    pub death_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub cull_method: Option<String>,
}

/// Foreign-key attachments of a subject: protocol, owning user, genetic
/// line, strain, source and lab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectPart {
    pub subject: String,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub line: Option<String>,
    #[serde(default)]
    pub strain: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub lab: Option<String>,
}
