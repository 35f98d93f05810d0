//! Enums shared across the pipeline: subject sex and the table catalogue.
//!
//! All serialized enums use the exact spelling found in CSV files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Sex
// ---------------------------------------------------------------------------

/// Sex of a subject as recorded in `subjects.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "U")]
    Unknown,
}

impl Sex {
    /// Return the single-letter code used in CSV files and SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "U",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "M" => Ok(Self::Male),
            "F" => Ok(Self::Female),
            "U" => Ok(Self::Unknown),
            other => Err(CoreError::Validation(format!(
                "unknown sex '{other}', expected one of M, F, U"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// The three schemas of the pipeline, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    Lab,
    Subject,
    Session,
}

impl Schema {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lab => "lab",
            Self::Subject => "subject",
            Self::Session => "session",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Every table of the relational schema.
///
/// The SQL name of a table is `{prefix}{base_name}`, where the prefix comes
/// from `custom.database_prefix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    // lab
    Lab,
    Location,
    Project,
    ProjectKeyword,
    ProjectPublication,
    ProtocolType,
    Protocol,
    User,
    UserRole,
    LabMembership,
    ProjectUser,
    // subject
    Subject,
    SubjectDeath,
    SubjectCullMethod,
    SubjectProtocol,
    SubjectUser,
    SubjectLine,
    SubjectStrain,
    SubjectSource,
    SubjectLab,
    // session
    Session,
    SessionDirectory,
    SessionNote,
    SessionProject,
    SessionExperimenter,
}

impl Table {
    /// All tables, masters before their parts, in creation order.
    pub const ALL: [Self; 25] = [
        Self::Lab,
        Self::Location,
        Self::Project,
        Self::ProjectKeyword,
        Self::ProjectPublication,
        Self::ProtocolType,
        Self::Protocol,
        Self::User,
        Self::UserRole,
        Self::LabMembership,
        Self::ProjectUser,
        Self::Subject,
        Self::SubjectDeath,
        Self::SubjectCullMethod,
        Self::SubjectProtocol,
        Self::SubjectUser,
        Self::SubjectLine,
        Self::SubjectStrain,
        Self::SubjectSource,
        Self::SubjectLab,
        Self::Session,
        Self::SessionDirectory,
        Self::SessionNote,
        Self::SessionProject,
        Self::SessionExperimenter,
    ];

    /// Table name without the configured prefix.
    #[must_use]
    pub const fn base_name(self) -> &'static str {
        match self {
            Self::Lab => "lab",
            Self::Location => "lab_location",
            Self::Project => "lab_project",
            Self::ProjectKeyword => "lab_project_keyword",
            Self::ProjectPublication => "lab_project_publication",
            Self::ProtocolType => "lab_protocol_type",
            Self::Protocol => "lab_protocol",
            Self::User => "lab_user",
            Self::UserRole => "lab_user_role",
            Self::LabMembership => "lab_membership",
            Self::ProjectUser => "lab_project_user",
            Self::Subject => "subject",
            Self::SubjectDeath => "subject_death",
            Self::SubjectCullMethod => "subject_cull_method",
            Self::SubjectProtocol => "subject_protocol",
            Self::SubjectUser => "subject_user",
            Self::SubjectLine => "subject_line",
            Self::SubjectStrain => "subject_strain",
            Self::SubjectSource => "subject_source",
            Self::SubjectLab => "subject_lab",
            Self::Session => "session",
            Self::SessionDirectory => "session_directory",
            Self::SessionNote => "session_note",
            Self::SessionProject => "session_project",
            Self::SessionExperimenter => "session_experimenter",
        }
    }

    /// The schema this table belongs to.
    #[must_use]
    pub const fn schema(self) -> Schema {
        match self {
            Self::Lab
            | Self::Location
            | Self::Project
            | Self::ProjectKeyword
            | Self::ProjectPublication
            | Self::ProtocolType
            | Self::Protocol
            | Self::User
            | Self::UserRole
            | Self::LabMembership
            | Self::ProjectUser => Schema::Lab,
            Self::Subject
            | Self::SubjectDeath
            | Self::SubjectCullMethod
            | Self::SubjectProtocol
            | Self::SubjectUser
            | Self::SubjectLine
            | Self::SubjectStrain
            | Self::SubjectSource
            | Self::SubjectLab => Schema::Subject,
            Self::Session
            | Self::SessionDirectory
            | Self::SessionNote
            | Self::SessionProject
            | Self::SessionExperimenter => Schema::Session,
        }
    }

    /// Tables of one schema, in creation order.
    pub fn in_schema(schema: Schema) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |t| t.schema() == schema)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_name())
    }
}
