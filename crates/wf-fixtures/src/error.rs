//! Error types for wf-fixtures.

use thiserror::Error;
use wf_config::ConfigError;
use wf_db::error::DatabaseError;

/// Errors from building the fixture graph or running its nodes.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Duplicate fixture '{0}'")]
    DuplicateNode(String),

    #[error("Fixture '{node}' requires unknown fixture '{requirement}'")]
    UnknownRequirement { node: String, requirement: String },

    #[error("Fixture graph has a cycle through '{0}'")]
    Cycle(String),

    /// An ingest node does not directly require the node writing one of its inputs.
    #[error("Fixture '{node}' must directly require the fixture writing {file}")]
    MissingInput { node: String, file: &'static str },

    /// An ingest node can run before an ingest step it depends on.
    #[error("Fixture '{node}' must depend on '{prerequisite}'")]
    MissingPrerequisite {
        node: String,
        prerequisite: &'static str,
    },

    #[error("Fixture '{0}' does not depend on the pipeline fixture")]
    MissingPipeline(String),

    #[error("Unknown fixture '{0}'")]
    UnknownTarget(String),

    /// A node ran before something it needs was set up.
    #[error("Fixture '{0}' has not been set up")]
    NotSetUp(&'static str),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
