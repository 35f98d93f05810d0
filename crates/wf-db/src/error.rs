//! Database error types for wf-db.

use thiserror::Error;

/// Errors from database, ingestion and delete operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// The table prefix cannot be used inside an SQL identifier.
    #[error("Invalid table prefix '{0}'")]
    InvalidPrefix(String),

    /// A delete was refused at the safemode confirmation prompt.
    #[error("Delete from `{table}` was not confirmed")]
    DeleteDeclined { table: String },

    /// An ingestion token from one database handle was used with another.
    #[error("`{step}` was run against a different database handle")]
    WrongDatabase { step: &'static str },

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// A CSV file could not be opened or a row could not be deserialized.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing a progress line to the output sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
