//! Cross-cutting error types for the pipeline.
//!
//! Domain-specific errors (`ConfigError`, `DatabaseError`, `FixtureError`) are
//! defined in their respective crates.

use thiserror::Error;

/// Errors that can be raised by any `wf-*` crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
