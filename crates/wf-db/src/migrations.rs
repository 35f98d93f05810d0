//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! database open. All statements use `IF NOT EXISTS` for idempotent re-running.
//! Each file spells table names as `{p}name`; the placeholder is replaced with
//! the connection's prefix before execution.

use crate::PipelineDb;
use crate::error::DatabaseError;

const PREFIX_PLACEHOLDER: &str = "{p}";

/// Lab schema: 11 tables.
const MIGRATION_001: &str = include_str!("../migrations/001_lab.sql");
/// Subject schema: 9 tables.
const MIGRATION_002: &str = include_str!("../migrations/002_subject.sql");
/// Session schema: 5 tables.
const MIGRATION_003: &str = include_str!("../migrations/003_session.sql");

const MIGRATIONS: [(&str, &str); 3] = [
    ("001_lab", MIGRATION_001),
    ("002_subject", MIGRATION_002),
    ("003_session", MIGRATION_003),
];

impl PipelineDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        for (name, sql) in MIGRATIONS {
            tracing::debug!(migration = name, prefix = %self.prefix(), "running migration");
            self.conn()
                .execute_batch(&sql.replace(PREFIX_PLACEHOLDER, self.prefix()))
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
        }
        Ok(())
    }
}
