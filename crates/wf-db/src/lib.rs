//! # wf-db
//!
//! libSQL database operations for the workflow-session pipeline.
//!
//! Holds the relational schema (lab, subject and session tables), the CSV
//! ingestion functions that populate it, cascading deletes used by fixture
//! teardown, and read repos used to check what was ingested.
//!
//! Uses the `libsql` crate (C `SQLite` fork). Part tables reference their
//! masters with `ON DELETE CASCADE`, so deleting a lab, subject or session
//! removes everything that depends on it.

pub mod csv_source;
pub mod delete;
pub mod error;
pub mod helpers;
pub mod ingest;
mod migrations;
pub mod repos;

use std::sync::atomic::{AtomicU64, Ordering};

use error::DatabaseError;
use libsql::Builder;
use wf_config::{DatabaseTarget, PipelineConfig};
use wf_core::enums::Table;

/// Central database handle for all pipeline state.
///
/// Wraps a libSQL database and a single connection. Table names are built
/// from the prefix given at open time; see [`PipelineDb::table`].
pub struct PipelineDb {
    #[allow(dead_code)]
    db: libsql::Database,
    id: u64,
    conn: libsql::Connection,
    prefix: String,
    safemode: bool,
}

/// Source of [`PipelineDb::id`]; every handle opened in this process gets its own.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl PipelineDb {
    /// Open the database described by a loaded configuration.
    ///
    /// Uses `database.host` to pick the target, `custom.database_prefix` for
    /// table names, and `safemode` for delete confirmation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn connect(config: &PipelineConfig) -> Result<Self, DatabaseError> {
        tracing::info!(
            user = %config.database.user,
            host = %config.database.host,
            prefix = %config.custom.database_prefix,
            "connecting to pipeline database"
        );
        let prefix = config.custom.database_prefix.as_str();
        let mut db = match config.database.target() {
            DatabaseTarget::Memory => Self::open_local(":memory:", prefix).await?,
            DatabaseTarget::LocalFile(path) => {
                Self::open_local(&path.to_string_lossy(), prefix).await?
            }
            DatabaseTarget::Remote { url, auth_token } => {
                Self::open_remote(&url, &auth_token, prefix).await?
            }
        };
        db.set_safemode(config.safemode);
        Ok(db)
    }

    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open. Safemode starts off.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the prefix is invalid, the database cannot
    /// be opened, or migrations fail.
    pub async fn open_local(path: &str, prefix: &str) -> Result<Self, DatabaseError> {
        helpers::validate_prefix(prefix)?;
        let db = Builder::new_local(path).build().await?;
        Self::from_database(db, prefix).await
    }

    /// Open a remote libSQL database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the prefix is invalid, the connection fails,
    /// or migrations fail.
    pub async fn open_remote(
        url: &str,
        auth_token: &str,
        prefix: &str,
    ) -> Result<Self, DatabaseError> {
        helpers::validate_prefix(prefix)?;
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        Self::from_database(db, prefix).await
    }

    async fn from_database(db: libsql::Database, prefix: &str) -> Result<Self, DatabaseError> {
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let pipeline_db = Self {
            db,
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            conn,
            prefix: prefix.to_string(),
            safemode: false,
        };
        pipeline_db.run_migrations().await?;
        Ok(pipeline_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Process-unique id of this handle. Ingestion tokens remember it.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// The table prefix this handle was opened with.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full SQL name of a table, e.g. `test_lab`.
    #[must_use]
    pub fn table(&self, table: Table) -> String {
        format!("{}{}", self.prefix, table.base_name())
    }

    /// Whether deletes ask for confirmation.
    #[must_use]
    pub const fn safemode(&self) -> bool {
        self.safemode
    }

    pub const fn set_safemode(&mut self, safemode: bool) {
        self.safemode = safemode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> PipelineDb {
        PipelineDb::open_local(":memory:", "").await.unwrap()
    }

    async fn table_exists(db: &PipelineDb, name: &str) -> bool {
        let mut rows = db
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                [name],
            )
            .await
            .unwrap();
        rows.next().await.unwrap().is_some()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        for table in Table::ALL {
            assert!(
                table_exists(&db, table.base_name()).await,
                "table '{table}' should exist"
            );
        }
    }

    #[tokio::test]
    async fn prefix_applies_to_every_table() {
        let db = PipelineDb::open_local(":memory:", "test_").await.unwrap();
        assert_eq!(db.table(Table::Lab), "test_lab");
        for table in Table::ALL {
            assert!(table_exists(&db, &db.table(table)).await);
        }
        assert!(!table_exists(&db, "lab").await);
    }

    #[tokio::test]
    async fn invalid_prefix_is_rejected() {
        let result = PipelineDb::open_local(":memory:", "x;--").await;
        assert!(matches!(result, Err(DatabaseError::InvalidPrefix(_))));
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO lab_location (lab, location) VALUES ('NoSuchLab', 'Nowhere')",
                (),
            )
            .await;
        assert!(result.is_err(), "orphan location should be rejected");
    }

    #[tokio::test]
    async fn handles_get_distinct_ids() {
        let a = test_db().await;
        let b = test_db().await;
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn connect_uses_config_prefix_and_safemode() {
        let mut config = PipelineConfig::default();
        config.custom.database_prefix = "cfg_".into();
        config.safemode = true;

        let db = PipelineDb::connect(&config).await.unwrap();
        assert_eq!(db.prefix(), "cfg_");
        assert!(db.safemode());
        assert!(table_exists(&db, "cfg_session").await);
    }
}
