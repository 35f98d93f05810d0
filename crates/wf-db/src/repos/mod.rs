//! Read repos over the pipeline schema.
//!
//! Each module adds query methods to `PipelineDb` via `impl PipelineDb`
//! blocks and maps rows back into the `wf_core::entities` structs that the
//! CSV files deserialize into.

pub mod lab;
pub mod session;
pub mod subject;

use wf_core::enums::Table;

use crate::PipelineDb;
use crate::error::DatabaseError;

impl PipelineDb {
    /// Number of rows in one table.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count(&self, table: Table) -> Result<u64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table(table));
        let mut rows = self.conn().query(&sql, ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count = row.get::<i64>(0)?;
        u64::try_from(count).map_err(|e| DatabaseError::Query(format!("negative count: {e}")))
    }

    /// Row counts of every table, in [`Table::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any count fails.
    pub async fn row_counts(&self) -> Result<Vec<(Table, u64)>, DatabaseError> {
        let mut counts = Vec::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            counts.push((table, self.count(table).await?));
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fresh_schema_is_empty() {
        let db = PipelineDb::open_local(":memory:", "").await.unwrap();
        let counts = db.row_counts().await.unwrap();
        assert_eq!(counts.len(), Table::ALL.len());
        assert!(counts.iter().all(|(_, n)| *n == 0));
    }

    #[tokio::test]
    async fn count_respects_prefix() {
        let db = PipelineDb::open_local(":memory:", "p_").await.unwrap();
        db.conn()
            .execute("INSERT INTO p_lab_user_role (user_role) VALUES ('PI')", ())
            .await
            .unwrap();
        assert_eq!(db.count(Table::UserRole).await.unwrap(), 1);
    }
}
