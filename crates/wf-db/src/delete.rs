//! Cascading deletes used by fixture teardown.
//!
//! `DELETE FROM` a master table removes its parts through `ON DELETE CASCADE`.
//! Before and after counts of every table are compared so the caller sees
//! one `Deleting N rows from ...` line per affected table, dependents included.

use wf_core::enums::Table;
use wf_core::output::OutputSink;

use crate::PipelineDb;
use crate::error::DatabaseError;

/// Answers the safemode prompt before a destructive delete.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

impl PipelineDb {
    /// Delete every row of `table` and, by cascade, everything that depends
    /// on those rows.
    ///
    /// With safemode on, `confirm` is asked first and a refusal deletes
    /// nothing. Returns the number of rows removed across all tables.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::DeleteDeclined` if the prompt is refused, or
    /// any query or output error unchanged.
    pub async fn delete_all(
        &self,
        table: Table,
        out: &mut OutputSink,
        confirm: &dyn Confirm,
    ) -> Result<u64, DatabaseError> {
        let name = self.table(table);
        let before = self.row_counts().await?;
        let root = before
            .iter()
            .find(|(t, _)| *t == table)
            .map_or(0, |(_, n)| *n);

        if root == 0 {
            tracing::debug!(table = %name, "nothing to delete");
            out.line("Nothing to delete.")?;
            return Ok(0);
        }

        if self.safemode() {
            let prompt = format!("Delete {root} rows from `{name}`? [yes/No]");
            if !confirm.confirm(&prompt) {
                out.line("Delete cancelled.")?;
                return Err(DatabaseError::DeleteDeclined { table: name });
            }
        }

        let tx = self.conn().transaction().await?;
        tx.execute(&format!("DELETE FROM {name}"), ()).await?;
        tx.commit().await?;

        let after = self.row_counts().await?;
        let mut total = 0;
        for ((affected, rows_before), (_, rows_after)) in before.iter().zip(&after) {
            let removed = rows_before.saturating_sub(*rows_after);
            if removed > 0 {
                out.line(format!("Deleting {removed} rows from `{}`", self.table(*affected)))?;
                total += removed;
            }
        }
        tracing::info!(table = %name, rows = total, "delete complete");
        Ok(total)
    }
}
