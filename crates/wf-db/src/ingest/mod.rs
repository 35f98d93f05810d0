//! CSV ingestion into the pipeline schema.
//!
//! Three entry points, each reading its CSV files and inserting rows inside
//! one transaction:
//!
//! ```text
//! ingest_lab ──► LabIngested ──► ingest_subjects ──► SubjectsIngested ──► ingest_sessions
//! ```
//!
//! The tokens returned by each step can only be created here, so a caller
//! cannot ingest subjects before labs (or sessions before subjects): the
//! call does not type-check without the previous step's token. Each token
//! also records the [`PipelineDb::id`] it was produced on, and a token from
//! another handle is rejected with `DatabaseError::WrongDatabase`.
//!
//! Rows are written with `INSERT OR IGNORE`; ingesting the same files twice
//! leaves the tables unchanged. Foreign-key violations are not ignored and
//! abort the whole step.

mod lab;
mod session;
mod subject;

use std::path::PathBuf;

use wf_core::enums::Table;
use wf_core::output::OutputSink;

use crate::PipelineDb;
use crate::error::DatabaseError;

pub use lab::ingest_lab;
pub use session::ingest_sessions;
pub use subject::ingest_subjects;

/// Paths of the seven CSV files read by [`ingest_lab`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabCsvPaths {
    pub lab_csv_path: PathBuf,
    pub project_csv_path: PathBuf,
    pub publication_csv_path: PathBuf,
    pub keyword_csv_path: PathBuf,
    pub protocol_csv_path: PathBuf,
    pub users_csv_path: PathBuf,
    pub project_user_csv_path: PathBuf,
}

/// Paths of the two CSV files read by [`ingest_subjects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectCsvPaths {
    pub subject_csv_path: PathBuf,
    pub subject_part_csv_path: PathBuf,
}

/// Path of the CSV file read by [`ingest_sessions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCsvPaths {
    pub session_csv_path: PathBuf,
}

/// Proof that [`ingest_lab`] completed.
#[derive(Debug)]
pub struct LabIngested {
    db_id: u64,
    tally: InsertTally,
}

/// Proof that [`ingest_subjects`] completed (and therefore labs as well).
#[derive(Debug)]
pub struct SubjectsIngested {
    db_id: u64,
    tally: InsertTally,
}

/// Proof that [`ingest_sessions`] completed.
#[derive(Debug)]
pub struct SessionsIngested {
    db_id: u64,
    tally: InsertTally,
}

impl LabIngested {
    #[must_use]
    pub const fn tally(&self) -> &InsertTally {
        &self.tally
    }
}

impl SubjectsIngested {
    #[must_use]
    pub const fn tally(&self) -> &InsertTally {
        &self.tally
    }
}

impl SessionsIngested {
    #[must_use]
    pub const fn tally(&self) -> &InsertTally {
        &self.tally
    }
}

/// Fail unless a token produced on `db_id` is being used with `db`.
const fn check_same_db(
    db: &PipelineDb,
    db_id: u64,
    step: &'static str,
) -> Result<(), DatabaseError> {
    if db.id() == db_id {
        Ok(())
    } else {
        Err(DatabaseError::WrongDatabase { step })
    }
}

/// Per-table insert counts of one ingestion step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertTally {
    entries: Vec<TallyEntry>,
}

/// Rows attempted and rows actually inserted for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyEntry {
    pub table: Table,
    pub inserted: u64,
    pub total: u64,
}

impl InsertTally {
    fn record(&mut self, table: Table, inserted: bool) {
        let idx = match self.entries.iter().position(|e| e.table == table) {
            Some(idx) => idx,
            None => {
                self.entries.push(TallyEntry {
                    table,
                    inserted: 0,
                    total: 0,
                });
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[idx];
        entry.total += 1;
        entry.inserted += u64::from(inserted);
    }

    /// Entries in the order their tables were first written.
    #[must_use]
    pub fn entries(&self) -> &[TallyEntry] {
        &self.entries
    }

    /// New rows inserted into `table` (0 if the table was not touched).
    #[must_use]
    pub fn inserted(&self, table: Table) -> u64 {
        self.entry(table).map_or(0, |e| e.inserted)
    }

    /// Rows attempted for `table`, including ignored duplicates.
    #[must_use]
    pub fn total(&self, table: Table) -> u64 {
        self.entry(table).map_or(0, |e| e.total)
    }

    /// New rows across all tables.
    #[must_use]
    pub fn total_inserted(&self) -> u64 {
        self.entries.iter().map(|e| e.inserted).sum()
    }

    fn entry(&self, table: Table) -> Option<&TallyEntry> {
        self.entries.iter().find(|e| e.table == table)
    }

    /// Write one progress line per table when `verbose` is set.
    fn report(
        &self,
        db: &PipelineDb,
        verbose: bool,
        out: &mut OutputSink,
    ) -> Result<(), DatabaseError> {
        if !verbose {
            return Ok(());
        }
        for entry in &self.entries {
            out.line(format!(
                "{} of {} new records inserted into `{}`",
                entry.inserted,
                entry.total,
                db.table(entry.table)
            ))?;
        }
        Ok(())
    }
}

/// `INSERT OR IGNORE` statement for `table` with positional placeholders.
fn insert_sql(db: &PipelineDb, table: Table, columns: &[&str]) -> String {
    let placeholders = (1..=columns.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT OR IGNORE INTO {} ({}) VALUES ({placeholders})",
        db.table(table),
        columns.join(", "),
    )
}

/// Execute one insert inside `tx` and record whether it added a row.
async fn insert(
    tx: &libsql::Transaction,
    tally: &mut InsertTally,
    table: Table,
    sql: &str,
    params: impl libsql::params::IntoParams,
) -> Result<(), DatabaseError> {
    let changed = tx.execute(sql, params).await?;
    tally.record(table, changed > 0);
    Ok(())
}
