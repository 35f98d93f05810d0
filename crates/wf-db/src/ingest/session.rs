//! Session ingestion: sessions and their directory, note, project and
//! experimenter parts.

use wf_core::datetime;
use wf_core::entities::Session;
use wf_core::enums::Table;
use wf_core::output::OutputSink;

use super::{
    InsertTally, SessionCsvPaths, SessionsIngested, SubjectsIngested, check_same_db, insert,
    insert_sql,
};
use crate::PipelineDb;
use crate::csv_source::read_rows;
use crate::error::DatabaseError;

/// Ingest `sessions.csv`.
///
/// Requires the proof of a completed [`super::ingest_subjects`]: every
/// session references a subject, a project and a user. The token must come
/// from `db`.
///
/// # Errors
///
/// Returns `DatabaseError` if the file cannot be read or parsed, a row
/// violates a constraint, or writing a progress line fails.
pub async fn ingest_sessions(
    db: &PipelineDb,
    subjects: &SubjectsIngested,
    paths: &SessionCsvPaths,
    verbose: bool,
    out: &mut OutputSink,
) -> Result<SessionsIngested, DatabaseError> {
    check_same_db(db, subjects.db_id, "ingest_sessions")?;
    let sessions: Vec<Session> = read_rows(&paths.session_csv_path)?;

    let tx = db.conn().transaction().await?;
    let mut tally = InsertTally::default();

    let session_sql = insert_sql(db, Table::Session, &["subject", "session_datetime"]);
    let parts = [
        (Table::SessionDirectory, "session_dir"),
        (Table::SessionNote, "session_note"),
        (Table::SessionProject, "project"),
        (Table::SessionExperimenter, "user"),
    ];
    let part_sql: Vec<String> = parts
        .iter()
        .map(|(table, column)| insert_sql(db, *table, &["subject", "session_datetime", *column]))
        .collect();

    for session in &sessions {
        let when = datetime::format(&session.session_datetime);
        tracing::debug!(session = %session.key(), "ingesting session");
        insert(
            &tx,
            &mut tally,
            Table::Session,
            &session_sql,
            libsql::params![session.subject.as_str(), when.as_str()],
        )
        .await?;

        let values = [
            session.session_dir.as_deref(),
            session.session_note.as_deref(),
            session.project.as_deref(),
            session.user.as_deref(),
        ];
        for (((table, _), sql), value) in parts.iter().zip(&part_sql).zip(values) {
            let Some(value) = value else {
                continue;
            };
            insert(
                &tx,
                &mut tally,
                *table,
                sql,
                libsql::params![session.subject.as_str(), when.as_str(), value],
            )
            .await?;
        }
    }

    tx.commit().await?;
    tracing::info!(
        sessions = sessions.len(),
        inserted = tally.total_inserted(),
        "session ingestion complete"
    );
    tally.report(db, verbose, out)?;
    Ok(SessionsIngested {
        db_id: db.id(),
        tally,
    })
}
