//! Subject ingestion: subjects, death records and part tables.

use wf_core::datetime;
use wf_core::entities::{Subject, SubjectPart};
use wf_core::enums::Table;
use wf_core::output::OutputSink;

use super::{
    InsertTally, LabIngested, SubjectCsvPaths, SubjectsIngested, check_same_db, insert, insert_sql,
};
use crate::PipelineDb;
use crate::csv_source::read_rows;
use crate::error::DatabaseError;

/// Ingest `subjects.csv` and `subjects_part.csv`.
///
/// Requires the proof of a completed [`super::ingest_lab`], since part rows
/// reference protocols, users and labs. The token must come from `db`.
///
/// # Errors
///
/// Returns `DatabaseError` if a file cannot be read or parsed, a row violates
/// a constraint (e.g. an unknown protocol), or writing a progress line fails.
pub async fn ingest_subjects(
    db: &PipelineDb,
    lab: &LabIngested,
    paths: &SubjectCsvPaths,
    verbose: bool,
    out: &mut OutputSink,
) -> Result<SubjectsIngested, DatabaseError> {
    check_same_db(db, lab.db_id, "ingest_subjects")?;
    let subjects: Vec<Subject> = read_rows(&paths.subject_csv_path)?;
    let parts: Vec<SubjectPart> = read_rows(&paths.subject_part_csv_path)?;

    let tx = db.conn().transaction().await?;
    let mut tally = InsertTally::default();

    let subject_sql = insert_sql(
        db,
        Table::Subject,
        &["subject", "sex", "subject_birth_date", "subject_description"],
    );
    let death_sql = insert_sql(db, Table::SubjectDeath, &["subject", "death_date"]);
    let cull_sql = insert_sql(db, Table::SubjectCullMethod, &["subject", "cull_method"]);
    for subject in &subjects {
        insert(
            &tx,
            &mut tally,
            Table::Subject,
            &subject_sql,
            libsql::params![
                subject.subject.as_str(),
                subject.sex.as_str(),
                datetime::format(&subject.subject_birth_date),
                subject.subject_description.as_str()
            ],
        )
        .await?;

        let Some(death_date) = subject.death_date else {
            continue;
        };
        insert(
            &tx,
            &mut tally,
            Table::SubjectDeath,
            &death_sql,
            libsql::params![subject.subject.as_str(), datetime::format(&death_date)],
        )
        .await?;
        if let Some(cull_method) = subject.cull_method.as_deref() {
            insert(
                &tx,
                &mut tally,
                Table::SubjectCullMethod,
                &cull_sql,
                libsql::params![subject.subject.as_str(), cull_method],
            )
            .await?;
        }
    }

    let part_tables = [
        (Table::SubjectProtocol, "protocol"),
        (Table::SubjectUser, "user"),
        (Table::SubjectLine, "line"),
        (Table::SubjectStrain, "strain"),
        (Table::SubjectSource, "source"),
        (Table::SubjectLab, "lab"),
    ];
    let part_sql: Vec<String> = part_tables
        .iter()
        .map(|(table, column)| insert_sql(db, *table, &["subject", *column]))
        .collect();
    for part in &parts {
        let values = [
            part.protocol.as_deref(),
            part.user.as_deref(),
            part.line.as_deref(),
            part.strain.as_deref(),
            part.source.as_deref(),
            part.lab.as_deref(),
        ];
        for (((table, _), sql), value) in part_tables.iter().zip(&part_sql).zip(values) {
            let Some(value) = value else {
                continue;
            };
            insert(
                &tx,
                &mut tally,
                *table,
                sql,
                libsql::params![part.subject.as_str(), value],
            )
            .await?;
        }
    }

    tx.commit().await?;
    tracing::info!(
        subjects = subjects.len(),
        parts = parts.len(),
        inserted = tally.total_inserted(),
        "subject ingestion complete"
    );
    tally.report(db, verbose, out)?;
    Ok(SubjectsIngested {
        db_id: db.id(),
        tally,
    })
}
