//! Subject-schema reads.

use wf_core::entities::{Subject, SubjectPart};
use wf_core::enums::Table;

use crate::PipelineDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_optional_datetime, parse_sex};

impl PipelineDb {
    /// All subjects with their death date and cull method, ordered by subject.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a stored value cannot be
    /// parsed.
    pub async fn list_subjects(&self) -> Result<Vec<Subject>, DatabaseError> {
        let sql = format!(
            "SELECT s.subject, s.sex, s.subject_birth_date, s.subject_description,
                    d.death_date, c.cull_method
             FROM {subject} s
             LEFT JOIN {death} d ON d.subject = s.subject
             LEFT JOIN {cull} c ON c.subject = s.subject
             ORDER BY s.subject",
            subject = self.table(Table::Subject),
            death = self.table(Table::SubjectDeath),
            cull = self.table(Table::SubjectCullMethod),
        );
        let mut rows = self.conn().query(&sql, ()).await?;
        let mut subjects = Vec::new();
        while let Some(row) = rows.next().await? {
            subjects.push(row_to_subject(&row)?);
        }
        Ok(subjects)
    }

    /// Part attachments of every subject that has at least one.
    ///
    /// Multi-valued parts (protocol, user, lab) report their smallest value.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_subject_parts(&self) -> Result<Vec<SubjectPart>, DatabaseError> {
        let part = |table: Table, column: &str| {
            format!(
                "(SELECT MIN({column}) FROM {t} p WHERE p.subject = s.subject)",
                t = self.table(table)
            )
        };
        let sql = format!(
            "SELECT s.subject, {protocol}, {user}, {line}, {strain}, {source}, {lab}
             FROM {subject} s ORDER BY s.subject",
            protocol = part(Table::SubjectProtocol, "protocol"),
            user = part(Table::SubjectUser, "user"),
            line = part(Table::SubjectLine, "line"),
            strain = part(Table::SubjectStrain, "strain"),
            source = part(Table::SubjectSource, "source"),
            lab = part(Table::SubjectLab, "lab"),
            subject = self.table(Table::Subject),
        );
        let mut rows = self.conn().query(&sql, ()).await?;
        let mut parts = Vec::new();
        while let Some(row) = rows.next().await? {
            let part = SubjectPart {
                subject: row.get::<String>(0)?,
                protocol: get_opt_string(&row, 1)?,
                user: get_opt_string(&row, 2)?,
                line: get_opt_string(&row, 3)?,
                strain: get_opt_string(&row, 4)?,
                source: get_opt_string(&row, 5)?,
                lab: get_opt_string(&row, 6)?,
            };
            let attached = [
                &part.protocol,
                &part.user,
                &part.line,
                &part.strain,
                &part.source,
                &part.lab,
            ]
            .iter()
            .any(|value| value.is_some());
            if attached {
                parts.push(part);
            }
        }
        Ok(parts)
    }
}

fn row_to_subject(row: &libsql::Row) -> Result<Subject, DatabaseError> {
    Ok(Subject {
        subject: row.get::<String>(0)?,
        sex: parse_sex(&row.get::<String>(1)?)?,
        subject_birth_date: parse_datetime(&row.get::<String>(2)?)?,
        subject_description: row.get::<String>(3)?,
        death_date: parse_optional_datetime(get_opt_string(row, 4)?.as_deref())?,
        cull_method: get_opt_string(row, 5)?,
    })
}
