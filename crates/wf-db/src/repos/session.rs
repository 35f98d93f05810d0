//! Session-schema reads.

use chrono::NaiveDateTime;
use wf_core::datetime;
use wf_core::entities::Session;
use wf_core::enums::Table;

use crate::PipelineDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};

impl PipelineDb {
    fn session_select(&self) -> String {
        let part = |table: Table, column: &str| {
            format!(
                "(SELECT MIN({column}) FROM {t} p
                  WHERE p.subject = s.subject AND p.session_datetime = s.session_datetime)",
                t = self.table(table)
            )
        };
        format!(
            "SELECT s.subject, {project}, s.session_datetime, {dir}, {note}, {user}
             FROM {session} s",
            project = part(Table::SessionProject, "project"),
            dir = part(Table::SessionDirectory, "session_dir"),
            note = part(Table::SessionNote, "session_note"),
            user = part(Table::SessionExperimenter, "user"),
            session = self.table(Table::Session),
        )
    }

    /// All sessions with their parts, ordered by subject then datetime.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a stored datetime cannot
    /// be parsed.
    pub async fn list_sessions(&self) -> Result<Vec<Session>, DatabaseError> {
        let sql = format!(
            "{} ORDER BY s.subject, s.session_datetime",
            self.session_select()
        );
        let mut rows = self.conn().query(&sql, ()).await?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next().await? {
            sessions.push(row_to_session(&row)?);
        }
        Ok(sessions)
    }

    /// Fetch one session by its `(subject, session_datetime)` key.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no such session exists.
    pub async fn get_session(
        &self,
        subject: &str,
        session_datetime: &NaiveDateTime,
    ) -> Result<Session, DatabaseError> {
        let sql = format!(
            "{} WHERE s.subject = ?1 AND s.session_datetime = ?2",
            self.session_select()
        );
        let mut rows = self
            .conn()
            .query(&sql, (subject, datetime::format(session_datetime)))
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_session(&row)
    }
}

fn row_to_session(row: &libsql::Row) -> Result<Session, DatabaseError> {
    Ok(Session {
        subject: row.get::<String>(0)?,
        project: get_opt_string(row, 1)?,
        session_datetime: parse_datetime(&row.get::<String>(2)?)?,
        session_dir: get_opt_string(row, 3)?,
        session_note: get_opt_string(row, 4)?,
        user: get_opt_string(row, 5)?,
    })
}
