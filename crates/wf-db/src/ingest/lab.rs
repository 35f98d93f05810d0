//! Lab ingestion: labs, projects, protocols, users and their links.

use std::collections::BTreeSet;

use wf_core::entities::{Keyword, Lab, Project, ProjectUser, Protocol, Publication, User};
use wf_core::enums::Table;
use wf_core::output::OutputSink;

use super::{InsertTally, LabCsvPaths, LabIngested, insert, insert_sql};
use crate::PipelineDb;
use crate::csv_source::read_rows;
use crate::error::DatabaseError;

/// Ingest the lab-level CSVs.
///
/// All files are read before anything is written, so a missing file leaves
/// the database untouched.
///
/// # Errors
///
/// Returns `DatabaseError` if a file cannot be read or parsed, a row violates
/// a constraint, or writing a progress line fails.
pub async fn ingest_lab(
    db: &PipelineDb,
    paths: &LabCsvPaths,
    verbose: bool,
    out: &mut OutputSink,
) -> Result<LabIngested, DatabaseError> {
    let labs: Vec<Lab> = read_rows(&paths.lab_csv_path)?;
    let projects: Vec<Project> = read_rows(&paths.project_csv_path)?;
    let publications: Vec<Publication> = read_rows(&paths.publication_csv_path)?;
    let keywords: Vec<Keyword> = read_rows(&paths.keyword_csv_path)?;
    let protocols: Vec<Protocol> = read_rows(&paths.protocol_csv_path)?;
    let users: Vec<User> = read_rows(&paths.users_csv_path)?;
    let project_users: Vec<ProjectUser> = read_rows(&paths.project_user_csv_path)?;

    let tx = db.conn().transaction().await?;
    let mut tally = InsertTally::default();

    let sql = insert_sql(
        db,
        Table::Lab,
        &["lab", "lab_name", "institution", "address", "time_zone"],
    );
    let location_sql = insert_sql(
        db,
        Table::Location,
        &["lab", "location", "location_description"],
    );
    for lab in &labs {
        insert(
            &tx,
            &mut tally,
            Table::Lab,
            &sql,
            libsql::params![
                lab.lab.as_str(),
                lab.lab_name.as_str(),
                lab.institution.as_str(),
                lab.address.as_str(),
                lab.time_zone.as_str()
            ],
        )
        .await?;
        insert(
            &tx,
            &mut tally,
            Table::Location,
            &location_sql,
            libsql::params![
                lab.lab.as_str(),
                lab.location.as_str(),
                lab.location_description.as_str()
            ],
        )
        .await?;
    }

    let sql = insert_sql(
        db,
        Table::Project,
        &[
            "project",
            "project_description",
            "repository_url",
            "repository_name",
            "codeurl",
        ],
    );
    for project in &projects {
        insert(
            &tx,
            &mut tally,
            Table::Project,
            &sql,
            libsql::params![
                project.project.as_str(),
                project.project_description.as_str(),
                project.repository_url.as_deref(),
                project.repository_name.as_deref(),
                project.codeurl.as_deref()
            ],
        )
        .await?;
    }

    let sql = insert_sql(db, Table::ProjectKeyword, &["project", "keyword"]);
    for keyword in &keywords {
        insert(
            &tx,
            &mut tally,
            Table::ProjectKeyword,
            &sql,
            libsql::params![keyword.project.as_str(), keyword.keyword.as_str()],
        )
        .await?;
    }

    let sql = insert_sql(db, Table::ProjectPublication, &["project", "publication"]);
    for publication in &publications {
        insert(
            &tx,
            &mut tally,
            Table::ProjectPublication,
            &sql,
            libsql::params![
                publication.project.as_str(),
                publication.publication.as_str()
            ],
        )
        .await?;
    }

    let protocol_types: BTreeSet<&str> =
        protocols.iter().map(|p| p.protocol_type.as_str()).collect();
    let sql = insert_sql(db, Table::ProtocolType, &["protocol_type"]);
    for protocol_type in protocol_types {
        insert(&tx, &mut tally, Table::ProtocolType, &sql, [protocol_type]).await?;
    }

    let sql = insert_sql(
        db,
        Table::Protocol,
        &["protocol", "protocol_type", "protocol_description"],
    );
    for protocol in &protocols {
        insert(
            &tx,
            &mut tally,
            Table::Protocol,
            &sql,
            libsql::params![
                protocol.protocol.as_str(),
                protocol.protocol_type.as_str(),
                protocol.protocol_description.as_str()
            ],
        )
        .await?;
    }

    // Names are shared across labs; contact details live on the membership.
    let names: BTreeSet<&str> = users.iter().map(|u| u.user.as_str()).collect();
    let sql = insert_sql(db, Table::User, &["user"]);
    for name in names {
        insert(&tx, &mut tally, Table::User, &sql, [name]).await?;
    }

    let roles: BTreeSet<&str> = users.iter().map(|u| u.user_role.as_str()).collect();
    let sql = insert_sql(db, Table::UserRole, &["user_role"]);
    for role in roles {
        insert(&tx, &mut tally, Table::UserRole, &sql, [role]).await?;
    }

    let sql = insert_sql(
        db,
        Table::LabMembership,
        &["lab", "user", "user_role", "user_email", "user_cellphone"],
    );
    for user in &users {
        insert(
            &tx,
            &mut tally,
            Table::LabMembership,
            &sql,
            libsql::params![
                user.lab.as_str(),
                user.user.as_str(),
                user.user_role.as_str(),
                user.user_email.as_deref(),
                user.user_cellphone.as_deref()
            ],
        )
        .await?;
    }

    let sql = insert_sql(db, Table::ProjectUser, &["project", "user"]);
    for link in &project_users {
        insert(
            &tx,
            &mut tally,
            Table::ProjectUser,
            &sql,
            libsql::params![link.project.as_str(), link.user.as_str()],
        )
        .await?;
    }

    tx.commit().await?;
    tracing::info!(
        labs = labs.len(),
        inserted = tally.total_inserted(),
        "lab ingestion complete"
    );
    tally.report(db, verbose, out)?;
    Ok(LabIngested {
        db_id: db.id(),
        tally,
    })
}
