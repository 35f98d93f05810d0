//! Lab-schema reads: labs, projects, protocols, users and their links.

use wf_core::entities::{Keyword, Lab, Project, ProjectUser, Protocol, Publication, User};
use wf_core::enums::Table;

use crate::PipelineDb;
use crate::error::DatabaseError;
use crate::helpers::get_opt_string;

impl PipelineDb {
    /// All labs, one row per `(lab, location)`, ordered by lab then location.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_labs(&self) -> Result<Vec<Lab>, DatabaseError> {
        let sql = format!(
            "SELECT l.lab, l.lab_name, l.institution, l.address, l.time_zone,
                    loc.location, loc.location_description
             FROM {lab} l LEFT JOIN {location} loc ON loc.lab = l.lab
             ORDER BY l.lab, loc.location",
            lab = self.table(Table::Lab),
            location = self.table(Table::Location),
        );
        let mut rows = self.conn().query(&sql, ()).await?;
        let mut labs = Vec::new();
        while let Some(row) = rows.next().await? {
            labs.push(Lab {
                lab: row.get::<String>(0)?,
                lab_name: row.get::<String>(1)?,
                institution: row.get::<String>(2)?,
                address: row.get::<String>(3)?,
                time_zone: row.get::<String>(4)?,
                location: get_opt_string(&row, 5)?.unwrap_or_default(),
                location_description: get_opt_string(&row, 6)?.unwrap_or_default(),
            });
        }
        Ok(labs)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        let sql = format!(
            "SELECT project, project_description, repository_url, repository_name, codeurl
             FROM {} ORDER BY project",
            self.table(Table::Project)
        );
        let mut rows = self.conn().query(&sql, ()).await?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(Project {
                project: row.get::<String>(0)?,
                project_description: row.get::<String>(1)?,
                repository_url: get_opt_string(&row, 2)?,
                repository_name: get_opt_string(&row, 3)?,
                codeurl: get_opt_string(&row, 4)?,
            });
        }
        Ok(projects)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_keywords(&self) -> Result<Vec<Keyword>, DatabaseError> {
        let sql = format!(
            "SELECT project, keyword FROM {} ORDER BY project, keyword",
            self.table(Table::ProjectKeyword)
        );
        let mut rows = self.conn().query(&sql, ()).await?;
        let mut keywords = Vec::new();
        while let Some(row) = rows.next().await? {
            keywords.push(Keyword {
                project: row.get::<String>(0)?,
                keyword: row.get::<String>(1)?,
            });
        }
        Ok(keywords)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_publications(&self) -> Result<Vec<Publication>, DatabaseError> {
        let sql = format!(
            "SELECT project, publication FROM {} ORDER BY project, publication",
            self.table(Table::ProjectPublication)
        );
        let mut rows = self.conn().query(&sql, ()).await?;
        let mut publications = Vec::new();
        while let Some(row) = rows.next().await? {
            publications.push(Publication {
                project: row.get::<String>(0)?,
                publication: row.get::<String>(1)?,
            });
        }
        Ok(publications)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_protocols(&self) -> Result<Vec<Protocol>, DatabaseError> {
        let sql = format!(
            "SELECT protocol, protocol_type, protocol_description FROM {} ORDER BY protocol",
            self.table(Table::Protocol)
        );
        let mut rows = self.conn().query(&sql, ()).await?;
        let mut protocols = Vec::new();
        while let Some(row) = rows.next().await? {
            protocols.push(Protocol {
                protocol: row.get::<String>(0)?,
                protocol_type: row.get::<String>(1)?,
                protocol_description: row.get::<String>(2)?,
            });
        }
        Ok(protocols)
    }

    /// Lab members with their role and contact details, ordered by user.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!(
            "SELECT lab, user, user_role, user_email, user_cellphone
             FROM {membership}
             ORDER BY user, lab",
            membership = self.table(Table::LabMembership),
        );
        let mut rows = self.conn().query(&sql, ()).await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(User {
                lab: row.get::<String>(0)?,
                user: row.get::<String>(1)?,
                user_role: row.get::<String>(2)?,
                user_email: get_opt_string(&row, 3)?,
                user_cellphone: get_opt_string(&row, 4)?,
            });
        }
        Ok(users)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_project_users(&self) -> Result<Vec<ProjectUser>, DatabaseError> {
        let sql = format!(
            "SELECT user, project FROM {} ORDER BY project, user",
            self.table(Table::ProjectUser)
        );
        let mut rows = self.conn().query(&sql, ()).await?;
        let mut links = Vec::new();
        while let Some(row) = rows.next().await? {
            links.push(ProjectUser {
                user: row.get::<String>(0)?,
                project: row.get::<String>(1)?,
            });
        }
        Ok(links)
    }
}
