use serde::{Deserialize, Serialize};

/// A lab, together with its primary location. Keyed by `lab`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lab {
    pub lab: String,
    pub lab_name: String,
    pub institution: String,
    pub address: String,
    pub time_zone: String,
    pub location: String,
    #[serde(default)]
    pub location_description: String,
}

/// A research project and where its code lives. Keyed by `project`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub project: String,
    pub project_description: String,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub repository_name: Option<String>,
    #[serde(default)]
    pub codeurl: Option<String>,
}

/// Many-to-many link between users and projects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProjectUser {
    pub user: String,
    pub project: String,
}

/// Many-to-many link between projects and publication identifiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Publication {
    pub project: String,
    pub publication: String,
}

/// Many-to-many link between projects and keywords.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Keyword {
    pub project: String,
    pub keyword: String,
}

/// An approved experimental protocol. Keyed by `protocol`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Protocol {
    pub protocol: String,
    pub protocol_type: String,
    #[serde(default)]
    pub protocol_description: String,
}

/// A lab member. Identity is the `(lab, user)` membership.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub lab: String,
    pub user: String,
    pub user_role: String,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_cellphone: Option<String>,
}
