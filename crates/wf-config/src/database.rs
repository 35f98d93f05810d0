//! Database connection configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Host value selecting an in-memory database.
pub const MEMORY_HOST: &str = ":memory:";

/// Default host: a fresh in-memory database per connection.
fn default_host() -> String {
    MEMORY_HOST.to_string()
}

/// Default user recorded in connection logs.
fn default_user() -> String {
    "root".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Where the database lives: `:memory:`, a local file path, or a
    /// `libsql://` / `http(s)://` URL for a remote server.
    #[serde(default = "default_host")]
    pub host: String,

    /// User name. Only reported in logs; libSQL authenticates by token.
    #[serde(default = "default_user")]
    pub user: String,

    /// Password. For remote hosts this is sent as the auth token.
    #[serde(default)]
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            user: default_user(),
            password: String::new(),
        }
    }
}

/// Resolved connection target for a [`DatabaseConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Memory,
    LocalFile(PathBuf),
    Remote { url: String, auth_token: String },
}

impl DatabaseConfig {
    /// Check whether the host points at a remote server.
    pub fn is_remote(&self) -> bool {
        ["libsql://", "http://", "https://"]
            .iter()
            .any(|scheme| self.host.starts_with(scheme))
    }

    /// Decide how to connect based on the host value.
    pub fn target(&self) -> DatabaseTarget {
        let host = self.host.trim();
        if host.is_empty() || host == MEMORY_HOST {
            DatabaseTarget::Memory
        } else if self.is_remote() {
            DatabaseTarget::Remote {
                url: host.to_string(),
                auth_token: self.password.clone(),
            }
        } else {
            DatabaseTarget::LocalFile(PathBuf::from(host))
        }
    }
}
