//! # wf-config
//!
//! Layered configuration loading for the workflow-session pipeline using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Dedicated override variables: `DJ_HOST`, `DJ_PASS`, `DJ_USER`, `DATABASE_PREFIX`
//! 2. Prefixed environment variables (`WF_*` prefix, `__` as separator)
//! 3. Local `dj_local_conf.json` in the working root
//! 4. Built-in defaults
//!
//! A dedicated override only applies when the variable is set *and* non-empty;
//! otherwise the value from the lower layers is kept.
//!
//! # Environment Variable Mapping
//!
//! Figment maps `WF_FIXTURES__VERBOSE` -> `fixtures.verbose`,
//! `WF_DATABASE__HOST` -> `database.host`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use wf_config::PipelineConfig;
//!
//! // Before each test: load, apply env overrides, disable safemode.
//! let config = PipelineConfig::load_for_tests().expect("config");
//! assert!(!config.safemode);
//! ```

mod custom;
mod database;
mod error;
mod fixtures;

pub use custom::CustomConfig;
pub use database::{DatabaseConfig, DatabaseTarget, MEMORY_HOST};
pub use error::ConfigError;
pub use fixtures::FixtureSettings;

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional local override file.
pub const LOCAL_CONFIG_FILE: &str = "dj_local_conf.json";

/// Directories checked for `.env` from a starting point: itself, `crates/`,
/// then the workspace root.
const DOTENV_SEARCH_DEPTH: usize = 3;

/// Environment variables that override a single config field each.
pub const ENV_OVERRIDES: [(&str, ConfigField); 4] = [
    ("DJ_HOST", ConfigField::DatabaseHost),
    ("DJ_PASS", ConfigField::DatabasePassword),
    ("DJ_USER", ConfigField::DatabaseUser),
    ("DATABASE_PREFIX", ConfigField::DatabasePrefix),
];

/// Fields reachable through [`ENV_OVERRIDES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    DatabaseHost,
    DatabasePassword,
    DatabaseUser,
    DatabasePrefix,
}

const fn default_safemode() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    /// When set, destructive deletes ask for confirmation first.
    #[serde(default = "default_safemode")]
    pub safemode: bool,

    #[serde(default)]
    pub custom: CustomConfig,

    #[serde(default)]
    pub fixtures: FixtureSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            safemode: default_safemode(),
            custom: CustomConfig::default(),
            fixtures: FixtureSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from the current directory and the environment.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the local file is malformed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_in(Path::new("."))
    }

    /// Load configuration, looking for the local file under `root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the local file is malformed or a value is invalid.
    pub fn load_in(root: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = Self::figment_in(root).extract()?;
        config.apply_env_overrides(|var| std::env::var(var).ok());
        config.validate()?;
        Ok(config)
    }

    /// The per-test entry point: load everything, then force safemode off so
    /// teardown can delete without confirmation.
    ///
    /// Re-running with the same files and environment yields the same value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading fails.
    pub fn load_for_tests() -> Result<Self, ConfigError> {
        Self::load_for_tests_in(Path::new("."))
    }

    /// [`Self::load_for_tests`] with an explicit root for the local file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading fails.
    pub fn load_for_tests_in(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_in(root)?;
        config.safemode = false;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// The nearest `.env` file (the working directory, then up to the
    /// workspace root) is loaded into the environment before reading it, so
    /// `DJ_HOST` and friends can live in a checked-out `.env`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_with_dotenv_in(Path::new("."))
    }

    /// [`Self::load_with_dotenv`] with an explicit root. The `.env` search
    /// starts at `root` and the local file is looked up under it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading fails.
    pub fn load_with_dotenv_in(root: &Path) -> Result<Self, ConfigError> {
        if Self::load_dotenv_near(root).is_none() {
            tracing::debug!(root = %root.display(), "no .env found");
        }
        Self::load_in(root)
    }

    /// Build the figment provider chain for files and prefixed env vars.
    ///
    /// The dedicated `DJ_*` overrides are applied after extraction, see
    /// [`Self::apply_env_overrides`].
    pub fn figment_in(root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let local_path = root.join(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            tracing::debug!(path = %local_path.display(), "loading local config");
            figment = figment.merge(Json::file(local_path));
        }

        figment.merge(Env::prefixed("WF_").split("__"))
    }

    /// Apply the dedicated override variables.
    ///
    /// `lookup` resolves a variable name to its value. Unset and empty
    /// variables leave the current value untouched.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (var, field) in ENV_OVERRIDES {
            let Some(value) = lookup(var).filter(|v| !v.is_empty()) else {
                continue;
            };
            tracing::debug!(var, ?field, "applying environment override");
            match field {
                ConfigField::DatabaseHost => self.database.host = value,
                ConfigField::DatabasePassword => self.database.password = value,
                ConfigField::DatabaseUser => self.database.user = value,
                ConfigField::DatabasePrefix => self.custom.database_prefix = value,
            }
        }
    }

    /// Check values that figment cannot check by type alone.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a bad table prefix or an empty
    /// fixture data directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.custom.validate()?;
        if self.fixtures.data_dir.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "fixtures.data_dir".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Find the nearest `.env` at or above `start`, then at or above
    /// `CARGO_MANIFEST_DIR`, and load it into the process environment.
    ///
    /// Variables already set in the environment are left as they are.
    /// Returns the file that was loaded, if any.
    fn load_dotenv_near(start: &Path) -> Option<PathBuf> {
        let manifest_dir = std::env::var_os("CARGO_MANIFEST_DIR").map(PathBuf::from);
        let path = std::iter::once(start)
            .chain(manifest_dir.as_deref())
            .flat_map(|dir| dir.ancestors().take(DOTENV_SEARCH_DEPTH))
            .map(|dir| dir.join(".env"))
            .find(|candidate| candidate.is_file())?;

        match dotenvy::from_path(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(error) => tracing::warn!(path = %path.display(), %error, "ignoring unreadable .env"),
        }
        Some(path)
    }
}
