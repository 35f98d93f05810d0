//! Pipeline-specific settings that live under the `custom` section.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CustomConfig {
    /// Prepended to every table name (e.g. `test_` gives `test_lab`).
    #[serde(default)]
    pub database_prefix: String,
}

impl CustomConfig {
    /// Reject prefixes that cannot be spliced into an SQL identifier.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the prefix contains anything
    /// other than ASCII letters, digits or underscores.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bad) = self
            .database_prefix
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(ConfigError::InvalidValue {
                field: "custom.database_prefix".into(),
                reason: format!("character '{bad}' is not allowed in a table prefix"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prefix_is_valid() {
        assert!(CustomConfig::default().validate().is_ok());
    }

    #[test]
    fn underscore_prefix_is_valid() {
        let custom = CustomConfig {
            database_prefix: "test_wf_".into(),
        };
        assert!(custom.validate().is_ok());
    }

    #[test]
    fn quote_in_prefix_is_rejected() {
        let custom = CustomConfig {
            database_prefix: "x\"; DROP".into(),
        };
        assert!(matches!(
            custom.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
