//! Settings for the fixture harness.

use serde::{Deserialize, Serialize};

/// Default directory (relative to the fixture root) for generated CSVs.
fn default_data_dir() -> String {
    "tests/user_data".to_string()
}

const fn default_tear_down() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FixtureSettings {
    /// Whether the pipeline fixture deletes ingested rows on teardown.
    #[serde(default = "default_tear_down")]
    pub tear_down: bool,

    /// Print ingestion/delete progress instead of silencing it.
    #[serde(default)]
    pub verbose: bool,

    /// Root of the `{lab,subject,session}` CSV directories.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for FixtureSettings {
    fn default() -> Self {
        Self {
            tear_down: default_tear_down(),
            verbose: false,
            data_dir: default_data_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let settings = FixtureSettings::default();
        assert!(settings.tear_down);
        assert!(!settings.verbose);
        assert_eq!(settings.data_dir, "tests/user_data");
    }
}
