//! Integration tests for `dj_local_conf.json` loading.
//!
//! Uses figment::Jail for sandboxed cwd and env var manipulation.

use figment::Jail;
use pretty_assertions::assert_eq;
use wf_config::{DatabaseTarget, PipelineConfig};

#[test]
fn loads_local_file_over_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "dj_local_conf.json",
            r#"{
                "database": { "host": "./pipeline.db", "user": "lab_admin", "password": "pw" },
                "safemode": true,
                "custom": { "database_prefix": "test_" }
            }"#,
        )?;

        let config = PipelineConfig::load().expect("config loads");
        assert_eq!(config.database.host, "./pipeline.db");
        assert_eq!(config.database.user, "lab_admin");
        assert_eq!(config.database.password, "pw");
        assert_eq!(config.custom.database_prefix, "test_");
        assert!(config.safemode);
        assert!(matches!(config.database.target(), DatabaseTarget::LocalFile(_)));
        Ok(())
    });
}

#[test]
fn partial_file_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("dj_local_conf.json", r#"{ "fixtures": { "verbose": true } }"#)?;

        let config = PipelineConfig::load().expect("config loads");
        assert!(config.fixtures.verbose);
        assert!(config.fixtures.tear_down);
        assert!(config.safemode);
        Ok(())
    });
}

#[test]
fn missing_file_means_defaults() {
    Jail::expect_with(|_jail| {
        let config = PipelineConfig::load().expect("config loads");
        assert_eq!(config.fixtures, PipelineConfig::default().fixtures);
        Ok(())
    });
}

#[test]
fn load_for_tests_disables_safemode() {
    Jail::expect_with(|jail| {
        jail.create_file("dj_local_conf.json", r#"{ "safemode": true }"#)?;

        let config = PipelineConfig::load_for_tests().expect("config loads");
        assert!(!config.safemode);
        Ok(())
    });
}

#[test]
fn load_for_tests_in_explicit_root() {
    Jail::expect_with(|jail| {
        std::fs::create_dir(jail.directory().join("project")).expect("project dir");
        jail.create_file(
            "project/dj_local_conf.json",
            r#"{ "custom": { "database_prefix": "rooted_" } }"#,
        )?;

        let config = PipelineConfig::load_for_tests_in(&jail.directory().join("project"))
            .expect("config loads");
        assert_eq!(config.custom.database_prefix, "rooted_");
        Ok(())
    });
}

#[test]
fn malformed_file_is_an_error() {
    Jail::expect_with(|jail| {
        jail.create_file("dj_local_conf.json", "{ not json")?;
        assert!(PipelineConfig::load().is_err());
        Ok(())
    });
}

#[test]
fn invalid_prefix_in_file_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "dj_local_conf.json",
            r#"{ "custom": { "database_prefix": "bad-prefix" } }"#,
        )?;
        assert!(PipelineConfig::load().is_err());
        Ok(())
    });
}
