//! Full fixture chains against a real database.

use std::fs;
use std::path::Path;

use figment::Jail;
use pretty_assertions::assert_eq;
use wf_config::PipelineConfig;
use wf_core::datetime;
use wf_core::enums::Table;
use wf_core::output::{Capture, OutputSink};
use wf_db::PipelineDb;
use wf_fixtures::logging::init_tracing;
use wf_fixtures::{CsvFixture, FixtureError, Harness};

fn test_config() -> PipelineConfig {
    init_tracing(false);
    PipelineConfig {
        safemode: false,
        ..PipelineConfig::default()
    }
}

#[tokio::test]
async fn ingest_lab_then_delete_removes_both_labs() {
    let root = tempfile::tempdir().unwrap();
    let harness = Harness::new(test_config(), root.path()).unwrap();
    let active = harness
        .setup_with_output(&["ingest_lab"], OutputSink::discard())
        .await
        .unwrap();
    let db = active.db().unwrap();

    let labs: Vec<String> = db.list_labs().await.unwrap().into_iter().map(|l| l.lab).collect();
    assert_eq!(labs, ["LabA", "LabB"]);
    assert_eq!(db.count(Table::ProjectUser).await.unwrap(), 5);
    assert_eq!(db.count(Table::User).await.unwrap(), 5);
    assert!(active.lab_ingested().is_some());
    assert!(active.subjects_ingested().is_none());

    let removed = db
        .delete_all(Table::Lab, &mut OutputSink::discard(), &|_: &str| false)
        .await
        .unwrap();
    assert!(removed >= 2);
    assert_eq!(db.count(Table::Lab).await.unwrap(), 0);

    active.teardown().await.unwrap();
}

#[tokio::test]
async fn ingest_sessions_produces_keyed_session() {
    let root = tempfile::tempdir().unwrap();
    let harness = Harness::new(test_config(), root.path()).unwrap();
    let active = harness
        .setup_with_output(&["ingest_sessions"], OutputSink::discard())
        .await
        .unwrap();
    let db = active.db().unwrap();

    let executed: Vec<&str> = active.executed().collect();
    let at = |name: &str| executed.iter().position(|n| *n == name).unwrap();
    assert!(at("ingest_lab") < at("ingest_subjects"));
    assert!(at("ingest_subjects") < at("ingest_sessions"));

    let dt = datetime::parse("2020-05-12 04:13:07").unwrap();
    let session = db.get_session("subject3", &dt).await.unwrap();
    assert_eq!(session.project.as_deref(), Some("ProjA"));
    assert_eq!(session.session_dir.as_deref(), Some("subject3\\session1"));
    assert_eq!(session.session_note.as_deref(), Some("Data collection notes"));
    assert_eq!(session.user.as_deref(), Some("User1"));
    assert_eq!(db.count(Table::Session).await.unwrap(), 3);
    assert_eq!(db.list_subject_parts().await.unwrap().len(), 2);

    active.teardown().await.unwrap();
}

#[tokio::test]
async fn teardown_deletes_rows_and_files() {
    let root = tempfile::tempdir().unwrap();
    let db_path = root.path().join("pipeline.db");
    let mut config = test_config();
    config.database.host = db_path.to_string_lossy().into_owned();
    let harness = Harness::new(config, root.path()).unwrap();

    let active = harness
        .setup_with_output(&["ingest_sessions"], OutputSink::discard())
        .await
        .unwrap();
    let paths: Vec<_> = active.written().iter().map(|w| w.path.clone()).collect();
    assert_eq!(paths.len(), CsvFixture::ALL.len());
    active.teardown().await.unwrap();

    assert!(paths.iter().all(|p| !p.exists()));
    let db = PipelineDb::open_local(&db_path.to_string_lossy(), "").await.unwrap();
    for table in [Table::Session, Table::Subject, Table::Lab, Table::SubjectLab] {
        assert_eq!(db.count(table).await.unwrap(), 0, "{table} should be empty");
    }
    // Projects and users are not owned by a lab.
    assert_eq!(db.count(Table::Project).await.unwrap(), 2);
}

#[tokio::test]
async fn tear_down_disabled_keeps_rows_but_removes_files() {
    let root = tempfile::tempdir().unwrap();
    let db_path = root.path().join("pipeline.db");
    let mut config = test_config();
    config.database.host = db_path.to_string_lossy().into_owned();
    config.fixtures.tear_down = false;
    let harness = Harness::new(config, root.path()).unwrap();

    let active = harness
        .setup_with_output(&["ingest_subjects"], OutputSink::discard())
        .await
        .unwrap();
    let labs_csv = active.csv(CsvFixture::Labs).unwrap().path.clone();
    active.teardown().await.unwrap();

    assert!(!labs_csv.exists());
    let db = PipelineDb::open_local(&db_path.to_string_lossy(), "").await.unwrap();
    assert_eq!(db.count(Table::Lab).await.unwrap(), 2);
    assert_eq!(db.count(Table::Subject).await.unwrap(), 3);
}

#[tokio::test]
async fn quiet_teardown_prints_nothing() {
    let root = tempfile::tempdir().unwrap();
    let harness = Harness::new(test_config(), root.path()).unwrap();
    let capture = Capture::default();

    let active = harness
        .setup_with_output(&["ingest_sessions"], OutputSink::from_writer(capture.clone()))
        .await
        .unwrap();
    active.teardown().await.unwrap();
    assert!(capture.is_empty(), "unexpected output: {}", capture.contents());
}

#[tokio::test]
async fn verbose_run_reports_inserts_and_deletes() {
    let root = tempfile::tempdir().unwrap();
    let mut config = test_config();
    config.fixtures.verbose = true;
    config.custom.database_prefix = "test_".into();
    let harness = Harness::new(config, root.path()).unwrap();
    let capture = Capture::default();

    let active = harness
        .setup_with_output(&["ingest_sessions"], OutputSink::from_writer(capture.clone()))
        .await
        .unwrap();
    assert!(capture
        .contents()
        .contains("2 of 2 new records inserted into `test_lab`"));
    active.teardown().await.unwrap();

    let text = capture.contents();
    assert!(text.contains("Deleting 3 rows from `test_session`"));
    assert!(text.contains("Deleting 3 rows from `test_subject`"));
    assert!(text.contains("Deleting 2 rows from `test_lab`"));
}

#[tokio::test]
async fn failed_setup_tears_down_earlier_nodes() {
    let root = tempfile::tempdir().unwrap();
    let harness = Harness::new(test_config(), root.path()).unwrap();
    fs::remove_dir_all(harness.data_dir().join("subject")).unwrap();

    let result = harness
        .setup_with_output(&["ingest_subjects"], OutputSink::discard())
        .await;
    match result {
        Err(FixtureError::Io(err)) => assert_eq!(err.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected an I/O error, got {other:?}"),
    }
    for fixture in [CsvFixture::Labs, CsvFixture::Users, CsvFixture::ProjectUsers] {
        assert!(!harness.csv_path(fixture).exists(), "{fixture} was left behind");
    }
}

#[tokio::test]
async fn harness_turns_safemode_off_so_teardown_never_prompts() {
    let root = tempfile::tempdir().unwrap();
    let db_path = root.path().join("pipeline.db");
    let mut config = test_config();
    config.database.host = db_path.to_string_lossy().into_owned();
    config.safemode = true;
    let harness = Harness::new(config, root.path()).unwrap();
    assert!(!harness.config().safemode);

    let active = harness
        .setup_with_output(&["ingest_lab"], OutputSink::discard())
        .await
        .unwrap();
    assert!(!active.db().unwrap().safemode());
    active.teardown().await.unwrap();

    let db = PipelineDb::open_local(&db_path.to_string_lossy(), "").await.unwrap();
    assert_eq!(db.count(Table::Lab).await.unwrap(), 0);
}

#[tokio::test]
async fn dropping_without_teardown_removes_written_csvs() {
    let root = tempfile::tempdir().unwrap();
    let harness = Harness::new(test_config(), root.path()).unwrap();
    let active = harness
        .setup_with_output(&["lab_csv", "lab_user_csv"], OutputSink::discard())
        .await
        .unwrap();
    let paths: Vec<_> = active.written().iter().map(|w| w.path.clone()).collect();
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|p| p.exists()));

    drop(active);
    for path in &paths {
        assert!(!path.exists(), "{} was left behind", path.display());
    }
}

#[tokio::test]
async fn panicking_test_body_still_cleans_up() {
    let root = tempfile::tempdir().unwrap();
    let harness = Harness::new(test_config(), root.path()).unwrap();
    let active = harness
        .setup_with_output(&["lab_csv"], OutputSink::discard())
        .await
        .unwrap();
    let path = harness.csv_path(CsvFixture::Labs);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let _active = active;
        panic!("assertion in a test body failed");
    }));
    assert!(result.is_err());
    assert!(!path.exists());
}

#[test]
fn harness_from_env_reads_local_file_and_overrides() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "dj_local_conf.json",
            r#"{ "safemode": true, "fixtures": { "data_dir": "fixtures_out" } }"#,
        )?;
        jail.set_env("DATABASE_PREFIX", "jail_");

        let harness = Harness::from_env(jail.directory()).map_err(|e| e.to_string())?;
        assert!(!harness.config().safemode);
        assert_eq!(harness.config().custom.database_prefix, "jail_");
        assert!(Path::new(jail.directory()).join("fixtures_out/session").is_dir());
        Ok(())
    });
}
