//! Each CSV node writes its literal content and removes it on teardown.

use std::fs;

use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use wf_config::PipelineConfig;
use wf_core::output::OutputSink;
use wf_fixtures::{CsvFixture, Harness};

struct Workspace {
    _root: TempDir,
    harness: Harness,
}

#[fixture]
fn workspace() -> Workspace {
    let root = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        safemode: false,
        ..PipelineConfig::default()
    };
    let harness = Harness::new(config, root.path()).unwrap();
    Workspace {
        _root: root,
        harness,
    }
}

#[rstest]
#[case(CsvFixture::Labs, "lab/labs.csv", 3)]
#[case(CsvFixture::Projects, "lab/projects.csv", 3)]
#[case(CsvFixture::ProjectUsers, "lab/project_users.csv", 6)]
#[case(CsvFixture::Publications, "lab/publications.csv", 3)]
#[case(CsvFixture::Keywords, "lab/keywords.csv", 4)]
#[case(CsvFixture::Protocols, "lab/protocols.csv", 3)]
#[case(CsvFixture::Users, "lab/users.csv", 6)]
#[case(CsvFixture::Subjects, "subject/subjects.csv", 4)]
#[case(CsvFixture::SubjectParts, "subject/subjects_part.csv", 3)]
#[case(CsvFixture::Sessions, "session/sessions.csv", 4)]
#[tokio::test]
async fn csv_node_writes_then_removes_file(
    workspace: Workspace,
    #[case] fixture: CsvFixture,
    #[case] relative: &str,
    #[case] lines: usize,
) {
    let harness = &workspace.harness;
    let active = harness
        .setup_with_output(&[fixture.node_name()], OutputSink::discard())
        .await
        .unwrap();

    let written = active.csv(fixture).unwrap();
    assert_eq!(written.path, harness.data_dir().join(relative));
    assert_eq!(written.content.len(), lines);

    let mut expected = fixture.content().join("\n");
    expected.push('\n');
    assert_eq!(fs::read_to_string(&written.path).unwrap(), expected);

    let path = written.path.clone();
    active.teardown().await.unwrap();
    assert!(!path.exists());
}

#[rstest]
#[tokio::test]
async fn labs_csv_has_quoted_addresses(workspace: Workspace) {
    let active = workspace
        .harness
        .setup_with_output(&["lab_csv"], OutputSink::discard())
        .await
        .unwrap();
    let text = fs::read_to_string(&active.csv(CsvFixture::Labs).unwrap().path).unwrap();
    assert_eq!(
        text.lines().next(),
        Some("lab,lab_name,institution,address,time_zone,location,location_description")
    );
    assert!(text.contains("'221B Baker St,London NW1 6XE,UK'"));
    assert!(text.ends_with("imaginaryexperiments.'\n"));
    active.teardown().await.unwrap();
}

#[rstest]
#[tokio::test]
async fn file_removed_early_does_not_fail_teardown(workspace: Workspace) {
    let active = workspace
        .harness
        .setup_with_output(&["sessions_csv"], OutputSink::discard())
        .await
        .unwrap();
    fs::remove_file(&active.csv(CsvFixture::Sessions).unwrap().path).unwrap();
    active.teardown().await.unwrap();
}

#[rstest]
fn harness_creates_schema_directories(workspace: Workspace) {
    for dir in ["lab", "subject", "session"] {
        assert!(workspace.harness.data_dir().join(dir).is_dir());
    }
}
