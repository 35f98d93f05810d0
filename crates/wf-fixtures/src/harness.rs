//! Runs the fixture graph: setup in plan order, teardown in reverse.

use std::fs;
use std::io;
use std::fmt;
use std::path::PathBuf;

use wf_config::{FixtureSettings, PipelineConfig};
use wf_core::enums::{Schema, Table};
use wf_core::output::OutputSink;
use wf_db::PipelineDb;
use wf_db::delete::Confirm;
use wf_db::ingest::{
    LabCsvPaths, LabIngested, SessionCsvPaths, SessionsIngested, SubjectCsvPaths,
    SubjectsIngested, ingest_lab, ingest_sessions, ingest_subjects,
};

use crate::catalog::CsvFixture;
use crate::csv_writer::write_csv;
use crate::error::FixtureError;
use crate::graph::FixtureGraph;
use crate::node::{FixtureAction, FixtureNode, IngestStep, PIPELINE};

/// Order in which the pipeline node deletes rows on teardown.
pub const TEARDOWN_TABLES: [Table; 3] = [Table::Session, Table::Subject, Table::Lab];

/// Owns the configuration, the fixture root and the graph to run.
#[derive(Debug)]
pub struct Harness {
    config: PipelineConfig,
    root: PathBuf,
    graph: FixtureGraph,
}

impl Harness {
    /// Harness over the standard graph. Creates the `lab`, `subject` and
    /// `session` directories under `root/<data_dir>` if absent.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Io` if a directory cannot be created.
    pub fn new(config: PipelineConfig, root: impl Into<PathBuf>) -> Result<Self, FixtureError> {
        Self::with_graph(config, root, FixtureGraph::standard()?)
    }

    /// Load the test configuration from `root` and the environment, then
    /// build a harness over the standard graph.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Config` if loading fails, or any error of
    /// [`Self::new`].
    pub fn from_env(root: impl Into<PathBuf>) -> Result<Self, FixtureError> {
        let root = root.into();
        let config = PipelineConfig::load_for_tests_in(&root)?;
        Self::new(config, root)
    }

    /// Harness over an arbitrary graph. Safemode is always turned off:
    /// teardown deletes without asking.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Io` if a data directory cannot be created.
    pub fn with_graph(
        mut config: PipelineConfig,
        root: impl Into<PathBuf>,
        graph: FixtureGraph,
    ) -> Result<Self, FixtureError> {
        if config.safemode {
            tracing::debug!("disabling safemode for fixture runs");
            config.safemode = false;
        }
        let harness = Self {
            config,
            root: root.into(),
            graph,
        };
        for schema in [Schema::Lab, Schema::Subject, Schema::Session] {
            fs::create_dir_all(harness.data_dir().join(schema.as_str()))?;
        }
        Ok(harness)
    }

    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[must_use]
    pub const fn graph(&self) -> &FixtureGraph {
        &self.graph
    }

    /// `root/<data_dir>`.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(&self.config.fixtures.data_dir)
    }

    /// Where a CSV fixture is written.
    #[must_use]
    pub fn csv_path(&self, fixture: CsvFixture) -> PathBuf {
        self.data_dir().join(fixture.relative_path())
    }

    /// Set up `targets` and everything they require, printing progress to
    /// stdout.
    ///
    /// # Errors
    ///
    /// See [`Self::setup_with_output`].
    pub async fn setup(&self, targets: &[&str]) -> Result<ActiveFixtures, FixtureError> {
        self.setup_with_output(targets, OutputSink::stdout()).await
    }

    /// Set up `targets` and everything they require, in plan order.
    ///
    /// If a node fails, the nodes already set up are torn down in reverse
    /// and the original error is returned.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::UnknownTarget` for a name not in the graph, or
    /// the first error raised by a node's setup.
    pub async fn setup_with_output(
        &self,
        targets: &[&str],
        out: OutputSink,
    ) -> Result<ActiveFixtures, FixtureError> {
        let plan = self.graph.plan(targets)?;
        let mut active = ActiveFixtures::new(self.config.fixtures.clone(), out);

        for node in plan {
            tracing::debug!(fixture = %node.name, "setting up fixture");
            if let Err(err) = active.set_up(self, node).await {
                tracing::warn!(fixture = %node.name, error = %err, "fixture setup failed");
                if let Err(teardown_err) = active.teardown().await {
                    tracing::warn!(error = %teardown_err, "teardown after failed setup also failed");
                }
                return Err(err);
            }
        }
        Ok(active)
    }
}

/// A CSV written during setup: its literal content and where it went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenCsv {
    pub fixture: CsvFixture,
    pub content: &'static [&'static str],
    pub path: PathBuf,
}

/// Everything set up by [`Harness::setup`]. Call [`Self::teardown`] when done.
///
/// Dropping it without a teardown (a panicking test, say) still removes the
/// CSVs it wrote. Ingested rows stay until the next teardown of the tables.
pub struct ActiveFixtures {
    settings: FixtureSettings,
    out: OutputSink,
    db: Option<PipelineDb>,
    written: Vec<WrittenCsv>,
    executed: Vec<(String, FixtureAction)>,
    lab: Option<LabIngested>,
    subjects: Option<SubjectsIngested>,
    sessions: Option<SessionsIngested>,
}

impl fmt::Debug for ActiveFixtures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveFixtures")
            .field("settings", &self.settings)
            .field("executed", &self.executed)
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}

impl ActiveFixtures {
    fn new(settings: FixtureSettings, out: OutputSink) -> Self {
        Self {
            settings,
            out,
            db: None,
            written: Vec::new(),
            executed: Vec::new(),
            lab: None,
            subjects: None,
            sessions: None,
        }
    }

    async fn set_up(&mut self, harness: &Harness, node: &FixtureNode) -> Result<(), FixtureError> {
        match node.action {
            FixtureAction::Pipeline => {
                self.db = Some(PipelineDb::connect(&harness.config).await?);
            }
            FixtureAction::WriteCsv(fixture) => {
                let path = harness.csv_path(fixture);
                let content = fixture.content();
                write_csv(content, &path)?;
                self.written.push(WrittenCsv {
                    fixture,
                    content,
                    path,
                });
            }
            FixtureAction::Ingest(step) => self.ingest(step).await?,
        }
        self.executed.push((node.name.clone(), node.action));
        Ok(())
    }

    async fn ingest(&mut self, step: IngestStep) -> Result<(), FixtureError> {
        let verbose = self.settings.verbose;
        let db = self.db.as_ref().ok_or(FixtureError::NotSetUp(PIPELINE))?;
        match step {
            IngestStep::Lab => {
                let paths = LabCsvPaths {
                    lab_csv_path: self.require_csv(CsvFixture::Labs)?,
                    project_csv_path: self.require_csv(CsvFixture::Projects)?,
                    publication_csv_path: self.require_csv(CsvFixture::Publications)?,
                    keyword_csv_path: self.require_csv(CsvFixture::Keywords)?,
                    protocol_csv_path: self.require_csv(CsvFixture::Protocols)?,
                    users_csv_path: self.require_csv(CsvFixture::Users)?,
                    project_user_csv_path: self.require_csv(CsvFixture::ProjectUsers)?,
                };
                self.lab = Some(ingest_lab(db, &paths, verbose, &mut self.out).await?);
            }
            IngestStep::Subjects => {
                let lab = self
                    .lab
                    .as_ref()
                    .ok_or(FixtureError::NotSetUp(IngestStep::Lab.node_name()))?;
                let paths = SubjectCsvPaths {
                    subject_csv_path: self.require_csv(CsvFixture::Subjects)?,
                    subject_part_csv_path: self.require_csv(CsvFixture::SubjectParts)?,
                };
                self.subjects =
                    Some(ingest_subjects(db, lab, &paths, verbose, &mut self.out).await?);
            }
            IngestStep::Sessions => {
                let subjects = self
                    .subjects
                    .as_ref()
                    .ok_or(FixtureError::NotSetUp(IngestStep::Subjects.node_name()))?;
                let paths = SessionCsvPaths {
                    session_csv_path: self.require_csv(CsvFixture::Sessions)?,
                };
                self.sessions =
                    Some(ingest_sessions(db, subjects, &paths, verbose, &mut self.out).await?);
            }
        }
        Ok(())
    }

    fn require_csv(&self, fixture: CsvFixture) -> Result<PathBuf, FixtureError> {
        self.csv(fixture)
            .map(|written| written.path.clone())
            .ok_or(FixtureError::NotSetUp(fixture.node_name()))
    }

    /// The open database, if the pipeline node ran.
    #[must_use]
    pub const fn db(&self) -> Option<&PipelineDb> {
        self.db.as_ref()
    }

    /// The written CSV for `fixture`, if its node ran.
    #[must_use]
    pub fn csv(&self, fixture: CsvFixture) -> Option<&WrittenCsv> {
        self.written.iter().find(|w| w.fixture == fixture)
    }

    /// All CSVs written so far, in setup order.
    #[must_use]
    pub fn written(&self) -> &[WrittenCsv] {
        &self.written
    }

    /// Names of the nodes set up so far, in setup order.
    pub fn executed(&self) -> impl Iterator<Item = &str> {
        self.executed.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub const fn lab_ingested(&self) -> Option<&LabIngested> {
        self.lab.as_ref()
    }

    #[must_use]
    pub const fn subjects_ingested(&self) -> Option<&SubjectsIngested> {
        self.subjects.as_ref()
    }

    #[must_use]
    pub const fn sessions_ingested(&self) -> Option<&SessionsIngested> {
        self.sessions.as_ref()
    }

    /// Undo every node in reverse setup order.
    ///
    /// CSV nodes remove their file; a file that is already gone is fine.
    /// The pipeline node deletes sessions, subjects and labs when
    /// `tear_down` is set, silently unless `verbose`. Every node is
    /// attempted even after a failure.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    pub async fn teardown(mut self) -> Result<(), FixtureError> {
        let mut first_error = None;
        while let Some((name, action)) = self.executed.pop() {
            tracing::debug!(fixture = %name, "tearing down fixture");
            let result = match action {
                FixtureAction::WriteCsv(fixture) => self.remove_csv(fixture),
                FixtureAction::Pipeline => self.delete_rows(&refuse_prompt).await,
                FixtureAction::Ingest(_) => Ok(()),
            };
            if let Err(err) = result {
                tracing::warn!(fixture = %name, error = %err, "fixture teardown failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn remove_csv(&self, fixture: CsvFixture) -> Result<(), FixtureError> {
        let Some(written) = self.csv(fixture) else {
            return Ok(());
        };
        match fs::remove_file(&written.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_rows(&mut self, confirm: &dyn Confirm) -> Result<(), FixtureError> {
        if !self.settings.tear_down {
            tracing::debug!("tear_down disabled, keeping ingested rows");
            return Ok(());
        }
        let Some(db) = self.db.as_ref() else {
            return Ok(());
        };
        if self.settings.verbose {
            delete_in_order(db, &mut self.out, confirm).await
        } else {
            let mut quiet = self.out.quiet();
            delete_in_order(db, &mut quiet, confirm).await
        }
    }
}

impl Drop for ActiveFixtures {
    fn drop(&mut self) {
        while let Some((name, action)) = self.executed.pop() {
            match action {
                FixtureAction::WriteCsv(fixture) => {
                    tracing::warn!(fixture = %name, "fixture dropped without teardown, removing CSV");
                    if let Err(err) = self.remove_csv(fixture) {
                        tracing::warn!(fixture = %name, error = %err, "could not remove CSV");
                    }
                }
                FixtureAction::Pipeline if self.settings.tear_down && self.db.is_some() => {
                    tracing::warn!(fixture = %name, "fixture dropped without teardown, rows kept");
                }
                FixtureAction::Pipeline | FixtureAction::Ingest(_) => {}
            }
        }
    }
}

/// Fixture databases are opened with safemode off, so this is never asked.
fn refuse_prompt(prompt: &str) -> bool {
    tracing::warn!(prompt, "safemode prompt during teardown, refusing");
    false
}

async fn delete_in_order(
    db: &PipelineDb,
    out: &mut OutputSink,
    confirm: &dyn Confirm,
) -> Result<(), FixtureError> {
    for table in TEARDOWN_TABLES {
        db.delete_all(table, out, confirm).await?;
    }
    Ok(())
}
