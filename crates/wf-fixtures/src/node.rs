//! Fixture nodes: what each one does and what it leaves behind.

use crate::catalog::CsvFixture;

/// Name of the node that opens the database and owns row teardown.
pub const PIPELINE: &str = "pipeline";

/// One of the three ingestion calls, in the order they must run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IngestStep {
    Lab,
    Subjects,
    Sessions,
}

impl IngestStep {
    pub const ALL: [Self; 3] = [Self::Lab, Self::Subjects, Self::Sessions];

    #[must_use]
    pub const fn node_name(self) -> &'static str {
        match self {
            Self::Lab => "ingest_lab",
            Self::Subjects => "ingest_subjects",
            Self::Sessions => "ingest_sessions",
        }
    }

    /// CSV files the ingestion call reads.
    #[must_use]
    pub const fn inputs(self) -> &'static [CsvFixture] {
        match self {
            Self::Lab => &[
                CsvFixture::Labs,
                CsvFixture::Projects,
                CsvFixture::Publications,
                CsvFixture::Keywords,
                CsvFixture::Protocols,
                CsvFixture::Users,
                CsvFixture::ProjectUsers,
            ],
            Self::Subjects => &[CsvFixture::Subjects, CsvFixture::SubjectParts],
            Self::Sessions => &[CsvFixture::Sessions],
        }
    }

    /// Ingest steps that must have completed first.
    #[must_use]
    pub const fn prerequisites(self) -> &'static [Self] {
        match self {
            Self::Lab => &[],
            Self::Subjects => &[Self::Lab],
            Self::Sessions => &[Self::Lab, Self::Subjects],
        }
    }
}

/// Something a node makes available to the nodes that depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Database,
    CsvFile(CsvFixture),
    Ingested(IngestStep),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureAction {
    /// Open the database; on teardown delete sessions, subjects and labs.
    Pipeline,
    /// Write a literal CSV; on teardown remove the file.
    WriteCsv(CsvFixture),
    /// Run an ingestion call. No teardown of its own.
    Ingest(IngestStep),
}

impl FixtureAction {
    #[must_use]
    pub const fn produces(self) -> Artifact {
        match self {
            Self::Pipeline => Artifact::Database,
            Self::WriteCsv(fixture) => Artifact::CsvFile(fixture),
            Self::Ingest(step) => Artifact::Ingested(step),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureNode {
    pub name: String,
    pub requires: Vec<String>,
    pub action: FixtureAction,
}

impl FixtureNode {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        requires: impl IntoIterator<Item = impl Into<String>>,
        action: FixtureAction,
    ) -> Self {
        Self {
            name: name.into(),
            requires: requires.into_iter().map(Into::into).collect(),
            action,
        }
    }

    #[must_use]
    pub fn pipeline() -> Self {
        Self::new(PIPELINE, Vec::<String>::new(), FixtureAction::Pipeline)
    }

    #[must_use]
    pub fn csv(fixture: CsvFixture) -> Self {
        Self::new(
            fixture.node_name(),
            Vec::<String>::new(),
            FixtureAction::WriteCsv(fixture),
        )
    }

    /// An ingest node requiring `extra` plus the writers of all its inputs.
    #[must_use]
    pub fn ingest<'a>(step: IngestStep, extra: impl IntoIterator<Item = &'a str>) -> Self {
        let requires = extra
            .into_iter()
            .chain(step.inputs().iter().map(|f| f.node_name()));
        Self::new(step.node_name(), requires, FixtureAction::Ingest(step))
    }

    #[must_use]
    pub const fn produces(&self) -> Artifact {
        self.action.produces()
    }
}
