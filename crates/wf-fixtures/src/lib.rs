//! # wf-fixtures
//!
//! Test fixtures for the workflow-session pipeline.
//!
//! A [`FixtureGraph`] declares which fixtures exist and what each requires:
//! the `pipeline` node opens the database, ten CSV nodes write literal files
//! under `tests/user_data/{lab,subject,session}`, and three ingest nodes load
//! them in order. The graph is checked when it is built, so an ingest that
//! could run before its inputs or prerequisite ingests is rejected up front.
//!
//! [`Harness::setup`] runs the closure of the requested nodes in dependency
//! order and [`ActiveFixtures::teardown`] undoes them in reverse.
//!
//! ```no_run
//! # async fn run() -> Result<(), wf_fixtures::FixtureError> {
//! use wf_fixtures::Harness;
//!
//! let harness = Harness::from_env(".")?;
//! let active = harness.setup(&["ingest_sessions"]).await?;
//! // ... assertions against active.db() ...
//! active.teardown().await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod csv_writer;
pub mod error;
pub mod graph;
pub mod harness;
pub mod logging;
pub mod node;

pub use catalog::CsvFixture;
pub use error::FixtureError;
pub use graph::FixtureGraph;
pub use harness::{ActiveFixtures, Harness, WrittenCsv};
pub use node::{Artifact, FixtureAction, FixtureNode, IngestStep};
