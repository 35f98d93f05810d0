//! Row structs for every CSV schema of the pipeline.
//!
//! Field names match the CSV headers exactly, so each struct deserializes
//! straight from a `csv::Reader`. The same structs come back out of the
//! database read repos.

mod lab;
mod session;
mod subject;

pub use lab::{Keyword, Lab, Project, ProjectUser, Protocol, Publication, User};
pub use session::Session;
pub use subject::{Subject, SubjectPart};
