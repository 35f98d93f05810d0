//! # wf-core
//!
//! Core types for the workflow-session pipeline.
//!
//! This crate provides the foundational types shared across all `wf-*` crates:
//! - Row structs for every CSV schema (labs, projects, users, subjects, sessions)
//! - The `Sex` enum and the `Table` catalogue of the relational schema
//! - Serde helpers for the naive `YYYY-MM-DD HH:MM:SS` datetime format
//! - `OutputSink`, the explicit replacement for printing to stdout
//! - Cross-cutting error types

pub mod datetime;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod output;
