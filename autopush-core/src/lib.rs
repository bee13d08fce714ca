//! # autopush-core
//!
//! Core library for autopush - stage every change in a git repository,
//! commit it with a timestamped message and push it upstream.
//!
//! The git executable does the actual work. This crate decides the order,
//! checks every exit status and reports each step's outcome.

pub mod config;
pub mod error;
pub mod git;
pub mod message;
pub mod models;
pub mod runner;

pub use config::{FileConfig, RunnerConfig};
pub use error::{Error, Result};
pub use git::{GitBackend, GitOutput, SystemGit};
pub use message::CommitMessage;
pub use models::{RunReport, Step, StepReport, StepStatus};
pub use runner::Runner;
