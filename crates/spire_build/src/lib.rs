//! Tree walking, job planning and parallel execution of shader builds.
//!
//! The [`Orchestrator`] turns an input tree into (unit, variant) jobs, asks
//! the staleness evaluator which of them need work, and dispatches those on a
//! bounded rayon pool. Jobs are independent; a failing job never stops the
//! others unless fail-fast is requested.

#![warn(missing_docs)]

pub mod error;
pub mod orchestrator;
pub mod plan;
pub mod report;
pub mod status;
pub mod walker;

pub use error::BuildError;
pub use orchestrator::{BuildOptions, Orchestrator};
pub use plan::{artifact_conflicts, plan_jobs, BuildJob};
pub use report::{BuildReport, JobFailure, JobOutcome, JobWarning, StatusEntry};
pub use status::{plan_tree, tree_status};
pub use walker::discover;
