//! Build and status results.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use spire_cache::Staleness;

use crate::plan::BuildJob;

/// What happened to one job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobOutcome {
    /// The artifact was rebuilt. Carries the reason no manifest was recorded, if any.
    Built {
        /// Include discovery failure, if the manifest could not be written.
        include_error: Option<String>,
    },
    /// The artifact was fresh.
    UpToDate,
    /// The job failed with the given message.
    Failed(String),
    /// The build was cancelled before the job started.
    Skipped,
}

/// A job that failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JobFailure {
    /// The source being compiled.
    pub source: PathBuf,
    /// The artifact that was not produced.
    pub artifact: PathBuf,
    /// Error text, including compiler diagnostics.
    pub message: String,
}

/// A job that succeeded without recording its dependencies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JobWarning {
    /// The artifact without a manifest.
    pub artifact: PathBuf,
    /// Why discovery failed.
    pub message: String,
}

/// Summary of a build run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Artifacts compiled in this run.
    pub built: usize,
    /// Artifacts that were already fresh.
    pub up_to_date: usize,
    /// Jobs that failed.
    pub failed: usize,
    /// Jobs never started because the build was cancelled.
    pub skipped: usize,
    /// Details of each failure.
    pub failures: Vec<JobFailure>,
    /// Successful jobs whose manifest could not be written.
    pub warnings: Vec<JobWarning>,
}

impl BuildReport {
    /// Folds one job outcome into the report.
    pub fn record(&mut self, job: &BuildJob, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Built { include_error } => {
                self.built += 1;
                if let Some(message) = include_error {
                    self.warnings.push(JobWarning {
                        artifact: job.artifact.clone(),
                        message,
                    });
                }
            }
            JobOutcome::UpToDate => self.up_to_date += 1,
            JobOutcome::Failed(message) => {
                self.failed += 1;
                self.failures.push(JobFailure {
                    source: job.source.clone(),
                    artifact: job.artifact.clone(),
                    message,
                });
            }
            JobOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Total number of jobs.
    pub fn total(&self) -> usize {
        self.built + self.up_to_date + self.failed + self.skipped
    }

    /// Returns `true` if every job either built or was fresh.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} built, {} up to date, {} failed",
            self.built, self.up_to_date, self.failed
        )?;
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        Ok(())
    }
}

/// The staleness verdict of one planned job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    /// The job.
    pub job: BuildJob,
    /// Whether and why it would be rebuilt.
    pub staleness: Staleness,
}
