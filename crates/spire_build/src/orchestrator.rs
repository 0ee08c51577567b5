//! The build orchestrator.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use spire_cache::{MissingManifestPolicy, StalenessEvaluator};
use spire_compiler::{Compiler, Dispatcher};
use tracing::{error, info};

use crate::error::BuildError;
use crate::plan::{artifact_conflicts, BuildJob};
use crate::report::{BuildReport, JobOutcome, StatusEntry};
use crate::status::{evaluate_jobs, plan_tree};

/// Scheduling options for a build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Maximum concurrent jobs; 0 uses every available core.
    pub jobs: usize,
    /// Stop launching jobs after the first failure.
    pub fail_fast: bool,
    /// Policy for built artifacts without a manifest.
    pub missing_manifest: MissingManifestPolicy,
}

/// Walks an input tree and builds every stale artifact.
pub struct Orchestrator<C> {
    dispatcher: Dispatcher<C>,
    evaluator: StalenessEvaluator,
    options: BuildOptions,
    cancelled: Arc<AtomicBool>,
}

impl<C: Compiler> Orchestrator<C> {
    /// Creates an orchestrator dispatching through `dispatcher`.
    pub fn new(dispatcher: Dispatcher<C>, options: BuildOptions) -> Self {
        Self {
            dispatcher,
            evaluator: StalenessEvaluator::new(options.missing_manifest),
            options,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The shared cancellation flag. Setting it stops new jobs from starting;
    /// running compiles finish normally.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Stops launching new jobs.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Lists every job for the tree at `input_root` without evaluating it.
    pub fn plan(&self, input_root: &Path, output_root: &Path) -> Result<Vec<BuildJob>, BuildError> {
        plan_tree(input_root, output_root)
    }

    /// Evaluates every job without building anything.
    pub fn status(
        &self,
        input_root: &Path,
        output_root: &Path,
    ) -> Result<Vec<StatusEntry>, BuildError> {
        let jobs = self.plan(input_root, output_root)?;
        Ok(evaluate_jobs(&self.evaluator, jobs))
    }

    /// Builds every stale artifact of the tree at `input_root` into `output_root`.
    pub fn run(&self, input_root: &Path, output_root: &Path) -> Result<BuildReport, BuildError> {
        let jobs = self.plan(input_root, output_root)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs)
            .build()?;
        info!(
            jobs = jobs.len(),
            workers = pool.current_num_threads(),
            "starting build"
        );

        let conflicts = artifact_conflicts(&jobs);

        let outcomes: Vec<JobOutcome> = pool.install(|| {
            jobs.par_iter()
                .map(|job| match conflicts.get(job.artifact.as_path()) {
                    Some(sources) => self.fail(job, conflict_message(&job.artifact, sources)),
                    None => self.run_job(job),
                })
                .collect()
        });

        let mut report = BuildReport::default();
        for (job, outcome) in jobs.iter().zip(outcomes) {
            report.record(job, outcome);
        }
        info!("{report}");
        Ok(report)
    }

    fn run_job(&self, job: &BuildJob) -> JobOutcome {
        if self.cancelled.load(Ordering::SeqCst) {
            return JobOutcome::Skipped;
        }
        let staleness = self.evaluator.evaluate(&job.source, &job.artifact);
        if !staleness.is_stale() {
            return JobOutcome::UpToDate;
        }

        if let Some(dir) = job.artifact.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                return self.fail(
                    job,
                    format!("cannot create output directory {}: {e}", dir.display()),
                );
            }
        }

        info!(source = %job.relative.display(), variant = %job.variant.name, "compiling ({staleness})");
        match self
            .dispatcher
            .dispatch(&job.source, job.language, &job.artifact, &job.variant)
        {
            Ok(done) => JobOutcome::Built {
                include_error: done.include_error.map(|e| e.to_string()),
            },
            Err(e) => self.fail(job, e.to_string()),
        }
    }

    fn fail(&self, job: &BuildJob, message: String) -> JobOutcome {
        error!(artifact = %job.artifact.display(), "{message}");
        if self.options.fail_fast {
            self.cancel();
        }
        JobOutcome::Failed(message)
    }
}

fn conflict_message(artifact: &Path, sources: &[&Path]) -> String {
    let names: Vec<String> = sources.iter().map(|s| s.display().to_string()).collect();
    format!(
        "{} would be written by several sources: {}",
        artifact.display(),
        names.join(", ")
    )
}
