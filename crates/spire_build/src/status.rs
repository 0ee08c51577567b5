//! Tree planning and staleness evaluation, independent of any compiler.

use std::path::Path;

use rayon::prelude::*;
use spire_cache::{MissingManifestPolicy, StalenessEvaluator};

use crate::error::BuildError;
use crate::plan::{plan_jobs, BuildJob};
use crate::report::StatusEntry;
use crate::walker::discover;

/// Lists every job for the tree at `input_root`. The output root is never
/// created, and is skipped if it lies inside the input tree.
pub fn plan_tree(input_root: &Path, output_root: &Path) -> Result<Vec<BuildJob>, BuildError> {
    let units = discover(input_root, Some(output_root))?;
    Ok(plan_jobs(&units, output_root))
}

/// Evaluates every job of the tree without building anything.
pub fn tree_status(
    input_root: &Path,
    output_root: &Path,
    policy: MissingManifestPolicy,
) -> Result<Vec<StatusEntry>, BuildError> {
    let jobs = plan_tree(input_root, output_root)?;
    Ok(evaluate_jobs(&StalenessEvaluator::new(policy), jobs))
}

pub(crate) fn evaluate_jobs(evaluator: &StalenessEvaluator, jobs: Vec<BuildJob>) -> Vec<StatusEntry> {
    jobs.into_par_iter()
        .map(|job| {
            let staleness = evaluator.evaluate(&job.source, &job.artifact);
            StatusEntry { job, staleness }
        })
        .collect()
}
