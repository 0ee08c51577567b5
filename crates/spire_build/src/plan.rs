//! Expansion of discovered units into build jobs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use spire_source::{SourceLanguage, SourceUnit};
use spire_variants::{variants_for, BuildVariant};

/// One (unit, variant) pair: a single compiler invocation producing one artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BuildJob {
    /// Source file to compile.
    pub source: PathBuf,
    /// Source path relative to the input root.
    pub relative: PathBuf,
    /// Backend language.
    pub language: SourceLanguage,
    /// Defines, entry point and stage.
    pub variant: BuildVariant,
    /// Output binary.
    pub artifact: PathBuf,
}

/// Expands `units` into jobs writing below `output_root`.
///
/// Include-only units contribute nothing.
pub fn plan_jobs(units: &[SourceUnit], output_root: &Path) -> Vec<BuildJob> {
    units
        .iter()
        .filter_map(|unit| unit.language().map(|language| (unit, language)))
        .flat_map(|(unit, language)| {
            variants_for(unit, output_root)
                .into_iter()
                .map(move |planned| BuildJob {
                    source: unit.path.clone(),
                    relative: unit.relative.clone(),
                    language,
                    variant: planned.variant,
                    artifact: planned.artifact,
                })
        })
        .collect()
}

/// Artifacts claimed by more than one job, each with the sources claiming it.
///
/// `materials/metal.slang` and `materials/metal_shadow.vert` both map to
/// `metal_shadow.vert.spv`, for example. None of the claimants may be built.
pub fn artifact_conflicts(jobs: &[BuildJob]) -> BTreeMap<&Path, Vec<&Path>> {
    let mut claims: BTreeMap<&Path, Vec<&Path>> = BTreeMap::new();
    for job in jobs {
        claims
            .entry(job.artifact.as_path())
            .or_default()
            .push(job.relative.as_path());
    }
    claims.retain(|_, sources| sources.len() > 1);
    claims
}
