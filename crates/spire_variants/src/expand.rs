//! Expansion of source units into (variant, artifact path) pairs.

use std::path::{Path, PathBuf};

use serde::Serialize;
use spire_source::{SourceCategory, SourceUnit};

use crate::family::CATALOG;
use crate::variant::BuildVariant;

/// A variant together with the artifact it compiles to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlannedArtifact {
    /// The compilation settings.
    pub variant: BuildVariant,
    /// Where the compiled binary is written.
    pub artifact: PathBuf,
}

/// Expands a material source into the full variant catalog.
///
/// Produces one artifact per stage of every [`VariantFamily`](crate::VariantFamily),
/// named `<material>_<family>.<stage>.spv` inside `output_dir`. The result
/// is the same for every material; the file is never read.
pub fn expand(material: &Path, output_dir: &Path) -> Vec<PlannedArtifact> {
    let stem = material.file_stem().unwrap_or_default();

    CATALOG
        .iter()
        .flat_map(|family| {
            family.stages().iter().map(move |stage| {
                let variant = BuildVariant::for_family(*family, *stage);
                let mut base = stem.to_os_string();
                base.push("_");
                base.push(family.name());
                let artifact = output_dir.join(variant.artifact_file_name(&base));
                PlannedArtifact { variant, artifact }
            })
        })
        .collect()
}

/// Returns every artifact a unit builds, mirrored under `output_root`.
///
/// Include-only units build nothing.
pub fn variants_for(unit: &SourceUnit, output_root: &Path) -> Vec<PlannedArtifact> {
    let output_dir = output_root.join(unit.relative_dir());
    match unit.category {
        SourceCategory::IncludeOnly => Vec::new(),
        SourceCategory::CompositeSource => expand(&unit.relative, &output_dir),
        SourceCategory::ComposableSource | SourceCategory::StageSource => {
            let variant = BuildVariant::implicit(unit.stage());
            let artifact = output_dir.join(variant.artifact_file_name(unit.stem()));
            vec![PlannedArtifact { variant, artifact }]
        }
    }
}
