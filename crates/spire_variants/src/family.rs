//! The fixed catalog of material variant families.

use std::fmt;

use serde::Serialize;
use spire_common::ShaderStage;

const DEPTH_ONLY: &str = "DEPTH_ONLY";
const MASKED: &str = "MASKED";
const CSM: &str = "CSM";
const MULTIVIEW: &str = "MULTIVIEW";
const RSM: &str = "RSM";
const MAIN_VIEW: &str = "MAIN_VIEW";

const VERTEX_ONLY: &[ShaderStage] = &[ShaderStage::Vertex];
const VERTEX_FRAGMENT: &[ShaderStage] = &[ShaderStage::Vertex, ShaderStage::Fragment];

/// One render-pass flavour a material is compiled for.
///
/// Each family fixes the stages compiled, the macros defined, and the entry
/// point used per stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantFamily {
    /// Cascaded shadow map depth pass.
    Shadow,
    /// Shadow pass with alpha-tested geometry.
    ShadowMasked,
    /// Reflective shadow map pass (flux, normal, depth).
    Rsm,
    /// Reflective shadow map pass with alpha testing.
    RsmMasked,
    /// Depth-only prepass from the main view.
    Prepass,
    /// Depth prepass with alpha testing.
    PrepassMasked,
    /// G-buffer pass.
    Gbuffer,
    /// G-buffer pass with alpha testing.
    GbufferMasked,
}

/// Every family, in the order artifacts are expanded.
pub const CATALOG: [VariantFamily; 8] = [
    VariantFamily::Shadow,
    VariantFamily::ShadowMasked,
    VariantFamily::Rsm,
    VariantFamily::RsmMasked,
    VariantFamily::Prepass,
    VariantFamily::PrepassMasked,
    VariantFamily::Gbuffer,
    VariantFamily::GbufferMasked,
];

impl VariantFamily {
    /// The family name used in artifact file names (`shadow_masked`).
    pub fn name(self) -> &'static str {
        match self {
            VariantFamily::Shadow => "shadow",
            VariantFamily::ShadowMasked => "shadow_masked",
            VariantFamily::Rsm => "rsm",
            VariantFamily::RsmMasked => "rsm_masked",
            VariantFamily::Prepass => "prepass",
            VariantFamily::PrepassMasked => "prepass_masked",
            VariantFamily::Gbuffer => "gbuffer",
            VariantFamily::GbufferMasked => "gbuffer_masked",
        }
    }

    /// Macro names defined (to `1`) for every stage of this family.
    pub fn defines(self) -> &'static [&'static str] {
        match self {
            VariantFamily::Shadow => &[DEPTH_ONLY, CSM, MULTIVIEW],
            VariantFamily::ShadowMasked => &[DEPTH_ONLY, MASKED, CSM, MULTIVIEW],
            VariantFamily::Rsm => &[RSM, MULTIVIEW],
            VariantFamily::RsmMasked => &[MASKED, RSM, MULTIVIEW],
            VariantFamily::Prepass => &[DEPTH_ONLY, MAIN_VIEW],
            VariantFamily::PrepassMasked => &[DEPTH_ONLY, MASKED, MAIN_VIEW],
            VariantFamily::Gbuffer => &[MAIN_VIEW],
            VariantFamily::GbufferMasked => &[MASKED, MAIN_VIEW],
        }
    }

    /// Stages compiled for this family.
    ///
    /// Unmasked depth-only passes need no fragment shader.
    pub fn stages(self) -> &'static [ShaderStage] {
        match self {
            VariantFamily::Shadow | VariantFamily::Prepass => VERTEX_ONLY,
            _ => VERTEX_FRAGMENT,
        }
    }

    /// Entry point compiled for `stage`.
    pub fn entry_point(self, stage: ShaderStage) -> &'static str {
        match stage {
            ShaderStage::Fragment => "main_fs",
            _ => "main_vs",
        }
    }

    /// Returns `true` for the alpha-tested twin of a family.
    pub fn is_masked(self) -> bool {
        self.defines().contains(&MASKED)
    }
}

impl fmt::Display for VariantFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_fourteen_stages() {
        let total: usize = CATALOG.iter().map(|f| f.stages().len()).sum();
        assert_eq!(total, 14);
    }

    #[test]
    fn vertex_only_families() {
        assert_eq!(VariantFamily::Shadow.stages(), &[ShaderStage::Vertex]);
        assert_eq!(VariantFamily::Prepass.stages(), &[ShaderStage::Vertex]);
        assert_eq!(VariantFamily::PrepassMasked.stages().len(), 2);
    }

    #[test]
    fn masked_families_define_masked() {
        for family in CATALOG {
            assert_eq!(
                family.is_masked(),
                family.name().ends_with("_masked"),
                "{family}"
            );
        }
    }

    #[test]
    fn shadow_defines() {
        assert_eq!(
            VariantFamily::ShadowMasked.defines(),
            &["DEPTH_ONLY", "MASKED", "CSM", "MULTIVIEW"]
        );
        assert_eq!(VariantFamily::Gbuffer.defines(), &["MAIN_VIEW"]);
    }

    #[test]
    fn entry_points_per_stage() {
        assert_eq!(VariantFamily::Rsm.entry_point(ShaderStage::Vertex), "main_vs");
        assert_eq!(VariantFamily::Rsm.entry_point(ShaderStage::Fragment), "main_fs");
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = CATALOG.iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATALOG.len());
    }
}
