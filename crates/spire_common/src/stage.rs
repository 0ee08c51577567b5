//! Programmable pipeline stages and their file-extension conventions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A programmable pipeline stage a shader entry point is compiled for.
///
/// Each stage has a short file-extension marker (`vert`, `frag`, ...) used both
/// to recognize per-stage GLSL sources and to qualify artifact file names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderStage {
    /// Vertex shader.
    Vertex,
    /// Fragment (pixel) shader.
    Fragment,
    /// Compute shader.
    Compute,
    /// Geometry shader.
    Geometry,
    /// Tessellation control (hull) shader.
    TessControl,
    /// Tessellation evaluation (domain) shader.
    TessEvaluation,
    /// Mesh shader.
    Mesh,
    /// Task (amplification) shader.
    Task,
    /// Ray generation shader.
    RayGen,
    /// Ray intersection shader.
    Intersection,
    /// Any-hit shader.
    AnyHit,
    /// Closest-hit shader.
    ClosestHit,
    /// Miss shader.
    Miss,
    /// Callable shader.
    Callable,
}

impl ShaderStage {
    /// Every stage, in declaration order.
    pub const ALL: [ShaderStage; 14] = [
        ShaderStage::Vertex,
        ShaderStage::Fragment,
        ShaderStage::Compute,
        ShaderStage::Geometry,
        ShaderStage::TessControl,
        ShaderStage::TessEvaluation,
        ShaderStage::Mesh,
        ShaderStage::Task,
        ShaderStage::RayGen,
        ShaderStage::Intersection,
        ShaderStage::AnyHit,
        ShaderStage::ClosestHit,
        ShaderStage::Miss,
        ShaderStage::Callable,
    ];

    /// Returns the stage whose file-extension marker is `ext`, if any.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.extension() == ext)
    }

    /// The file-extension marker for this stage (`vert`, `frag`, ...).
    ///
    /// These match the extensions `glslangValidator` uses to infer a stage.
    pub fn extension(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vert",
            ShaderStage::Fragment => "frag",
            ShaderStage::Compute => "comp",
            ShaderStage::Geometry => "geom",
            ShaderStage::TessControl => "tesc",
            ShaderStage::TessEvaluation => "tese",
            ShaderStage::Mesh => "mesh",
            ShaderStage::Task => "task",
            ShaderStage::RayGen => "rgen",
            ShaderStage::Intersection => "rint",
            ShaderStage::AnyHit => "rahit",
            ShaderStage::ClosestHit => "rchit",
            ShaderStage::Miss => "rmiss",
            ShaderStage::Callable => "rcall",
        }
    }

    /// The stage name accepted by `slangc -stage`.
    pub fn slang_name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
            ShaderStage::Geometry => "geometry",
            ShaderStage::TessControl => "hull",
            ShaderStage::TessEvaluation => "domain",
            ShaderStage::Mesh => "mesh",
            ShaderStage::Task => "amplification",
            ShaderStage::RayGen => "raygeneration",
            ShaderStage::Intersection => "intersection",
            ShaderStage::AnyHit => "anyhit",
            ShaderStage::ClosestHit => "closesthit",
            ShaderStage::Miss => "miss",
            ShaderStage::Callable => "callable",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
