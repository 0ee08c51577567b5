//! Shared foundational types used across the Spire shader build pipeline.
//!
//! This crate provides the pipeline stage vocabulary, preprocessor define sets,
//! and the fixed file-extension conventions for artifacts and manifests.

#![warn(missing_docs)]

pub mod define;
pub mod stage;

pub use define::{DefineSet, InvalidDefineError};
pub use stage::ShaderStage;

/// File extension of every compiled binary artifact.
pub const ARTIFACT_EXTENSION: &str = "spv";

/// File extension of the dependency manifest stored next to each artifact.
pub const MANIFEST_EXTENSION: &str = "deps";

/// Name of the source subdirectory whose Slang files are expanded into variants.
pub const MATERIALS_DIR: &str = "materials";

/// Entry point compiled when a source does not name one.
pub const DEFAULT_ENTRY_POINT: &str = "main";
