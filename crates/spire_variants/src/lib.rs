//! Build variant model and the material variant expander.
//!
//! Every build target yields one or more [`BuildVariant`]s, each compiled to
//! its own artifact. Plain sources produce a single implicit variant; material
//! sources produce the fixed [`VariantFamily`] catalog. Expansion is a build
//! policy and never looks at file contents.

#![warn(missing_docs)]

pub mod expand;
pub mod family;
pub mod variant;

pub use expand::{expand, variants_for, PlannedArtifact};
pub use family::{VariantFamily, CATALOG};
pub use variant::BuildVariant;
