//! Source file discovery vocabulary for the shader build pipeline.
//!
//! A [`SourceUnit`] is one file under the input root. Its [`SourceCategory`]
//! is decided purely from the file extension and whether it sits below the
//! materials directory, and never changes during a build run.

#![warn(missing_docs)]

pub mod category;
pub mod unit;

pub use category::{classify, SourceCategory, SourceLanguage};
pub use unit::SourceUnit;
