//! Compiler invocation and the compilation dispatcher.
//!
//! The [`Compiler`] trait is the seam between the build pipeline and the
//! external shader toolchains. [`ProcessCompiler`] drives `slangc` and
//! `glslangValidator` as child processes; tests substitute scripted
//! implementations. The [`Dispatcher`] wraps a compiler with the artifact
//! and manifest bookkeeping every build job needs.

#![warn(missing_docs)]

pub mod discovery;
pub mod dispatch;
pub mod error;
pub mod invocation;
pub mod process;
pub mod toolchain;

pub use discovery::{DependencyDiscovery, IncludeNoticeParser, LineDirectiveParser};
pub use dispatch::{Dispatched, Dispatcher};
pub use error::{CompileError, DiscoveryError};
pub use invocation::{CompileRequest, Compiler, ToolOutput};
pub use process::ProcessCompiler;
pub use toolchain::{ToolchainConfig, SDK_ENV_VAR};
