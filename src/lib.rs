//! ccvars - toolchain variable registry for native build rule generators
//!
//! This crate declares, memoizes, and lazily resolves the named values
//! (compiler flags, include paths, toolchain versions) that generated build
//! rules reference symbolically, and provides the flag filtering used to
//! assemble them.

pub mod core;
pub mod ops;
pub mod registry;
pub mod toolchain;
pub mod util;

/// Test utilities for ccvars unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides an in-memory source tree and a call-counting resolver.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{BuildConfig, BuildConfiguration, FlagSet, SourceTree, TargetOs};
pub use registry::{RegistryBuilder, RegistryError, VariableRegistry};
pub use toolchain::{declare_globals, global_registry};
