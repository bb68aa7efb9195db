//! Clang toolchain variables.
//!
//! This module assembles the global flag lists, strips flags the active
//! compiler version rejects, filters include directories against the source
//! tree, and declares the results into a [`crate::registry::RegistryBuilder`].

pub mod globals;
pub mod overrides;
pub mod paths;
pub mod unsupported;

pub use globals::{declare_globals, global_registry, GlobalFlags, GlobalsEnv};
pub use overrides::{resolve_override, EnvOverride, OverrideMode};
pub use paths::{filter_existing, prefixed_existent_paths};
pub use unsupported::{filter_unsupported, CompilerRules, UnsupportedFlagTable, UnsupportedFlags};
