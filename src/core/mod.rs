//! Core data structures for ccvars.
//!
//! This module contains the types the registry and toolchain code share:
//! - Build configurations seen by lazy resolvers
//! - Source tree existence checks
//! - Ordered flag lists

pub mod configuration;
pub mod flags;
pub mod source_tree;

pub use configuration::{BuildConfig, BuildConfiguration, ConfigId, ConfigKey, HostOs, TargetOs};
pub use flags::FlagSet;
pub use source_tree::{DirSourceTree, SourceTree};
