//! Command implementations

pub mod get;
pub mod list;
pub mod refs;
