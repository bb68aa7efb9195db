//! High-level operations.
//!
//! This module contains the implementation of ccvars commands.

pub mod session;

pub use session::{load_session, ResolvedVariable, Session, SessionOptions};
