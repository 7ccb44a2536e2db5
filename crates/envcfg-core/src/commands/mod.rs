//! High-level commands for envcfg operations.
//!
//! This module provides the public API frontends call. Each command resolves
//! its collaborators from an [`AppContext`](crate::context::AppContext).

pub mod auto_update;
pub mod process;

pub use auto_update::AutoUpdateCommand;
pub use process::{DEFAULT_FOLDER, ProcessCommand, ProcessOptions, ProcessReport};
