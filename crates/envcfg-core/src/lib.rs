//! envcfg Core Library
//!
//! Imports scoped configuration values (default, websites, stores) from
//! YAML or JSON files into a config store, with value directives such as
//! `!encrypted` and scope id validation.

pub mod cache;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod fs;
pub mod import;
pub mod reader;
pub mod scope;
pub mod sink;
pub mod transform;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Settings
    pub use crate::config::{Settings, load_settings};
    pub use crate::context::AppContext;

    // Errors
    pub use crate::error::{Diagnostic, ImportError};

    // Discovery
    pub use crate::fs::{DepthRange, DiscoveryQuery, locate};

    // Pipeline
    pub use crate::import::{ImportPipeline, LineLevel, Reporter, RunReport};
    pub use crate::reader::{FormatReader, reader_for_format};
    pub use crate::scope::{ScopeCatalog, ScopeExpander, ScopeResolver, ScopeValidator};
    pub use crate::sink::{ConfigSink, ConfigStore};
    pub use crate::transform::{DirectiveRegistry, Encryptor, ValueTransformer};
    pub use crate::types::{FileFormat, ScopeAssignment};

    // Commands
    pub use crate::commands::{AutoUpdateCommand, ProcessCommand, ProcessOptions};
}
