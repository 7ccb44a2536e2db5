//! Error and diagnostic types for the import pipeline.
//!
//! Fatal conditions are [`ImportError`] values and abort a run. Per-file and
//! per-assignment problems are [`Diagnostic`] values: they are reported and
//! the run carries on.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::types::FileFormat;

pub type Result<T, E = ImportError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Bad root folder, unsupported format or depth expression.
    #[error("{0}")]
    InvalidInput(String),

    #[error("No files found for format: *.{format}")]
    NoFilesFound { format: FileFormat },

    #[error("Failed to save '{path}' for scope {scope}/{scope_id}")]
    SinkWrite {
        path: String,
        scope: String,
        scope_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to resolve scope id '{scope_id}' for scope '{scope}'")]
    ScopeResolution {
        scope: String,
        scope_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Directive '!{directive}' failed for '{path}'")]
    Transform {
        directive: String,
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Non-fatal problem found while importing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// File could not be read, or its top level is not a map.
    MalformedFile { file: PathBuf, detail: String },
    /// A path or scope entry has the wrong shape.
    MalformedEntry { path: String, detail: String },
    /// Scope id rejected by the validator.
    InvalidScopeAssignment {
        path: String,
        scope: String,
        scope_id: String,
        value: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedFile { file, detail } => {
                write!(f, "Skipped: '{}' ({detail}).", file.display())
            }
            Diagnostic::MalformedEntry { path, detail } => {
                write!(f, "ERROR: Malformed entry for '{path}' ({detail})")
            }
            Diagnostic::InvalidScopeAssignment {
                path,
                scope,
                scope_id,
                value,
            } => write!(
                f,
                "ERROR: Invalid scopeId \"{scope_id}\" for scope \"{scope}\" ({path} => {value})"
            ),
        }
    }
}
