//! Shared core types used across discovery, expansion and persistence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ImportError;

/// Name of the global scope.
pub const DEFAULT_SCOPE: &str = "default";

/// Scope id of the global scope.
pub const DEFAULT_SCOPE_ID: &str = "0";

/// Input file formats that can be discovered and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Yaml,
    Yml,
    Json,
}

impl FileFormat {
    pub const ALL: [FileFormat; 3] = [FileFormat::Yaml, FileFormat::Yml, FileFormat::Json];

    /// File extension, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Yaml => "yaml",
            FileFormat::Yml => "yml",
            FileFormat::Json => "json",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FileFormat {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yaml" => Ok(FileFormat::Yaml),
            "yml" => Ok(FileFormat::Yml),
            "json" => Ok(FileFormat::Json),
            other => Err(ImportError::InvalidInput(format!(
                "Invalid format '{other}'. Valid formats: yaml, yml or json"
            ))),
        }
    }
}

/// A single validated value destined for the config sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeAssignment {
    pub path: String,
    pub scope: String,
    pub scope_id: String,
    pub value: String,
}
