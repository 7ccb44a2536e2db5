//! File format readers.
//!
//! Every reader normalizes its input to `serde_json::Value` so the pipeline
//! can walk one tree shape regardless of the source format. Readers do not
//! judge the shape: a file whose top level is not a map is returned as-is and
//! left for the pipeline to report.

mod json;
mod yaml;

use std::path::Path;

use anyhow::Result;
use serde_json::Value;

use crate::types::FileFormat;

pub use json::JsonReader;
pub use yaml::YamlReader;

/// Parses one file into a nested value tree.
pub trait FormatReader: Send + Sync {
    fn parse(&self, path: &Path) -> Result<Value>;
}

/// Create the reader registered for `format`. `yaml` and `yml` share one.
pub fn reader_for_format(format: FileFormat) -> Box<dyn FormatReader> {
    match format {
        FileFormat::Yaml | FileFormat::Yml => Box::new(YamlReader),
        FileFormat::Json => Box::new(JsonReader),
    }
}
