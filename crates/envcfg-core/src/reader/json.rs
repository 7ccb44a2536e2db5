//! JSON import file reader.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use super::FormatReader;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReader;

impl FormatReader for JsonReader {
    fn parse(&self, path: &Path) -> Result<Value> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read import file: {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse JSON file: {}", path.display()))
    }
}
