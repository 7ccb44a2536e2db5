//! YAML import file reader.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use serde_yaml::Value as YamlValue;
use serde_yaml::value::TaggedValue;

use super::FormatReader;

#[derive(Debug, Default, Clone, Copy)]
pub struct YamlReader;

impl FormatReader for YamlReader {
    fn parse(&self, path: &Path) -> Result<Value> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read import file: {}", path.display()))?;
        let yaml: YamlValue = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;
        yaml_to_json_value(yaml)
    }
}

/// Convert a YAML value to a JSON value.
///
/// Mapping keys become strings (`0:` turns into `"0"`). Tagged scalars such as
/// `!encrypted secret` are rendered back to their `!tag value` text so value
/// directives survive the trip.
fn yaml_to_json_value(yaml: YamlValue) -> Result<Value> {
    Ok(match yaml {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                // serde_json::Number can't hold NaN/Infinity, fall back to string
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(n.to_string()))
            }
        }
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_json_value)
                .collect::<Result<Vec<_>>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(mapping_key(key)?, yaml_to_json_value(value)?);
            }
            Value::Object(map)
        }
        YamlValue::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            let inner = match yaml_to_json_value(value)? {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            Value::String(format!("{} {}", tag, inner).trim_end().to_string())
        }
    })
}

fn mapping_key(key: YamlValue) -> Result<String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok(String::new()),
        other => anyhow::bail!("Unsupported YAML mapping key: {:?}", other),
    }
}
