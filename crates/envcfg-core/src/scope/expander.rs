//! Expansion of one config path's scope tree into flat assignments.

use serde_json::Value;

use super::ScopeValidator;
use crate::error::{Diagnostic, ImportError, Result};
use crate::transform::ValueTransformer;
use crate::types::ScopeAssignment;

/// Assignments produced for one path, plus what was skipped on the way.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub assignments: Vec<ScopeAssignment>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ScopeExpander<'a> {
    validator: &'a dyn ScopeValidator,
    transformer: &'a ValueTransformer,
}

impl<'a> ScopeExpander<'a> {
    pub fn new(validator: &'a dyn ScopeValidator, transformer: &'a ValueTransformer) -> Self {
        Self {
            validator,
            transformer,
        }
    }

    /// Expand `scopes` (`scope -> scope id -> value`) for `path`.
    ///
    /// Empty scopes are skipped silently. Rejected scope ids and badly shaped
    /// entries become diagnostics and do not stop their siblings. Only a
    /// failing value directive is an error.
    pub fn expand(&self, path: &str, scopes: &Value) -> Result<Expansion> {
        let mut expansion = Expansion::default();

        let scopes = match scopes {
            Value::Object(map) => map,
            other if is_falsy(other) => return Ok(expansion),
            other => {
                expansion.diagnostics.push(Diagnostic::MalformedEntry {
                    path: path.to_string(),
                    detail: format!("expected a map of scopes, got {other}"),
                });
                return Ok(expansion);
            }
        };

        for (scope, ids) in scopes {
            if is_falsy(ids) {
                continue;
            }
            let Value::Object(ids) = ids else {
                expansion.diagnostics.push(Diagnostic::MalformedEntry {
                    path: path.to_string(),
                    detail: format!("expected a map of scope ids for scope '{scope}', got {ids}"),
                });
                continue;
            };

            for (scope_id, raw) in ids {
                let value = value_to_string(raw);
                if !self.validator.validate(scope, scope_id) {
                    expansion
                        .diagnostics
                        .push(Diagnostic::InvalidScopeAssignment {
                            path: path.to_string(),
                            scope: scope.clone(),
                            scope_id: scope_id.clone(),
                            value,
                        });
                    continue;
                }

                let value =
                    self.transformer
                        .transform(&value)
                        .map_err(|err| ImportError::Transform {
                            directive: err.directive,
                            path: path.to_string(),
                            source: err.source,
                        })?;

                expansion.assignments.push(ScopeAssignment {
                    path: path.to_string(),
                    scope: scope.clone(),
                    scope_id: scope_id.clone(),
                    value,
                });
            }
        }

        Ok(expansion)
    }
}

/// String form of a raw value as it is written to the store.
///
/// `true` is `"1"`, `false` and null are empty, lists and maps are compact
/// JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Bool(true) => false,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
