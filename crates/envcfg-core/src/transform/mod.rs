//! Value directives.
//!
//! A raw value of the form `!<type> <payload>` asks for the payload to be
//! transformed before it is stored. Directive types are looked up in a
//! [`DirectiveRegistry`]; anything that does not match the pattern, or names
//! a type nobody registered, is stored unchanged.

pub mod encryptor;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub use encryptor::{Encryptor, KeyedEncryptor};

/// Name of the built-in encryption directive.
pub const ENCRYPTED_DIRECTIVE: &str = "encrypted";

/// Transformation applied to a directive payload.
pub trait Directive: Send + Sync {
    fn apply(&self, payload: &str) -> anyhow::Result<String>;
}

impl<F> Directive for F
where
    F: Fn(&str) -> anyhow::Result<String> + Send + Sync,
{
    fn apply(&self, payload: &str) -> anyhow::Result<String> {
        self(payload)
    }
}

/// Encrypts the payload with the host encryptor.
struct EncryptDirective {
    encryptor: Arc<dyn Encryptor>,
}

impl Directive for EncryptDirective {
    fn apply(&self, payload: &str) -> anyhow::Result<String> {
        self.encryptor.encrypt(payload)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("directive '!{directive}' failed")]
pub struct DirectiveError {
    pub directive: String,
    #[source]
    pub source: anyhow::Error,
}

#[derive(Default)]
pub struct DirectiveRegistry {
    directives: HashMap<String, Box<dyn Directive>>,
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `directive` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, directive: impl Directive + 'static) {
        self.directives.insert(name.into(), Box::new(directive));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Directive> {
        self.directives.get(name).map(Box::as_ref)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.directives.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveRegistry")
            .field("directives", &self.names())
            .finish()
    }
}

/// A value split into directive type and payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveMatch<'a> {
    pub directive: &'a str,
    pub payload: &'a str,
}

/// Match `!<word><whitespace><payload>` at the start of `raw`.
///
/// The payload runs to the end of the first line and must not be empty.
pub fn match_directive(raw: &str) -> Option<DirectiveMatch<'_>> {
    let rest = raw.strip_prefix('!')?;
    let word_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if word_len == 0 {
        return None;
    }
    let (directive, rest) = rest.split_at(word_len);

    let mut chars = rest.chars();
    if !chars.next()?.is_whitespace() {
        return None;
    }
    let payload = chars.as_str().split('\n').next().unwrap_or_default();
    if payload.is_empty() {
        return None;
    }

    Some(DirectiveMatch { directive, payload })
}

#[derive(Debug, Default)]
pub struct ValueTransformer {
    registry: DirectiveRegistry,
}

impl ValueTransformer {
    pub fn new(registry: DirectiveRegistry) -> Self {
        Self { registry }
    }

    /// Transformer with the `encrypted` directive backed by `encryptor`.
    pub fn with_encryptor(encryptor: Arc<dyn Encryptor>) -> Self {
        let mut registry = DirectiveRegistry::new();
        registry.register(ENCRYPTED_DIRECTIVE, EncryptDirective { encryptor });
        Self { registry }
    }

    pub fn registry(&self) -> &DirectiveRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DirectiveRegistry {
        &mut self.registry
    }

    pub fn transform(&self, raw: &str) -> Result<String, DirectiveError> {
        let Some(found) = match_directive(raw) else {
            return Ok(raw.to_string());
        };
        let Some(directive) = self.registry.get(found.directive) else {
            return Ok(raw.to_string());
        };
        directive
            .apply(found.payload)
            .map_err(|source| DirectiveError {
                directive: found.directive.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reversing() -> ValueTransformer {
        let mut registry = DirectiveRegistry::new();
        registry.register("reversed", |payload: &str| -> anyhow::Result<String> {
            Ok(payload.chars().rev().collect())
        });
        ValueTransformer::new(registry)
    }

    #[test]
    fn matches_directive_and_payload() {
        assert_eq!(
            match_directive("!encrypted secret123"),
            Some(DirectiveMatch {
                directive: "encrypted",
                payload: "secret123",
            })
        );
        assert_eq!(
            match_directive("!encrypted two words").map(|m| m.payload),
            Some("two words")
        );
    }

    #[test]
    fn payload_stops_at_first_line() {
        assert_eq!(
            match_directive("!encrypted first\nsecond").map(|m| m.payload),
            Some("first")
        );
    }

    #[test]
    fn carriage_return_stays_in_payload() {
        assert_eq!(
            match_directive("!encrypted secret\r\n").map(|m| m.payload),
            Some("secret\r")
        );
    }

    #[test]
    fn non_directives_do_not_match() {
        for raw in ["plainvalue", "!", "!encrypted", "!encrypted ", "! foo", "x!encrypted foo", "!enc-rypted foo"] {
            assert_eq!(match_directive(raw), None, "{raw}");
        }
    }

    #[test]
    fn plain_value_is_identity() {
        assert_eq!(reversing().transform("plainvalue").unwrap(), "plainvalue");
    }

    #[test]
    fn unknown_directive_is_identity() {
        assert_eq!(reversing().transform("!unknown foo").unwrap(), "!unknown foo");
    }

    #[test]
    fn registered_directive_rewrites_payload() {
        assert_eq!(reversing().transform("!reversed abc").unwrap(), "cba");
    }

    #[test]
    fn registration_does_not_touch_matching() {
        let mut transformer = reversing();
        transformer
            .registry_mut()
            .register("upper", |payload: &str| -> anyhow::Result<String> {
                Ok(payload.to_uppercase())
            });
        assert_eq!(transformer.transform("!upper abc").unwrap(), "ABC");
        assert_eq!(transformer.registry().names(), ["reversed", "upper"]);
    }

    #[test]
    fn failing_directive_reports_its_name() {
        let mut registry = DirectiveRegistry::new();
        registry.register(ENCRYPTED_DIRECTIVE, |_: &str| -> anyhow::Result<String> {
            anyhow::bail!("no key")
        });
        let err = ValueTransformer::new(registry)
            .transform("!encrypted secret")
            .unwrap_err();
        assert_eq!(err.directive, "encrypted");
    }

    #[test]
    fn encrypted_directive_uses_encryptor() {
        let encryptor = Arc::new(KeyedEncryptor::from_passphrase("test-key"));
        let transformer = ValueTransformer::with_encryptor(encryptor.clone());

        let stored = transformer.transform("!encrypted secret123").unwrap();
        assert_ne!(stored, "secret123");
        assert_ne!(stored, "!encrypted secret123");
        assert_eq!(encryptor.decrypt(&stored).unwrap(), "secret123");
    }
}
