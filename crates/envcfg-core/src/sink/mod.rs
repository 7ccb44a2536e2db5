//! Persistence of imported values.

pub mod store;

use std::collections::BTreeMap;

pub use store::{ConfigStore, StoredConfig};

/// Persists one config value for one scope instance.
pub trait ConfigSink {
    fn save(&mut self, path: &str, value: &str, scope: &str, scope_id: &str) -> anyhow::Result<()>;
}

/// Key of a stored value: `(scope, scope id, path)`.
pub type SinkKey = (String, String, String);

/// In-memory sink that records every write.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemorySink {
    values: BTreeMap<SinkKey, String>,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scope: &str, scope_id: &str, path: &str) -> Option<&str> {
        self.values
            .get(&(scope.to_string(), scope_id.to_string(), path.to_string()))
            .map(String::as_str)
    }

    /// Final state, ordered by key.
    pub fn values(&self) -> &BTreeMap<SinkKey, String> {
        &self.values
    }

    /// Number of `save` calls, including overwrites.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ConfigSink for MemorySink {
    fn save(&mut self, path: &str, value: &str, scope: &str, scope_id: &str) -> anyhow::Result<()> {
        self.values.insert(
            (scope.to_string(), scope_id.to_string(), path.to_string()),
            value.to_string(),
        );
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_overwrites_and_counts() {
        let mut sink = MemorySink::new();
        sink.save("a/b/c", "1", "default", "0").unwrap();
        sink.save("a/b/c", "2", "default", "0").unwrap();

        assert_eq!(sink.get("default", "0", "a/b/c"), Some("2"));
        assert_eq!(sink.values().len(), 1);
        assert_eq!(sink.writes(), 2);
    }
}
