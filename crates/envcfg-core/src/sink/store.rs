//! File-backed config store.
//!
//! Values live in a TOML document keyed `scope -> scope id -> path`:
//!
//! ```toml
//! [default.0]
//! "web/seo/use_rewrites" = "1"
//!
//! [stores.3]
//! "general/locale/code" = "de_DE"
//! ```
//!
//! Every save is written through to disk, so values already saved stay
//! saved if a later write fails.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::ConfigSink;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredConfig {
    scopes: BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>,
}

impl StoredConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scope: &str, scope_id: &str, path: &str) -> Option<&str> {
        self.scopes
            .get(scope)?
            .get(scope_id)?
            .get(path)
            .map(String::as_str)
    }

    /// Set a value, returning the one it replaced.
    pub fn set(&mut self, scope: &str, scope_id: &str, path: &str, value: &str) -> Option<String> {
        self.scopes
            .entry(scope.to_string())
            .or_default()
            .entry(scope_id.to_string())
            .or_default()
            .insert(path.to_string(), value.to_string())
    }

    pub fn len(&self) -> usize {
        self.scopes
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    config: StoredConfig,
}

impl ConfigStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let config = load(&path)?;
        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &StoredConfig {
        &self.config
    }

    fn flush(&self) -> anyhow::Result<()> {
        let content =
            toml::to_string_pretty(&self.config).context("Failed to serialize config store")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write config store: {}", self.path.display()))
    }
}

fn load(path: &Path) -> anyhow::Result<StoredConfig> {
    if !path.exists() {
        return Ok(StoredConfig::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config store: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config store: {}", path.display()))
}

impl ConfigSink for ConfigStore {
    fn save(&mut self, path: &str, value: &str, scope: &str, scope_id: &str) -> anyhow::Result<()> {
        let previous = self.config.set(scope, scope_id, path, value);
        if previous.as_deref() == Some(value) {
            tracing::trace!(path, scope, scope_id, "value unchanged");
            return Ok(());
        }
        self.flush()
    }
}
