//! Settings schema for envcfg.toml

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::scope::ScopeCatalog;
use crate::types::FileFormat;

/// Root settings structure for envcfg.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// Where imported values are persisted
    #[serde(default)]
    pub store: StoreSettings,

    /// Cache invalidated after an import
    #[serde(default)]
    pub cache: CacheSettings,

    /// Key material for the `encrypted` directive
    #[serde(default)]
    pub encryption: EncryptionSettings,

    /// Known websites and stores
    #[serde(default)]
    pub scopes: ScopeCatalog,

    /// Recurring import run on deploy
    #[serde(default)]
    pub auto_update: AutoUpdateSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreSettings {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("var/config_data.toml")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheSettings {
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("var/cache")
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct EncryptionSettings {
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutoUpdateSettings {
    #[serde(default)]
    pub enabled: bool,

    /// Import folder, relative to the project root
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Import file format; empty means `yaml`
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for AutoUpdateSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: default_directory(),
            format: default_format(),
        }
    }
}

fn default_directory() -> String {
    ".environment".to_string()
}

fn default_format() -> String {
    FileFormat::Yaml.to_string()
}

impl AutoUpdateSettings {
    /// The configured format, falling back to `yaml` when unset.
    pub fn format(&self) -> anyhow::Result<FileFormat> {
        let format = self.format.trim();
        if format.is_empty() {
            return Ok(FileFormat::Yaml);
        }
        Ok(format.parse()?)
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.store.path.as_os_str().is_empty() {
            anyhow::bail!("store.path cannot be empty");
        }
        if self.cache.dir.as_os_str().is_empty() {
            anyhow::bail!("cache.dir cannot be empty");
        }
        if matches!(&self.encryption.key, Some(key) if key.is_empty()) {
            anyhow::bail!("encryption.key cannot be empty; remove it instead");
        }
        self.scopes
            .ensure_unique_ids()
            .context("Invalid scopes configuration")?;
        self.auto_update
            .format()
            .context("Invalid auto_update configuration")?;
        Ok(())
    }

    /// Make relative store and cache paths relative to `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        if self.store.path.is_relative() {
            self.store.path = base.join(&self.store.path);
        }
        if self.cache.dir.is_relative() {
            self.cache.dir = base.join(&self.cache.dir);
        }
        self
    }
}
