//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::DirectoryCache;
use crate::config::{DEFAULT_SETTINGS_FILE, Settings, load_settings};
use crate::scope::ScopeCatalog;
use crate::sink::ConfigStore;
use crate::transform::{DirectiveRegistry, ENCRYPTED_DIRECTIVE, KeyedEncryptor, ValueTransformer};

/// Settings plus the project root they apply to.
///
/// Frontends build this once and hand the collaborators it creates to the
/// commands.
#[derive(Debug, Clone)]
pub struct AppContext {
    project_root: PathBuf,
    settings: Settings,
}

impl AppContext {
    /// Create a context from already loaded settings.
    pub fn new(project_root: PathBuf, settings: Settings) -> Self {
        let settings = settings.resolve_paths(&project_root);
        Self {
            project_root,
            settings,
        }
    }

    /// Load `settings_path` (or `envcfg.toml` in the project root).
    pub fn load(project_root: PathBuf, settings_path: Option<&Path>) -> anyhow::Result<Self> {
        let settings_path = settings_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| project_root.join(DEFAULT_SETTINGS_FILE));
        let settings = load_settings(&settings_path)?;
        Ok(Self::new(project_root, settings))
    }

    /// Context rooted at the current directory.
    pub fn with_defaults(settings_path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load(std::env::current_dir()?, settings_path)
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolve a folder given on the command line against the project root.
    pub fn resolve_folder(&self, folder: &Path) -> PathBuf {
        if folder.is_absolute() {
            folder.to_path_buf()
        } else {
            self.project_root.join(folder)
        }
    }

    pub fn config_store(&self) -> anyhow::Result<ConfigStore> {
        ConfigStore::open(&self.settings.store.path)
    }

    pub fn scope_catalog(&self) -> &ScopeCatalog {
        &self.settings.scopes
    }

    pub fn cache(&self) -> DirectoryCache {
        DirectoryCache::new(&self.settings.cache.dir)
    }

    /// Transformer for the configured key. Without a key, `!encrypted`
    /// values fail the import instead of being stored in clear text.
    pub fn value_transformer(&self) -> ValueTransformer {
        match &self.settings.encryption.key {
            Some(key) => ValueTransformer::with_encryptor(Arc::new(KeyedEncryptor::from_passphrase(key))),
            None => {
                let mut registry = DirectiveRegistry::new();
                registry.register(ENCRYPTED_DIRECTIVE, |_: &str| -> anyhow::Result<String> {
                    anyhow::bail!("encryption.key is not configured")
                });
                ValueTransformer::new(registry)
            }
        }
    }
}
