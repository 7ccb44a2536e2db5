//! Cache invalidation after an import.

use std::path::{Path, PathBuf};

use anyhow::Context;

/// Cache types cleaned after config values change.
pub const IMPORT_CACHE_TYPES: [&str; 2] = ["config", "full_page"];

pub trait CacheInvalidator {
    /// Drop the given cache types. Unknown or absent types are not an error.
    fn clean(&self, types: &[&str]) -> anyhow::Result<()>;
}

/// Cache kept on disk, one subdirectory per cache type.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    root: PathBuf,
}

impl DirectoryCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CacheInvalidator for DirectoryCache {
    fn clean(&self, types: &[&str]) -> anyhow::Result<()> {
        for cache_type in types {
            let dir = self.root.join(cache_type);
            if !dir.exists() {
                continue;
            }
            std::fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to clean cache: {}", dir.display()))?;
            tracing::debug!(cache_type, "cache cleaned");
        }
        Ok(())
    }
}
