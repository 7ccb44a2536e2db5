//! Process command implementation.
//!
//! Wires the configured store, scope catalog and encryption key into an
//! import pipeline, runs it over one folder and optionally cleans the cache.

use std::path::PathBuf;

use crate::cache::{CacheInvalidator, IMPORT_CACHE_TYPES};
use crate::context::AppContext;
use crate::fs::{DepthRange, DiscoveryQuery};
use crate::import::{ImportPipeline, Reporter, RunReport};
use crate::reader::reader_for_format;
use crate::types::FileFormat;

/// Folder imported when none is given
pub const DEFAULT_FOLDER: &str = ".environment";

/// Options for the process command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Folder holding the import files
    pub folder: PathBuf,
    /// Import file format
    pub format: FileFormat,
    /// Depth expressions, all of which must hold
    pub depth: Vec<String>,
    /// Clean config caches after the import
    pub clear_cache: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self::new(DEFAULT_FOLDER)
    }
}

impl ProcessOptions {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            format: FileFormat::Yaml,
            depth: Vec::new(),
            clear_cache: true,
        }
    }

    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = format;
        self
    }

    /// Add a depth expression such as `"< 2"`
    pub fn with_depth(mut self, expr: impl Into<String>) -> Self {
        self.depth.push(expr.into());
        self
    }

    pub fn with_clear_cache(mut self, clear_cache: bool) -> Self {
        self.clear_cache = clear_cache;
        self
    }
}

/// Report from a process run
#[derive(Debug, Clone)]
pub struct ProcessReport {
    pub run: RunReport,
    pub cache_cleared: bool,
}

#[derive(Debug, Clone)]
pub struct ProcessCommand {
    ctx: AppContext,
}

impl ProcessCommand {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(AppContext::with_defaults(None)?))
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn execute(
        &self,
        options: &ProcessOptions,
        reporter: &mut dyn Reporter,
    ) -> anyhow::Result<ProcessReport> {
        // Every input check happens before anything is written.
        let depth = if options.depth.is_empty() {
            None
        } else {
            Some(DepthRange::parse(&options.depth)?)
        };
        let folder = self.ctx.resolve_folder(&options.folder);
        let query = DiscoveryQuery::new(folder, options.format, depth)?;

        let reader = reader_for_format(options.format);
        let mut store = self.ctx.config_store()?;
        let catalog = self.ctx.scope_catalog();
        let transformer = self.ctx.value_transformer();

        let run = ImportPipeline::new(reader.as_ref(), &mut store, catalog, catalog, &transformer)
            .run(&query, reporter)?;

        let cache_cleared = if options.clear_cache {
            self.ctx.cache().clean(&IMPORT_CACHE_TYPES)?;
            reporter.info("Cache cleared.");
            true
        } else {
            false
        };

        Ok(ProcessReport { run, cache_cleared })
    }
}
