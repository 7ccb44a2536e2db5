//! Recurring import run on deploy.
//!
//! Controlled by `[auto_update]` in the settings. When enabled, the configured
//! folder is processed with the configured format and without cleaning the
//! cache; the deploy is expected to flush caches itself.

use super::process::{ProcessCommand, ProcessOptions, ProcessReport};
use crate::import::Reporter;

#[derive(Debug, Clone)]
pub struct AutoUpdateCommand {
    process: ProcessCommand,
}

impl AutoUpdateCommand {
    pub fn new(process: ProcessCommand) -> Self {
        Self { process }
    }

    /// Options the recurring run uses, or `None` when it is disabled.
    pub fn options(&self) -> anyhow::Result<Option<ProcessOptions>> {
        let auto = &self.process.context().settings().auto_update;
        if !auto.enabled {
            return Ok(None);
        }
        Ok(Some(
            ProcessOptions::new(&auto.directory)
                .with_format(auto.format()?)
                .with_clear_cache(false),
        ))
    }

    pub fn execute(&self, reporter: &mut dyn Reporter) -> anyhow::Result<Option<ProcessReport>> {
        let Some(options) = self.options()? else {
            tracing::debug!("auto update disabled");
            return Ok(None);
        };

        reporter.info(&format!(
            "Running: envcfg process {} --format {} --no-cache",
            options.folder.display(),
            options.format
        ));
        self.process.execute(&options, reporter).map(Some)
    }
}
