//! The import pipeline: discover, parse, expand, persist, report.

use std::path::Path;

use serde_json::{Map, Value};

use super::report::{FileReport, Reporter, RunReport};
use crate::error::{Diagnostic, ImportError, Result};
use crate::fs::{DiscoveryQuery, locate};
use crate::reader::FormatReader;
use crate::scope::{ScopeExpander, ScopeResolver, ScopeValidator};
use crate::sink::ConfigSink;
use crate::transform::ValueTransformer;

/// Collaborators are borrowed for the lifetime of the pipeline so callers
/// keep access to the sink once a run is over.
pub struct ImportPipeline<'a> {
    reader: &'a dyn FormatReader,
    sink: &'a mut dyn ConfigSink,
    validator: &'a dyn ScopeValidator,
    resolver: &'a dyn ScopeResolver,
    transformer: &'a ValueTransformer,
}

impl<'a> ImportPipeline<'a> {
    pub fn new(
        reader: &'a dyn FormatReader,
        sink: &'a mut dyn ConfigSink,
        validator: &'a dyn ScopeValidator,
        resolver: &'a dyn ScopeResolver,
        transformer: &'a ValueTransformer,
    ) -> Self {
        Self {
            reader,
            sink,
            validator,
            resolver,
            transformer,
        }
    }

    /// Import every file matched by `query`.
    ///
    /// Files are processed one after the other. A file that cannot be read or
    /// is not a map is skipped; values already written stay written when a
    /// later write fails.
    pub fn run(&mut self, query: &DiscoveryQuery, reporter: &mut dyn Reporter) -> Result<RunReport> {
        let files = locate(query);
        if files.is_empty() {
            return Err(ImportError::NoFilesFound {
                format: query.format(),
            });
        }
        tracing::debug!(count = files.len(), root = %query.root().display(), "located import files");

        let mut report = RunReport::default();
        for file in files {
            let file_report = self.import_file(&file, reporter)?;
            report.files.push(file_report);
        }
        Ok(report)
    }

    fn import_file(&mut self, file: &Path, reporter: &mut dyn Reporter) -> Result<FileReport> {
        let mut file_report = FileReport::new(file.to_path_buf());

        let configurations = match self.read_configurations(file) {
            Ok(configurations) => configurations,
            Err(diagnostic) => {
                emit(reporter, &diagnostic);
                file_report.skipped = true;
                file_report.diagnostics.push(diagnostic);
                return Ok(file_report);
            }
        };

        let expander = ScopeExpander::new(self.validator, self.transformer);
        for (path, scopes) in &configurations {
            let expansion = expander.expand(path, scopes)?;
            for diagnostic in expansion.diagnostics {
                emit(reporter, &diagnostic);
                file_report.diagnostics.push(diagnostic);
            }

            for assignment in expansion.assignments {
                let resolved = self
                    .resolver
                    .resolve(&assignment.scope_id, &assignment.scope)
                    .map_err(|source| ImportError::ScopeResolution {
                        scope: assignment.scope.clone(),
                        scope_id: assignment.scope_id.clone(),
                        source,
                    })?;

                let scope = self.resolver.canonical_scope(&assignment.scope);
                self.sink
                    .save(&assignment.path, &assignment.value, scope, &resolved)
                    .map_err(|source| ImportError::SinkWrite {
                        path: assignment.path.clone(),
                        scope: scope.to_string(),
                        scope_id: resolved.clone(),
                        source,
                    })?;

                tracing::debug!(
                    path = %assignment.path,
                    scope,
                    scope_id = %resolved,
                    "saved config value"
                );
                reporter.comment(&format!("{} => {}", assignment.path, assignment.value));
                file_report.written += 1;
            }
        }

        tracing::info!(file = %file.display(), written = file_report.written, "processed import file");
        reporter.info(&format!(
            "Processed: {} with {} value(s).",
            file.display(),
            file_report.written
        ));
        Ok(file_report)
    }

    fn read_configurations(&self, file: &Path) -> std::result::Result<Map<String, Value>, Diagnostic> {
        match self.reader.parse(file) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(Diagnostic::MalformedFile {
                file: file.to_path_buf(),
                detail: format!("not an array: {other}"),
            }),
            Err(err) => Err(Diagnostic::MalformedFile {
                file: file.to_path_buf(),
                detail: format!("{err:#}"),
            }),
        }
    }
}

fn emit(reporter: &mut dyn Reporter, diagnostic: &Diagnostic) {
    tracing::warn!(%diagnostic, "import diagnostic");
    reporter.error(&diagnostic.to_string());
}
