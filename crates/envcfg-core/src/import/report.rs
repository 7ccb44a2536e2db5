//! Progress lines and run statistics.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineLevel {
    Info,
    Comment,
    Error,
}

/// Append-only sink for human-readable progress lines.
pub trait Reporter {
    fn line(&mut self, level: LineLevel, text: &str);

    fn info(&mut self, text: &str) {
        self.line(LineLevel::Info, text);
    }

    fn comment(&mut self, text: &str) {
        self.line(LineLevel::Comment, text);
    }

    fn error(&mut self, text: &str) {
        self.line(LineLevel::Error, text);
    }
}

/// Collects lines in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    lines: Vec<(LineLevel, String)>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[(LineLevel, String)] {
        &self.lines
    }

    pub fn texts(&self, level: LineLevel) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, text)| text.as_str())
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn line(&mut self, level: LineLevel, text: &str) {
        self.lines.push((level, text.to_string()));
    }
}

/// Outcome for one imported file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    /// Values handed to the sink.
    pub written: usize,
    /// Whether the whole file was skipped.
    pub skipped: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn new(file: PathBuf) -> Self {
        Self {
            file,
            written: 0,
            skipped: false,
            diagnostics: Vec::new(),
        }
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn files_processed(&self) -> usize {
        self.files.len()
    }

    pub fn total_written(&self) -> usize {
        self.files.iter().map(|f| f.written).sum()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.files.iter().flat_map(|f| f.diagnostics.iter())
    }

    pub fn has_diagnostics(&self) -> bool {
        self.diagnostics().next().is_some()
    }
}
