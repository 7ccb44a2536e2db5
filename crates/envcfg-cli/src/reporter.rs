//! Terminal reporter for import progress.

use std::io::Write;

use console::style;
use envcfg_core::import::{LineLevel, Reporter};

/// Writes progress lines as they happen, coloured by level.
pub struct ConsoleReporter<W: Write> {
    writer: W,
    /// Print only error lines
    errors_only: bool,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            errors_only: false,
        }
    }

    pub fn errors_only(mut self) -> Self {
        self.errors_only = true;
        self
    }

    pub fn section(&mut self, title: &str) {
        if self.errors_only {
            return;
        }
        let _ = writeln!(self.writer);
        let _ = writeln!(self.writer, "{}", style(title).bold().cyan());
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn line(&mut self, level: LineLevel, text: &str) {
        if self.errors_only && level != LineLevel::Error {
            return;
        }
        let styled = match level {
            LineLevel::Info => style(text).green(),
            LineLevel::Comment => style(text).yellow(),
            LineLevel::Error => style(text).red(),
        };
        // A closed pipe must not abort an import halfway.
        let _ = writeln!(self.writer, "{styled}");
    }
}
