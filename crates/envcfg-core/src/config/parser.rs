//! Settings parser with helpful error messages

use super::schema::Settings;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse envcfg.toml; a missing file yields default settings
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "settings file not found, using defaults");
        return Ok(Settings::new());
    }
    parse_settings(path)
}

/// Parse envcfg.toml with detailed error messages
pub fn parse_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    parse_settings_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))
}

/// Parse envcfg.toml content from string
pub fn parse_settings_str(content: &str) -> Result<Settings> {
    let settings: Settings =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    settings.validate()?;

    Ok(settings)
}

/// Point at the offending line when the TOML error carries a span
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let message = error.message().to_string();

    match error.span() {
        Some(span) => {
            let line_num = content[..span.start.min(content.len())]
                .matches('\n')
                .count()
                + 1;
            anyhow::anyhow!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                line_context(content, line_num),
                message
            )
        }
        None => anyhow::anyhow!("TOML parsing error: {}", message),
    }
}

/// Up to two lines either side of `line_num`, with the line itself marked
fn line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(3);
    let end = (line_num + 2).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
