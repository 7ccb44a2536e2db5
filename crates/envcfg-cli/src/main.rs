//! envcfg - environment config importer
//!
//! Usage:
//!   envcfg process [FOLDER] [-f yaml|yml|json]   # Import a folder
//!   envcfg auto-update                           # Recurring import on deploy

mod reporter;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use envcfg_core::commands::{
    AutoUpdateCommand, DEFAULT_FOLDER, ProcessCommand, ProcessOptions, ProcessReport,
};
use envcfg_core::context::AppContext;
use envcfg_core::types::FileFormat;

use crate::reporter::ConsoleReporter;

#[derive(Parser)]
#[command(name = "envcfg")]
#[command(about = "Import scoped config values for an environment", long_about = None)]
struct Cli {
    /// Settings file (defaults to ./envcfg.toml)
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import config values from a folder of YAML or JSON files
    Process {
        /// Import folder name
        #[arg(default_value = DEFAULT_FOLDER)]
        folder: PathBuf,

        /// Format: yaml, yml or json
        #[arg(short, long, default_value = "yaml", value_parser = parse_format)]
        format: FileFormat,

        /// Directory depth filter, e.g. "< 2" (repeatable, all must hold)
        #[arg(long, value_name = "EXPR")]
        depth: Vec<String>,

        /// Do not clear cache after config data import
        #[arg(long)]
        no_cache: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        output: OutputFormat,
    },

    /// Run the import configured under [auto_update], if enabled
    AutoUpdate,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Progress lines as they happen
    #[default]
    Table,
    /// Machine-readable JSON report
    Json,
    /// Only show problems (non-zero exit if any)
    Quiet,
}

fn parse_format(s: &str) -> std::result::Result<FileFormat, String> {
    s.parse().map_err(|e: envcfg_core::error::ImportError| e.to_string())
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "envcfg=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::with_defaults(cli.settings.as_deref())?;

    match cli.command {
        Commands::Process {
            folder,
            format,
            depth,
            no_cache,
            output,
        } => {
            let mut options = ProcessOptions::new(folder)
                .with_format(format)
                .with_clear_cache(!no_cache);
            for expr in depth {
                options = options.with_depth(expr);
            }
            run_process(ctx, &options, output)?;
        }
        Commands::AutoUpdate => run_auto_update(ctx)?,
    }

    Ok(())
}

fn run_process(ctx: AppContext, options: &ProcessOptions, output: OutputFormat) -> Result<()> {
    tracing::debug!(
        folder = %options.folder.display(),
        format = %options.format,
        depth = ?options.depth,
        "starting import"
    );
    let cmd = ProcessCommand::new(ctx);

    match output {
        OutputFormat::Table => {
            let mut reporter = ConsoleReporter::new(std::io::stdout());
            reporter.section("Start Import");
            let report = cmd.execute(options, &mut reporter)?;
            print_summary(&report);
        }
        OutputFormat::Json => {
            let mut reporter = ConsoleReporter::new(std::io::stderr()).errors_only();
            let report = cmd.execute(options, &mut reporter)?;
            print_json(&report)?;
        }
        OutputFormat::Quiet => {
            let mut reporter = ConsoleReporter::new(std::io::stderr()).errors_only();
            let report = cmd.execute(options, &mut reporter)?;
            if report.run.has_diagnostics() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn run_auto_update(ctx: AppContext) -> Result<()> {
    let cmd = AutoUpdateCommand::new(ProcessCommand::new(ctx));
    let mut reporter = ConsoleReporter::new(std::io::stdout());

    match cmd.execute(&mut reporter)? {
        Some(report) => print_summary(&report),
        None => println!("Auto update is disabled."),
    }
    Ok(())
}

fn print_summary(report: &ProcessReport) {
    println!();
    println!(
        "✓ Imported {} value(s) from {} file(s)",
        report.run.total_written(),
        report.run.files_processed()
    );
    let skipped = report.run.files.iter().filter(|f| f.skipped).count();
    if skipped > 0 {
        println!("  ⚠ {} file(s) skipped", skipped);
    }
    let problems = report.run.diagnostics().count();
    if problems > 0 {
        println!("  ⚠ {} problem(s) reported", problems);
    }
}

fn print_json(report: &ProcessReport) -> Result<()> {
    let output = serde_json::json!({
        "files_processed": report.run.files_processed(),
        "total_written": report.run.total_written(),
        "cache_cleared": report.cache_cleared,
        "files": report.run.files,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn process_defaults() {
        let cli = Cli::try_parse_from(["envcfg", "process"]).unwrap();
        let Commands::Process {
            folder,
            format,
            no_cache,
            ..
        } = cli.command
        else {
            panic!("expected process command");
        };
        assert_eq!(folder, PathBuf::from(".environment"));
        assert_eq!(format, FileFormat::Yaml);
        assert!(!no_cache);
    }

    #[test]
    fn unknown_format_is_a_usage_error() {
        let err = Cli::try_parse_from(["envcfg", "process", "-f", "xml"])
            .err()
            .expect("xml should be rejected");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn depth_is_repeatable() {
        let cli = Cli::try_parse_from([
            "envcfg", "process", "env", "--depth", ">= 1", "--depth", "< 3", "--no-cache",
        ])
        .unwrap();
        let Commands::Process { depth, no_cache, .. } = cli.command else {
            panic!("expected process command");
        };
        assert_eq!(depth, [">= 1", "< 3"]);
        assert!(no_cache);
    }
}
