//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod build;
pub mod check;
pub mod config;
pub mod flatten;
pub mod stats;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ct_core::comment::{parse_document, records_from_document, CommentForest, CommentRecord};
use ct_core::config::Config;
use ct_core::export::ExportManager;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// comment-tree - Build nested reply threads from flat comment lists
#[derive(Debug, Parser)]
#[command(name = "comment-tree")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "COMMENT_TREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a nested comment tree from a flat JSON list
    Build(build::BuildArgs),

    /// Flatten a nested comment tree back into a list
    Flatten(flatten::FlattenArgs),

    /// Show shape statistics of a comment list
    Stats(stats::StatsArgs),

    /// Check a comment list for duplicate ids, dangling parents and cycles
    Check(check::CheckArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli.config.as_deref();

    // Dispatch to command handler
    match cli.command {
        Commands::Build(args) => build::execute(args, &config::load(config_path)?),
        Commands::Flatten(args) => flatten::execute(args, &config::load(config_path)?),
        Commands::Stats(args) => stats::execute(args, &config::load(config_path)?),
        Commands::Check(args) => check::execute(args, &config::load(config_path)?),
        Commands::Config(cmd) => config::execute(cmd, config_path),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Read a JSON document from a file, or stdin for `None` and `-`
pub(crate) fn read_document(input: Option<&Path>) -> Result<serde_json::Value> {
    let (content, source) = match input {
        Some(path) if path != Path::new("-") => (
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            path.display().to_string(),
        ),
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read stdin")?;
            (content, "stdin".to_string())
        }
    };

    parse_document(&content).with_context(|| format!("Invalid JSON in {}", source))
}

/// Read the flat comment list named by `input`
pub(crate) fn read_records(input: Option<&Path>, config: &Config) -> Result<Vec<CommentRecord>> {
    let document = read_document(input)?;
    let records = records_from_document(document, &config.input)?;
    tracing::info!(count = records.len(), "Read comments");
    Ok(records)
}

/// Export a forest to a file, or stdout
pub(crate) fn emit(
    forest: &CommentForest<CommentRecord>,
    format: &str,
    output: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let manager = ExportManager::with_config(&config.output);

    match output {
        Some(path) => {
            manager.export_to_file(forest, format, path)?;
            tracing::info!(path = %path.display(), format, "Wrote output");
        }
        None => {
            let content = manager.export(forest, format)?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", content).context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_build_args() {
        let cli = Cli::try_parse_from(["comment-tree", "-vv", "build", "in.json", "--compact"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.input, Some(PathBuf::from("in.json")));
                assert!(args.compact);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_read_document_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comments.json");
        std::fs::write(&path, r#"[{"id": 1}]"#).unwrap();

        let value = read_document(Some(path.as_path())).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn test_read_document_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{").unwrap();

        let err = read_document(Some(path.as_path())).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }
}
