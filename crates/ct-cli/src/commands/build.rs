//! Build command
//!
//! Turn a flat comment list into nested reply threads.

use anyhow::Result;
use clap::Args;
use ct_core::comment::{BuildReport, CommentTreeBuilder};
use ct_core::config::Config;
use std::path::PathBuf;

use super::{emit, read_records};

/// Arguments for the build command
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Flat JSON comment list (stdin if omitted or `-`)
    pub input: Option<PathBuf>,

    /// Output file path (stdout if not specified)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Write compact JSON
    #[arg(long)]
    pub compact: bool,
}

/// Execute the build command
pub fn execute(args: BuildArgs, config: &Config) -> Result<()> {
    let records = read_records(args.input.as_deref(), config)?;
    let tree = CommentTreeBuilder::from_records(records).build()?;

    report_placement(&tree.report);

    let format = if args.compact || !config.output.pretty {
        "json-compact"
    } else {
        "json"
    };
    emit(&tree.forest, format, args.output.as_deref(), config)
}

fn report_placement(report: &BuildReport) {
    use colored::Colorize;

    if !report.orphans.is_empty() {
        eprintln!(
            "{} {} comment(s) reply to a missing parent and were placed at top level",
            "⚠".yellow(),
            report.orphans.len().to_string().yellow()
        );
    }
    if !report.cycle_broken.is_empty() {
        eprintln!(
            "{} {} parent cycle(s) cut; promoted {}",
            "⚠".yellow(),
            report.cycle_broken.len().to_string().yellow(),
            report
                .cycle_broken
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
}
