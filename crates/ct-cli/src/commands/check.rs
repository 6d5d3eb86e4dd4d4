//! Check command
//!
//! Report problems in a flat comment list without building it.

use anyhow::Result;
use clap::Args;
use ct_core::comment::{Level, ThreadValidator, ValidationReport};
use ct_core::config::Config;
use std::path::PathBuf;

use super::read_records;

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Flat JSON comment list (stdin if omitted or `-`)
    pub input: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the check command
pub fn execute(args: CheckArgs, config: &Config) -> Result<()> {
    let records = read_records(args.input.as_deref(), config)?;
    let report = ThreadValidator::new().validate(&records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.has_errors() {
        anyhow::bail!(
            "{} error(s) found; the list cannot be built into a tree",
            report.count(Level::Error)
        );
    }

    Ok(())
}

fn print_report(report: &ValidationReport) {
    use colored::Colorize;

    for diagnostic in &report.diagnostics {
        let level = match diagnostic.level() {
            Level::Error => "✗ error".red(),
            Level::Warning => "⚠ warning".yellow(),
        };
        println!(
            "{} [{}] comment {}: {}",
            level,
            diagnostic.position,
            diagnostic.id.to_string().cyan(),
            diagnostic.problem
        );
    }

    if report.is_clean() {
        println!(
            "{} {} comment(s) checked, no problems",
            "✓".green(),
            report.checked
        );
    } else {
        println!(
            "{} comment(s) checked: {} error(s), {} warning(s)",
            report.checked,
            report.count(Level::Error),
            report.count(Level::Warning)
        );
    }
}
