//! Stats command
//!
//! Show the shape of the thread a comment list builds into.

use anyhow::Result;
use clap::Args;
use ct_core::comment::{CommentTreeBuilder, TreeStats};
use ct_core::config::Config;
use serde::Serialize;
use std::path::PathBuf;

use super::read_records;

/// Arguments for the stats command
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Flat JSON comment list (stdin if omitted or `-`)
    pub input: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Statistics printed by the command
#[derive(Debug, Serialize)]
struct StatsOutput {
    #[serde(flatten)]
    shape: TreeStats,
    orphans: usize,
    cycles_cut: usize,
}

/// Execute the stats command
pub fn execute(args: StatsArgs, config: &Config) -> Result<()> {
    use colored::Colorize;

    let records = read_records(args.input.as_deref(), config)?;
    let tree = CommentTreeBuilder::from_records(records).build()?;

    let output = StatsOutput {
        shape: tree.forest.stats(),
        orphans: tree.report.orphans.len(),
        cycles_cut: tree.report.cycle_broken.len(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Comment tree".bold().underline());
    println!("  Comments:     {}", output.shape.total.to_string().cyan());
    println!("  Top level:    {}", output.shape.roots.to_string().cyan());
    println!("  Leaves:       {}", output.shape.leaves.to_string().cyan());
    println!("  Max depth:    {}", output.shape.max_depth.to_string().cyan());
    println!("  Most replies: {}", output.shape.max_replies.to_string().cyan());

    if output.orphans > 0 {
        println!("  Orphans:      {}", output.orphans.to_string().yellow());
    }
    if output.cycles_cut > 0 {
        println!("  Cycles cut:   {}", output.cycles_cut.to_string().yellow());
    }

    Ok(())
}
