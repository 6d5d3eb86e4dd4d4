//! Flatten command
//!
//! Turn nested reply threads back into a flat comment list.

use anyhow::{Context, Result};
use clap::Args;
use ct_core::comment::build_comment_tree;
use ct_core::config::Config;
use ct_core::export::records_from_nested;
use std::path::PathBuf;

use super::{emit, read_document};

/// Arguments for the flatten command
#[derive(Debug, Args)]
pub struct FlattenArgs {
    /// Nested JSON comment tree (stdin if omitted or `-`)
    pub input: Option<PathBuf>,

    /// Output file path (stdout if not specified)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Write compact JSON
    #[arg(long)]
    pub compact: bool,

    /// Fill in missing parent ids from the nesting
    #[arg(long)]
    pub link_parents: bool,
}

/// Execute the flatten command
pub fn execute(args: FlattenArgs, config: &Config) -> Result<()> {
    let document = read_document(args.input.as_deref())?;
    let records = records_from_nested(
        document,
        &config.input,
        &config.output.replies_field,
        args.link_parents,
    )
    .context("Failed to read nested comments")?;

    // Rebuilding rejects duplicate ids and fixes the output order
    let forest = build_comment_tree(&records)?;

    let format = if args.compact || !config.output.pretty {
        "flat-compact"
    } else {
        "flat"
    };
    emit(&forest, format, args.output.as_deref(), config)
}
