//! Config command
//!
//! Manage comment-tree configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use ct_core::config::Config;
use std::fs;
use std::path::{Path, PathBuf};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file location
    Path,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, explicit: Option<&Path>) -> Result<()> {
    let path = config_path(explicit);
    match cmd {
        ConfigCommand::Show { json } => show_config(explicit, json),
        ConfigCommand::Init { force } => init_config(&path, force),
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Location of the configuration file
///
/// An explicit path wins; otherwise the platform config directory.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    directories::ProjectDirs::from("", "", "comment-tree")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".comment-tree/config.toml"))
}

/// Load configuration, falling back to defaults when no file exists
///
/// A path given explicitly must exist.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let path = config_path(explicit);

    if !path.exists() {
        if explicit.is_some() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }
        tracing::debug!(path = %path.display(), "No configuration file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    tracing::debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

fn show_config(explicit: Option<&Path>, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let path = config_path(explicit);
    let config = load(explicit)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if path.exists() {
        println!("{}", path.display().to_string().dimmed());
    } else {
        println!("{}", "(defaults, no file found)".dimmed());
    }
    println!();
    print!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    use colored::Colorize;

    if path.exists() && !force {
        eprintln!(
            "{} Configuration already exists at {}. Use --force to overwrite.",
            "⚠".yellow(),
            path.display()
        );
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let content = format!(
        "# comment-tree configuration\n\n{}",
        toml::to_string_pretty(&Config::default())?
    );
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}
