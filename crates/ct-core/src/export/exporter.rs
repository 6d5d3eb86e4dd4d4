//! Exporter trait and manager

use crate::comment::{CommentForest, CommentRecord};
use crate::config::OutputConfig;
use crate::error::{Result, TreeError};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Trait for forest exporters
pub trait Exporter: Send + Sync {
    /// Export a forest to string
    fn export(&self, forest: &CommentForest<CommentRecord>) -> Result<String>;

    /// Get the format name
    fn format_name(&self) -> &str;

    /// Get the file extension
    fn file_extension(&self) -> &str;
}

/// Manager for handling multiple export formats
pub struct ExportManager {
    exporters: HashMap<String, Box<dyn Exporter>>,
}

impl ExportManager {
    /// Create a new export manager with default exporters
    pub fn new() -> Self {
        Self::with_config(&OutputConfig::default())
    }

    /// Create a manager whose nested exporters use the configured replies key
    pub fn with_config(config: &OutputConfig) -> Self {
        let mut manager = Self {
            exporters: HashMap::new(),
        };

        manager.register(Box::new(
            super::json::JsonTreeExporter::pretty().with_replies_field(&config.replies_field),
        ));
        manager.register(Box::new(
            super::json::JsonTreeExporter::compact().with_replies_field(&config.replies_field),
        ));
        manager.register(Box::new(super::json::FlatJsonExporter::new(false)));
        manager.register(Box::new(super::json::FlatJsonExporter::new(true)));

        manager
    }

    /// Register a new exporter
    pub fn register(&mut self, exporter: Box<dyn Exporter>) {
        self.exporters
            .insert(exporter.format_name().to_string(), exporter);
    }

    /// Export a forest to the specified format
    pub fn export(&self, forest: &CommentForest<CommentRecord>, format: &str) -> Result<String> {
        let exporter = self.get(format).ok_or_else(|| unknown_format(format))?;
        exporter.export(forest)
    }

    /// Export a forest to a file
    pub fn export_to_file(
        &self,
        forest: &CommentForest<CommentRecord>,
        format: &str,
        path: &Path,
    ) -> Result<()> {
        let exporter = self.get(format).ok_or_else(|| unknown_format(format))?;
        let content = exporter.export(forest)?;

        let final_path = if path.extension().is_some() {
            path.to_path_buf()
        } else {
            path.with_extension(exporter.file_extension())
        };

        write_atomic(&final_path, &content).map_err(|e| {
            TreeError::from(e).with_context(format!("Failed to write {}", final_path.display()))
        })
    }

    /// Get list of available format names
    pub fn available_formats(&self) -> Vec<String> {
        let mut formats: Vec<_> = self.exporters.keys().cloned().collect();
        formats.sort();
        formats
    }

    /// Check if a format is available
    pub fn has_format(&self, format: &str) -> bool {
        self.exporters.contains_key(format)
    }

    /// Get an exporter by format name
    pub fn get(&self, format: &str) -> Option<&dyn Exporter> {
        self.exporters.get(format).map(|e| e.as_ref())
    }
}

impl Default for ExportManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Write through a uniquely named sibling temp file, then rename over `path`
fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn unknown_format(format: &str) -> TreeError {
    TreeError::Config(format!("Unknown export format: {}", format))
}
