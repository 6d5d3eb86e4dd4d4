//! Export functionality for comment forests
//!
//! This module provides exporters for writing built forests as JSON,
//! either nested (the threaded shape) or flat (depth-first pre-order),
//! and for reading nested JSON back into records.
//!
//! # Example
//!
//! ```ignore
//! use ct_core::export::ExportManager;
//!
//! let manager = ExportManager::new();
//! let nested = manager.export(&forest, "json")?;
//! let flat = manager.export(&forest, "flat")?;
//! ```

mod exporter;
mod json;

pub use exporter::{ExportManager, Exporter};
pub use json::{records_from_nested, write_nested, FlatJsonExporter, JsonTreeExporter};
