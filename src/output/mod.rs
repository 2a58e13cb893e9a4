//! Output writers and renderers for analysis reports.
//!
//! This module handles:
//! - JSON reports (write and read back)
//! - The human-readable terminal report
//! - Mermaid call flow diagrams

pub mod json;
pub mod mermaid;
pub mod report;

// Re-export main functions
pub use json::{read_report, write_report};
pub use mermaid::{render_mermaid, write_diagram};
pub use report::render_text_report;

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
