//! Utility functions for common operations
//!
//! Helpers shared by the converter, the compressor and the batch runner.

use crate::constants::PROGRESS_BAR_TEMPLATE;
use crate::error::{ConvertError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Validate that a file exists and return a descriptive error if not
///
/// # Arguments
/// * `path` - The file path to validate
///
/// # Returns
/// * `Ok(())` if file exists, `Err(ConvertError::FileNotFound)` otherwise
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(ConvertError::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Create a progress bar over `len` files with consistent styling
///
/// Hidden when `visible` is false so quiet runs print nothing to stderr.
pub fn create_progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 KB")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Display name of a file, falling back to the whole path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
