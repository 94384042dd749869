use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("PDF write error: {0}")]
    PdfWrite(String),

    #[error("PDF rasterization error: {0}")]
    Rasterize(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid render DPI: {0}. Must be between {1} and {2}")]
    InvalidDpi(f32, f32, f32),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("Invalid input pattern: {0}")]
    InvalidPattern(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
