//! Source and target format handling
//!
//! Sources are classified by extension into raster images or PDF documents.
//! Targets are either a raster format or a PDF rendition.

use crate::constants::{IMAGE_EXTENSIONS, PDF_EXTENSION};
use crate::error::{ConvertError, Result};
use image::ImageFormat;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Raster formats the converter can read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Png,
    /// Covers both `.jpg` and `.jpeg`
    Jpeg,
    WebP,
    Bmp,
    Tiff,
}

impl OutputFormat {
    /// Order used by "convert all"
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Png,
        OutputFormat::Jpeg,
        OutputFormat::WebP,
        OutputFormat::Bmp,
        OutputFormat::Tiff,
    ];

    /// Lowercase target name, used as file extension and subfolder name
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::WebP => "webp",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
        }
    }

    pub fn to_image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::WebP => ImageFormat::WebP,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
        }
    }

    /// Whether the encoder can keep an alpha channel
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, OutputFormat::Jpeg)
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::WebP),
            "bmp" => Some(OutputFormat::Bmp),
            "tiff" => Some(OutputFormat::Tiff),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name().to_uppercase())
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        OutputFormat::from_extension(s).ok_or_else(|| ConvertError::UnsupportedFormat(s.to_string()))
    }
}

/// What a conversion produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Pdf,
    Image(OutputFormat),
}

impl Target {
    pub fn name(&self) -> &'static str {
        match self {
            Target::Pdf => PDF_EXTENSION,
            Target::Image(format) => format.name(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name().to_uppercase())
    }
}

impl FromStr for Target {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case(PDF_EXTENSION) {
            return Ok(Target::Pdf);
        }
        OutputFormat::from_str(s).map(Target::Image)
    }
}

/// Classification of an input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Image(OutputFormat),
    Pdf,
    /// Carries the normalized extension for reporting
    Unsupported(String),
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Self {
        let extension = normalized_extension(path);
        if extension == PDF_EXTENSION {
            return SourceKind::Pdf;
        }
        match OutputFormat::from_extension(&extension) {
            Some(format) => SourceKind::Image(format),
            None => SourceKind::Unsupported(extension),
        }
    }
}

/// Lowercased extension without the leading dot, empty when absent
pub fn normalized_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().trim_start_matches('.').to_lowercase())
        .unwrap_or_default()
}

/// Whether the path carries one of the convertible extensions
pub fn is_supported_file(path: &Path) -> bool {
    let extension = normalized_extension(path);
    extension == PDF_EXTENSION || IMAGE_EXTENSIONS.contains(&extension.as_str())
}

pub fn is_jpeg_file(path: &Path) -> bool {
    matches!(normalized_extension(path).as_str(), "jpg" | "jpeg")
}
