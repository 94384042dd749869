//! Structured operation outcomes
//!
//! Every operation ends in a [`Status`]. Callers branch on the variants; the
//! `Display` impl renders the line written to the batch log.

use crate::formats::{OutputFormat, Target};
use crate::operations::SizeClass;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Success { path: PathBuf, detail: Success },
    Skipped(Skip),
    Failed { kind: FailureKind, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Success {
    Converted { target: Target },
    PageConverted { page: usize, format: OutputFormat },
    Compressed { size_class: SizeClass, quality: u8, bytes: u64 },
    CopiedOriginal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    AlreadyExists(PathBuf),
    PageExists { page: usize, path: PathBuf },
    OriginalExists(PathBuf),
    UnsupportedSource { extension: String },
    /// PDF asked for a target it cannot produce
    UnsupportedTarget { target: Target },
    NotCompressible { extension: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Encoding,
    Rasterize,
    Page(usize),
    /// No quality met the budget; carries the smallest size reached
    OverBudget { size_class: SizeClass, smallest: u64 },
    Copy,
    MissingSource,
}

impl Status {
    pub fn failed(kind: FailureKind, detail: impl fmt::Display) -> Self {
        Status::Failed {
            kind,
            detail: detail.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Status::Skipped(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failed { .. })
    }

    /// Path written by a successful operation
    pub fn output_path(&self) -> Option<&Path> {
        match self {
            Status::Success { path, .. } => Some(path),
            _ => None,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn folder_name(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn round_kb(bytes: u64) -> u64 {
    (bytes + 512) / 1024
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success { path, detail } => match detail {
                Success::Converted { target: Target::Pdf } => {
                    write!(f, "Converted image to PDF at {}", path.display())
                }
                Success::Converted { target } => {
                    write!(f, "Converted to {} at {}", target, path.display())
                }
                Success::PageConverted { page, format } => {
                    write!(f, "Page {} converted to {} at {}", page, format, path.display())
                }
                Success::Compressed {
                    size_class,
                    quality,
                    bytes,
                } => write!(
                    f,
                    "Successfully compressed to {} at Q={} ({} KB) at {}",
                    size_class,
                    quality,
                    round_kb(*bytes),
                    path.display()
                ),
                Success::CopiedOriginal => {
                    write!(f, "Copied original file to {}", path.display())
                }
            },
            Status::Skipped(skip) => match skip {
                Skip::AlreadyExists(path) => {
                    write!(f, "Skipped. Target file already exists: {}", file_name(path))
                }
                Skip::PageExists { page, .. } => write!(f, "Page {} skipped (exists).", page),
                Skip::OriginalExists(path) => write!(
                    f,
                    "Skipped: Original file copy already exists in {}",
                    folder_name(path)
                ),
                Skip::UnsupportedSource { extension } => {
                    write!(f, "Skipped: Unsupported source extension '{}'.", extension)
                }
                Skip::UnsupportedTarget { target } => {
                    write!(f, "Skipped: PDF cannot be converted to {}.", target)
                }
                Skip::NotCompressible { .. } => {
                    write!(f, "Skipped: Compression logic only implemented for JPG/JPEG.")
                }
            },
            Status::Failed { kind, detail } => match kind {
                FailureKind::Encoding => write!(f, "Conversion failed: {}", detail),
                FailureKind::Rasterize => write!(
                    f,
                    "PDF conversion failed (is PDFium installed?): {}",
                    detail
                ),
                FailureKind::Page(page) => write!(f, "Page {} failed conversion: {}", page, detail),
                FailureKind::OverBudget {
                    size_class,
                    smallest,
                } => write!(
                    f,
                    "Failed to compress to {}. Smallest size achieved was {} KB.",
                    size_class,
                    round_kb(*smallest)
                ),
                FailureKind::Copy => write!(f, "Failed to copy original file: {}", detail),
                FailureKind::MissingSource => write!(f, "Failed: {}", detail),
            },
        }
    }
}

/// Counts accumulated over a batch run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub files: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, status: &Status) {
        match status {
            Status::Success { .. } => self.succeeded += 1,
            Status::Skipped(_) => self.skipped += 1,
            Status::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converted_line() {
        let status = Status::Success {
            path: PathBuf::from("root/photo.jpeg"),
            detail: Success::Converted {
                target: Target::Image(OutputFormat::Jpeg),
            },
        };
        assert_eq!(status.to_string(), "Converted to JPEG at root/photo.jpeg");
        assert!(status.is_success());
        assert_eq!(status.output_path(), Some(Path::new("root/photo.jpeg")));
    }

    #[test]
    fn test_pdf_line() {
        let status = Status::Success {
            path: PathBuf::from("root/pdf/scan.pdf"),
            detail: Success::Converted { target: Target::Pdf },
        };
        assert_eq!(status.to_string(), "Converted image to PDF at root/pdf/scan.pdf");
    }

    #[test]
    fn test_skip_lines() {
        let exists = Status::Skipped(Skip::AlreadyExists(PathBuf::from("root/png/a.png")));
        assert_eq!(exists.to_string(), "Skipped. Target file already exists: a.png");
        assert!(exists.is_skipped());

        let original = Status::Skipped(Skip::OriginalExists(PathBuf::from("root/jpg/a.jpg")));
        assert_eq!(
            original.to_string(),
            "Skipped: Original file copy already exists in jpg"
        );

        let target = Status::Skipped(Skip::UnsupportedTarget { target: Target::Pdf });
        assert_eq!(target.to_string(), "Skipped: PDF cannot be converted to PDF.");
    }

    #[test]
    fn test_compression_lines_round_to_kb() {
        let ok = Status::Success {
            path: PathBuf::from("big_comp_500KB.jpg"),
            detail: Success::Compressed {
                size_class: SizeClass::Kb500,
                quality: 70,
                bytes: 400 * 1024 + 600,
            },
        };
        assert!(ok.to_string().starts_with("Successfully compressed to 500 KB at Q=70 (401 KB)"));

        let failed = Status::failed(
            FailureKind::OverBudget {
                size_class: SizeClass::Kb250,
                smallest: 300 * 1024,
            },
            "",
        );
        assert_eq!(
            failed.to_string(),
            "Failed to compress to 250 KB. Smallest size achieved was 300 KB."
        );
        assert!(failed.is_failure());
    }

    #[test]
    fn test_summary_record() {
        let mut summary = BatchSummary::default();
        summary.record(&Status::Skipped(Skip::UnsupportedSource {
            extension: "txt".into(),
        }));
        summary.record(&Status::failed(FailureKind::Copy, "denied"));
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 2);
    }
}
