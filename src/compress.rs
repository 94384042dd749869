//! Size-constrained JPEG compression
//!
//! Quality-descent: encode at 90, 80, ..., 10 into the same output path and
//! stop at the first attempt whose file fits the budget. The winner is the
//! highest passing quality, not the smallest file.

use crate::constants::{
    COMPRESSED_SUBFOLDER, COMPRESSED_SUFFIX, COMPRESS_MIN_QUALITY, COMPRESS_QUALITY_STEP,
    COMPRESS_START_QUALITY,
};
use crate::error::Result;
use crate::formats::{is_jpeg_file, normalized_extension};
use crate::layout::{base_name, OutputLocation};
use crate::operations::SizeClass;
use crate::processing::{encode_jpeg, load_image};
use crate::status::{FailureKind, Skip, Status, Success};
use crate::utils::format_file_size;
use crate::verbose;
use image::RgbImage;
use std::fs;
use std::path::Path;

/// Result of a quality-descent search over one output path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The file at the output path was encoded at `quality` and is `bytes` long
    Fits { quality: u8, bytes: u64 },
    /// Nothing fit; the output path has been removed
    TooLarge { smallest: u64 },
}

/// Qualities tried, highest first
pub fn quality_steps() -> impl Iterator<Item = u8> {
    (COMPRESS_MIN_QUALITY..=COMPRESS_START_QUALITY)
        .rev()
        .step_by(COMPRESS_QUALITY_STEP as usize)
}

/// Runs the descent for an already flattened image.
///
/// Every attempt overwrites `output_path`, so only the final attempt's bytes
/// persist. If an encode or write fails midway the candidate is removed
/// before the error is returned.
pub fn quality_descent(rgb: &RgbImage, output_path: &Path, max_bytes: u64) -> Result<SearchOutcome> {
    let mut smallest = u64::MAX;

    for quality in quality_steps() {
        let attempt = encode_jpeg(rgb, quality).and_then(|bytes| {
            fs::write(output_path, &bytes)?;
            Ok(fs::metadata(output_path)?.len())
        });
        let size = match attempt {
            Ok(size) => size,
            Err(e) => {
                let _ = fs::remove_file(output_path);
                return Err(e);
            }
        };

        verbose!(
            "Q={} -> {} (budget {})",
            quality,
            format_file_size(size),
            format_file_size(max_bytes)
        );
        smallest = smallest.min(size);
        if size <= max_bytes {
            return Ok(SearchOutcome::Fits {
                quality,
                bytes: size,
            });
        }
    }

    fs::remove_file(output_path)?;
    Ok(SearchOutcome::TooLarge { smallest })
}

/// Where a compression result for `path` lands
pub fn compressed_location(
    path: &Path,
    output_root: &Path,
    size_class: SizeClass,
    separate_folders: bool,
) -> OutputLocation {
    OutputLocation::resolve(
        output_root,
        COMPRESSED_SUBFOLDER,
        separate_folders,
        format!("{}{}{}.jpg", base_name(path), COMPRESSED_SUFFIX, size_class.suffix()),
    )
}

/// Compresses a JPEG source under the size class ceiling.
pub fn compress_to_size(
    path: &Path,
    output_root: &Path,
    size_class: SizeClass,
    separate_folders: bool,
) -> Status {
    if !is_jpeg_file(path) {
        return Status::Skipped(Skip::NotCompressible {
            extension: normalized_extension(path),
        });
    }

    let location = compressed_location(path, output_root, size_class, separate_folders);
    if location.exists() {
        return Status::Skipped(Skip::AlreadyExists(location.path()));
    }

    let searched = load_image(path).and_then(|img| {
        let output_path = location.prepare()?;
        let outcome = quality_descent(&img.to_rgb8(), &output_path, size_class.max_bytes())?;
        Ok((output_path, outcome))
    });

    match searched {
        Ok((output_path, SearchOutcome::Fits { quality, bytes })) => Status::Success {
            path: output_path,
            detail: Success::Compressed {
                size_class,
                quality,
                bytes,
            },
        },
        Ok((_, SearchOutcome::TooLarge { smallest })) => Status::failed(
            FailureKind::OverBudget {
                size_class,
                smallest,
            },
            format!("no quality down to {} fits {}", COMPRESS_MIN_QUALITY, size_class),
        ),
        Err(e) => Status::failed(FailureKind::Encoding, e),
    }
}

/// One status per size class, largest ceiling first.
pub fn compress_to_all_sizes(path: &Path, output_root: &Path, separate_folders: bool) -> Vec<Status> {
    SizeClass::LARGEST_FIRST
        .into_iter()
        .map(|size_class| compress_to_size(path, output_root, size_class, separate_folders))
        .collect()
}
