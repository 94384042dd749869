use crate::constants::{DEFAULT_JPEG_QUALITY, PNG_OPTIMIZATION_PRESET};
use crate::error::{ConvertError, Result};
use crate::formats::OutputFormat;
use crate::utils::validate_file_exists;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};
use oxipng::Options;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Encoder settings shared by every raster write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Quality for plain JPEG conversions (compression picks its own)
    pub jpeg_quality: u8,
    /// Run PNG output through oxipng
    pub optimize_png: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            optimize_png: false,
        }
    }
}

/// Decodes an image, sniffing the content when the extension lies.
pub fn load_image(input_path: &Path) -> Result<DynamicImage> {
    validate_file_exists(input_path)?;
    let img = ImageReader::open(input_path)?
        .with_guessed_format()?
        .decode()?;
    Ok(img)
}

/// Normalizes pixels to 8-bit RGB or RGBA, depending on what the target keeps.
pub fn prepare_pixels(img: &DynamicImage, format: OutputFormat) -> DynamicImage {
    if format.supports_alpha() && img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    }
}

pub fn encode_jpeg(rgb: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder.encode_image(rgb)?;
    Ok(buffer)
}

/// Encodes into memory so a failed encode never leaves a partial file behind.
pub fn encode_image(
    img: &DynamicImage,
    format: OutputFormat,
    options: &EncodeOptions,
) -> Result<Vec<u8>> {
    let pixels = prepare_pixels(img, format);

    let buffer = match format {
        OutputFormat::Jpeg => encode_jpeg(&pixels.to_rgb8(), options.jpeg_quality)?,
        OutputFormat::Png => {
            let mut buffer = Vec::new();
            pixels.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
            if options.optimize_png {
                optimize_png(&buffer)?
            } else {
                buffer
            }
        }
        other => {
            let mut buffer = Vec::new();
            pixels.write_to(&mut Cursor::new(&mut buffer), other.to_image_format())?;
            buffer
        }
    };

    Ok(buffer)
}

/// Lossless recompression; oxipng hands back the input when it cannot do better.
pub fn optimize_png(data: &[u8]) -> Result<Vec<u8>> {
    let options = Options::from_preset(PNG_OPTIMIZATION_PRESET);
    oxipng::optimize_from_memory(data, &options)
        .map_err(|e| ConvertError::PngOptimization(e.to_string()))
}

/// Encodes `img` as `format` at `output_path` and returns the written size.
pub fn save_image(
    img: &DynamicImage,
    output_path: &Path,
    format: OutputFormat,
    options: &EncodeOptions,
) -> Result<u64> {
    let bytes = encode_image(img, format, options)?;
    fs::write(output_path, &bytes)?;
    Ok(fs::metadata(output_path)?.len())
}
