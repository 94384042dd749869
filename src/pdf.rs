//! PDF collaborators
//!
//! Writing goes through `lopdf`: an image becomes a one-page document whose
//! page is the image at 72 DPI, embedded as a DCT (JPEG) stream.
//! Rasterizing goes through the [`PageRasterizer`] trait, page by page, so
//! the caller can skip pages whose output already exists without rendering
//! them. The default implementation binds PDFium at call time so a missing
//! library only fails the PDF operations, not the whole batch.

use crate::constants::{
    DEFAULT_RENDER_DPI, MAX_RENDER_DPI, MIN_RENDER_DPI, PDF_EMBED_JPEG_QUALITY,
    PDF_POINTS_PER_INCH,
};
use crate::error::{ConvertError, Result};
use crate::processing::encode_jpeg;
use image::{DynamicImage, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};
use pdfium_render::prelude::*;
use std::fs;
use std::path::Path;

/// Called once per page with the 1-based page number and a renderer for that
/// page. Pages whose renderer is never invoked are not rasterized.
pub type PageVisitor<'a> = &'a mut dyn FnMut(usize, &mut dyn FnMut() -> Result<DynamicImage>);

/// Renders the pages of a PDF document into raster images, one at a time.
pub trait PageRasterizer {
    /// Opens `path` and offers its pages to `visit` in order. Fails only when
    /// the document cannot be opened; returns the page count.
    fn visit_pages(&self, path: &Path, visit: PageVisitor<'_>) -> Result<usize>;
}

/// PDFium-backed rasterizer
#[derive(Debug, Clone)]
pub struct PdfiumRasterizer {
    dpi: f32,
}

impl PdfiumRasterizer {
    pub fn new(dpi: f32) -> Result<Self> {
        if !(MIN_RENDER_DPI..=MAX_RENDER_DPI).contains(&dpi) {
            return Err(ConvertError::InvalidDpi(dpi, MIN_RENDER_DPI, MAX_RENDER_DPI));
        }
        Ok(Self { dpi })
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    /// Looks next to the working directory first, then on the system path.
    fn bind() -> Result<Pdfium> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| ConvertError::Rasterize(e.to_string()))?;
        Ok(Pdfium::new(bindings))
    }
}

impl Default for PdfiumRasterizer {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_RENDER_DPI,
        }
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn visit_pages(&self, path: &Path, visit: PageVisitor<'_>) -> Result<usize> {
        let pdfium = Self::bind()?;
        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| ConvertError::Rasterize(e.to_string()))?;

        let config = PdfRenderConfig::new().scale_page_by_factor(self.dpi / PDF_POINTS_PER_INCH);

        let pages = document.pages();
        let count = pages.len() as usize;
        for (index, page) in pages.iter().enumerate() {
            let mut render = || render_page(&page, &config);
            visit(index + 1, &mut render);
        }

        Ok(count)
    }
}

fn render_page(page: &PdfPage<'_>, config: &PdfRenderConfig) -> Result<DynamicImage> {
    let bitmap = page
        .render_with_config(config)
        .map_err(|e| ConvertError::Rasterize(e.to_string()))?;
    let width = bitmap.width() as u32;
    let height = bitmap.height() as u32;
    let rgba = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes()).ok_or_else(|| {
        ConvertError::Rasterize(format!("bitmap size does not match {}x{}", width, height))
    })?;
    Ok(DynamicImage::ImageRgba8(rgba))
}

/// Builds a single-page PDF holding `img`, flattened to RGB.
pub fn image_to_pdf_bytes(img: &DynamicImage) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let jpeg_bytes = encode_jpeg(&rgb, PDF_EMBED_JPEG_QUALITY)?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut image_dict = Dictionary::new();
    image_dict.set("Type", Object::Name(b"XObject".to_vec()));
    image_dict.set("Subtype", Object::Name(b"Image".to_vec()));
    image_dict.set("Width", Object::Integer(width as i64));
    image_dict.set("Height", Object::Integer(height as i64));
    image_dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    image_dict.set("BitsPerComponent", Object::Integer(8));
    image_dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
    let image_id = doc.add_object(Stream::new(image_dict, jpeg_bytes).with_compression(false));

    // Place the image over the whole page: scale the unit square to width x height.
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(width as i64),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(height as i64),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_bytes = content
        .encode()
        .map_err(|e| ConvertError::PdfWrite(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content_bytes));

    let mut xobjects = Dictionary::new();
    xobjects.set("Im0", Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut page = Dictionary::new();
    page.set("Type", Object::Name(b"Page".to_vec()));
    page.set("Parent", Object::Reference(pages_id));
    page.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(width as i64),
            Object::Integer(height as i64),
        ]),
    );
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Reference(content_id));
    let page_id = doc.add_object(page);

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    pages.set("Count", Object::Integer(1));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| ConvertError::PdfWrite(e.to_string()))?;
    Ok(output)
}

/// Writes `img` as a one-page PDF and returns the written size.
pub fn save_image_as_pdf(img: &DynamicImage, output_path: &Path) -> Result<u64> {
    let bytes = image_to_pdf_bytes(img)?;
    fs::write(output_path, &bytes)?;
    Ok(fs::metadata(output_path)?.len())
}
