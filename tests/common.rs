#![allow(dead_code)]

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use mydocs::pdf::PageVisitor;
use mydocs::{ConvertError, Dispatcher, EncodeOptions, PageRasterizer, Processor, ProcessorConfig};
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// Deterministic noise so JPEG sizes depend on quality
pub fn noisy_rgb(width: u32, height: u32) -> RgbImage {
    let mut state: u32 = 0x9e37_79b9;
    RgbImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgb([r, g, b])
    })
}

pub fn write_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(16, 12, Rgb([20, 120, 220])).save(&path).unwrap();
    path
}

pub fn write_transparent_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(16, 12, Rgba([200, 10, 10, 64])).save(&path).unwrap();
    path
}

pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let bytes = mydocs::processing::encode_jpeg(&noisy_rgb(width, height), 95).unwrap();
    fs::write(&path, bytes).unwrap();
    path
}

/// Stands in for PDFium: every document has `pages` solid-colour pages.
/// `renders` counts the pages actually rasterized.
pub struct FakeRasterizer {
    pub pages: usize,
    pub renders: Rc<Cell<usize>>,
}

impl FakeRasterizer {
    pub fn new(pages: usize) -> Self {
        Self {
            pages,
            renders: Rc::new(Cell::new(0)),
        }
    }
}

impl PageRasterizer for FakeRasterizer {
    fn visit_pages(&self, path: &Path, visit: PageVisitor<'_>) -> mydocs::Result<usize> {
        if !path.is_file() {
            return Err(ConvertError::Rasterize(format!("{} is missing", path.display())));
        }
        for number in 1..=self.pages {
            let mut render = || -> mydocs::Result<DynamicImage> {
                self.renders.set(self.renders.get() + 1);
                let shade = ((number - 1) * 40) as u8;
                Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
                    20,
                    28,
                    Rgb([shade, 255 - shade, 90]),
                )))
            };
            visit(number, &mut render);
        }
        Ok(self.pages)
    }
}

pub fn write_fake_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"%PDF-1.5\n%%EOF\n").unwrap();
    path
}

pub fn processor(root: &Path, separate_folders: bool, pages: usize) -> Processor {
    processor_with(root, separate_folders, FakeRasterizer::new(pages))
}

pub fn processor_with(root: &Path, separate_folders: bool, rasterizer: FakeRasterizer) -> Processor {
    let config = ProcessorConfig::new(Some(root.to_path_buf()), separate_folders);
    let dispatcher = Dispatcher::new(Box::new(rasterizer), EncodeOptions::default());
    Processor::new(config, dispatcher).unwrap()
}

/// Relative paths of every file under `root`, sorted
pub fn list_files(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    names.sort();
    names
}
