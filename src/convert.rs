//! Format dispatch
//!
//! Decides which conversion applies to a source, where the output lands and
//! whether to skip it because it already exists. Every path through here ends
//! in one or more [`Status`] values; errors never escape.

use crate::constants::{PAGE_SUFFIX, PDF_EXTENSION};
use crate::error::Result;
use crate::formats::{normalized_extension, OutputFormat, SourceKind, Target};
use crate::layout::{base_name, OutputLocation};
use crate::pdf::{save_image_as_pdf, PageRasterizer};
use crate::processing::{load_image, save_image, EncodeOptions};
use crate::status::{FailureKind, Skip, Status, Success};
use crate::utils::display_name;
use crate::verbose;
use image::DynamicImage;
use std::fs;
use std::path::Path;

pub struct Dispatcher {
    rasterizer: Box<dyn PageRasterizer>,
    options: EncodeOptions,
}

impl Dispatcher {
    pub fn new(rasterizer: Box<dyn PageRasterizer>, options: EncodeOptions) -> Self {
        Self {
            rasterizer,
            options,
        }
    }

    /// Converts `path` to `target`. Image sources yield one status, PDF
    /// sources one per page; unsupported combinations yield one skip.
    pub fn convert(
        &self,
        path: &Path,
        output_root: &Path,
        target: Target,
        separate_folders: bool,
    ) -> Vec<Status> {
        match (SourceKind::from_path(path), target) {
            (SourceKind::Image(_), Target::Pdf) => {
                vec![self.image_to_pdf(path, output_root, separate_folders)]
            }
            (SourceKind::Image(_), Target::Image(format)) => {
                vec![self.image_to_image(path, output_root, format, separate_folders)]
            }
            (SourceKind::Pdf, Target::Image(format)) => {
                self.pdf_to_images(path, output_root, format, separate_folders)
            }
            (SourceKind::Pdf, Target::Pdf) => {
                vec![Status::Skipped(Skip::UnsupportedTarget { target })]
            }
            (SourceKind::Unsupported(extension), _) => {
                vec![Status::Skipped(Skip::UnsupportedSource { extension })]
            }
        }
    }

    /// Images go to every other raster format plus PDF; PDFs go to JPEG pages.
    pub fn convert_all(&self, path: &Path, output_root: &Path, separate_folders: bool) -> Vec<Status> {
        match SourceKind::from_path(path) {
            SourceKind::Image(current) => {
                let mut results: Vec<Status> = OutputFormat::ALL
                    .into_iter()
                    .filter(|format| *format != current)
                    .map(|format| self.image_to_image(path, output_root, format, separate_folders))
                    .collect();
                results.push(self.image_to_pdf(path, output_root, separate_folders));
                results
            }
            SourceKind::Pdf => {
                self.pdf_to_images(path, output_root, OutputFormat::Jpeg, separate_folders)
            }
            SourceKind::Unsupported(extension) => {
                vec![Status::Skipped(Skip::UnsupportedSource { extension })]
            }
        }
    }

    fn image_to_image(
        &self,
        path: &Path,
        output_root: &Path,
        format: OutputFormat,
        separate_folders: bool,
    ) -> Status {
        let location = OutputLocation::resolve(
            output_root,
            format.name(),
            separate_folders,
            format!("{}.{}", base_name(path), format.name()),
        );
        if location.exists() {
            return Status::Skipped(Skip::AlreadyExists(location.path()));
        }

        let written = load_image(path).and_then(|img| {
            let output_path = location.prepare()?;
            save_image(&img, &output_path, format, &self.options)?;
            Ok(output_path)
        });

        match written {
            Ok(output_path) => {
                verbose!("Wrote {}", output_path.display());
                Status::Success {
                    path: output_path,
                    detail: Success::Converted {
                        target: Target::Image(format),
                    },
                }
            }
            Err(e) => Status::failed(FailureKind::Encoding, e),
        }
    }

    fn image_to_pdf(&self, path: &Path, output_root: &Path, separate_folders: bool) -> Status {
        let location = OutputLocation::resolve(
            output_root,
            PDF_EXTENSION,
            separate_folders,
            format!("{}.{}", base_name(path), PDF_EXTENSION),
        );
        if location.exists() {
            return Status::Skipped(Skip::AlreadyExists(location.path()));
        }

        let written = load_image(path).and_then(|img| {
            let output_path = location.prepare()?;
            save_image_as_pdf(&img, &output_path)?;
            Ok(output_path)
        });

        match written {
            Ok(output_path) => Status::Success {
                path: output_path,
                detail: Success::Converted { target: Target::Pdf },
            },
            Err(e) => Status::failed(FailureKind::Encoding, e),
        }
    }

    /// One status per page, written as `<stem>_page_<n>.<ext>`. A page whose
    /// output already exists is skipped before it is rendered.
    fn pdf_to_images(
        &self,
        path: &Path,
        output_root: &Path,
        format: OutputFormat,
        separate_folders: bool,
    ) -> Vec<Status> {
        let stem = base_name(path);
        let mut statuses = Vec::new();

        let visited = self.rasterizer.visit_pages(
            path,
            &mut |number: usize, render: &mut dyn FnMut() -> Result<DynamicImage>| {
                let location = OutputLocation::resolve(
                    output_root,
                    format.name(),
                    separate_folders,
                    format!("{}{}{}.{}", stem, PAGE_SUFFIX, number, format.name()),
                );
                if location.exists() {
                    statuses.push(Status::Skipped(Skip::PageExists {
                        page: number,
                        path: location.path(),
                    }));
                    return;
                }

                let written = render().and_then(|img| {
                    let output_path = location.prepare()?;
                    save_image(&img, &output_path, format, &self.options)?;
                    Ok(output_path)
                });

                statuses.push(match written {
                    Ok(output_path) => Status::Success {
                        path: output_path,
                        detail: Success::PageConverted {
                            page: number,
                            format,
                        },
                    },
                    Err(e) => Status::failed(FailureKind::Page(number), e),
                });
            },
        );

        match visited {
            Ok(0) => vec![Status::failed(
                FailureKind::Rasterize,
                format!("{} has no pages", display_name(path)),
            )],
            Ok(_) => statuses,
            Err(e) => {
                statuses.push(Status::failed(FailureKind::Rasterize, e));
                statuses
            }
        }
    }

    /// Copies the untouched source next to its conversions.
    ///
    /// In separate-folders mode the copy lands under the source extension.
    pub fn copy_original(&self, path: &Path, output_root: &Path, separate_folders: bool) -> Status {
        let location = OutputLocation::resolve(
            output_root,
            &normalized_extension(path),
            separate_folders,
            display_name(path),
        );
        if location.exists() {
            return Status::Skipped(Skip::OriginalExists(location.path()));
        }

        let copied = location.prepare().and_then(|dest| {
            fs::copy(path, &dest)?;
            Ok(dest)
        });

        match copied {
            Ok(dest) => Status::Success {
                path: dest,
                detail: Success::CopiedOriginal,
            },
            Err(e) => Status::failed(FailureKind::Copy, e),
        }
    }
}
