/// Name of the output root created next to the executable.
pub const OUTPUT_DIR_NAME: &str = "myDocs";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "tiff"];
pub const PDF_EXTENSION: &str = "pdf";

// Quality-descent search: 90, 80, ..., 10
pub const COMPRESS_START_QUALITY: u8 = 90;
pub const COMPRESS_QUALITY_STEP: u8 = 10;
pub const COMPRESS_MIN_QUALITY: u8 = 10;

pub const DEFAULT_JPEG_QUALITY: u8 = 75;
pub const PDF_EMBED_JPEG_QUALITY: u8 = 95;

pub const DEFAULT_RENDER_DPI: f32 = 200.0;
pub const PDF_POINTS_PER_INCH: f32 = 72.0;
pub const MIN_RENDER_DPI: f32 = 36.0;
pub const MAX_RENDER_DPI: f32 = 600.0;

pub const PNG_OPTIMIZATION_PRESET: u8 = 2;

pub const COMPRESSED_SUBFOLDER: &str = "compressed";
pub const PAGE_SUFFIX: &str = "_page_";
pub const COMPRESSED_SUFFIX: &str = "_comp_";

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

// Batch log markers
pub const NO_FILES_MESSAGE: &str = "ERROR: No files selected. Processing aborted.";
pub const NO_OPTIONS_MESSAGE: &str = "WARNING: No processing options selected. Nothing to do.";
pub const COMPLETION_MARKER: &str = "--- ALL PROCESSING COMPLETE ---";

// Console message prefixes
pub const SUMMARY_PREFIX: &str = "📊";
pub const SUCCESS_PREFIX: &str = "✅";
pub const SKIP_PREFIX: &str = "⏭️";
pub const FAILURE_PREFIX: &str = "❌";
pub const INFO_PREFIX: &str = "📋";
