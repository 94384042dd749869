pub mod logger;

pub mod batch;
pub mod cli;
pub mod compress;
pub mod constants;
pub mod convert;
pub mod error;
pub mod formats;
pub mod layout;
pub mod operations;
pub mod pdf;
pub mod processing;
pub mod sink;
pub mod status;
pub mod utils;

pub use batch::{collect_input_files, default_output_root, Processor, ProcessorConfig};
pub use compress::{compress_to_all_sizes, compress_to_size, quality_descent, SearchOutcome};
pub use convert::Dispatcher;
pub use error::{ConvertError, Result};
pub use formats::{OutputFormat, SourceKind, Target};
pub use layout::OutputLocation;
pub use operations::{Operation, SizeClass};
pub use pdf::{PageRasterizer, PageVisitor, PdfiumRasterizer};
pub use processing::EncodeOptions;
pub use sink::{ConsoleSink, LogSink, MemorySink};
pub use status::{BatchSummary, FailureKind, Skip, Status, Success};
