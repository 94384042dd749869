use crate::compress::{compress_to_all_sizes, compress_to_size};
use crate::constants::{COMPLETION_MARKER, NO_FILES_MESSAGE, NO_OPTIONS_MESSAGE, OUTPUT_DIR_NAME};
use crate::convert::Dispatcher;
use crate::error::{ConvertError, Result};
use crate::formats::is_supported_file;
use crate::layout::ensure_dir;
use crate::operations::Operation;
use crate::sink::LogSink;
use crate::status::{BatchSummary, FailureKind, Status};
use crate::utils::{display_name, validate_file_exists};
use crate::warn;
use glob::glob;
use std::env;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory of the running executable, or the working directory when the
/// executable location cannot be resolved.
pub fn app_root() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `myDocs` inside [`app_root`]
pub fn default_output_root() -> PathBuf {
    app_root().join(OUTPUT_DIR_NAME)
}

/// `path` relative to `base` when it lies beneath it, else `path` unchanged
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

fn has_glob_syntax(input: &str) -> bool {
    input.contains(&['*', '?', '['][..])
}

/// Expands CLI inputs into the list of files to process.
///
/// Explicit files pass through as given so the dispatcher can report
/// unsupported extensions, and so does a plain path that does not exist, which
/// the processor reports as a missing source. Directories and glob matches
/// are filtered to the supported extensions; hidden entries are ignored.
pub fn collect_input_files(inputs: &[String], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let input_path = Path::new(input);

        if input_path.is_file() {
            files.push(input_path.to_path_buf());
        } else if input_path.is_dir() {
            let walker = if recursive {
                WalkDir::new(input_path)
            } else {
                WalkDir::new(input_path).max_depth(1)
            };

            for entry in walker
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
            {
                let entry = entry?;
                let path = entry.path();
                if path.is_file() && is_supported_file(path) {
                    files.push(path.to_path_buf());
                }
            }
        } else if has_glob_syntax(input) {
            let pattern = glob(input).map_err(|e| ConvertError::InvalidPattern(e.to_string()))?;
            let before = files.len();
            for entry in pattern.flatten() {
                if entry.is_file() && is_supported_file(&entry) {
                    files.push(entry);
                }
            }
            if files.len() == before {
                warn!("No supported files match {}", input);
            }
        } else {
            files.push(input_path.to_path_buf());
        }
    }

    Ok(files)
}

/// Run-wide settings, fixed at start-up
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub output_root: PathBuf,
    pub separate_folders: bool,
    /// Base for the "Outputting to" line
    pub app_root: PathBuf,
}

impl ProcessorConfig {
    pub fn new(output_root: Option<PathBuf>, separate_folders: bool) -> Self {
        Self {
            output_root: output_root.unwrap_or_else(default_output_root),
            separate_folders,
            app_root: app_root(),
        }
    }
}

/// Sequential batch runner: files one at a time, operations in selection order.
pub struct Processor {
    config: ProcessorConfig,
    dispatcher: Dispatcher,
}

impl Processor {
    /// Creates the output root once; it is never torn down.
    pub fn new(config: ProcessorConfig, dispatcher: Dispatcher) -> Result<Self> {
        ensure_dir(&config.output_root)?;
        Ok(Self { config, dispatcher })
    }

    pub fn output_root(&self) -> &Path {
        &self.config.output_root
    }

    /// Exhaustive mapping from menu entry to handler.
    pub fn execute(&self, operation: Operation, path: &Path) -> Vec<Status> {
        let root = self.output_root();
        let separate = self.config.separate_folders;
        match operation {
            Operation::ConvertAll => self.dispatcher.convert_all(path, root, separate),
            Operation::Convert(target) => self.dispatcher.convert(path, root, target, separate),
            Operation::CompressAll => compress_to_all_sizes(path, root, separate),
            Operation::Compress(size_class) => {
                vec![compress_to_size(path, root, size_class, separate)]
            }
        }
    }

    pub fn run_all(
        &self,
        files: &[PathBuf],
        operations: &[Operation],
        sink: &mut dyn LogSink,
    ) -> BatchSummary {
        let mut summary = BatchSummary::default();

        if files.is_empty() {
            sink.line(NO_FILES_MESSAGE);
            return summary;
        }
        if operations.is_empty() {
            sink.line(NO_OPTIONS_MESSAGE);
            return summary;
        }

        sink.line(&format!("Starting process on {} files...", files.len()));

        for (position, file) in files.iter().enumerate() {
            sink.file_started(position, files.len(), &display_name(file));
            self.process_single_file(file, operations, sink, &mut summary);
            summary.files += 1;
        }
        sink.batch_finished();

        sink.line("");
        sink.line(COMPLETION_MARKER);
        summary
    }

    pub fn process_single_file(
        &self,
        file: &Path,
        operations: &[Operation],
        sink: &mut dyn LogSink,
        summary: &mut BatchSummary,
    ) {
        sink.line(&format!("--> Processing file: {}", display_name(file)));

        if self.config.separate_folders {
            sink.line(&format!(
                "    Separate Folders based on extension Created in: {}/",
                self.output_root().display()
            ));
        } else {
            sink.line(&format!(
                "    Standard Output Folder: {}/",
                display_name(self.output_root())
            ));
        }
        sink.line(&format!(
            "    Outputting to: {}",
            relative_to(self.output_root(), &self.config.app_root).display()
        ));

        if let Err(e) = validate_file_exists(file) {
            let status = Status::failed(FailureKind::MissingSource, e);
            sink.line(&format!("    - {}", status));
            summary.record(&status);
            return;
        }

        for operation in operations {
            for status in self.execute(*operation, file) {
                sink.line(&format!("    - [{}] {}", operation.code(), status));
                summary.record(&status);
            }
        }

        let copy_status =
            self.dispatcher
                .copy_original(file, self.output_root(), self.config.separate_folders);
        sink.line(&format!("    - {}", copy_status));
        summary.record(&copy_status);
    }
}
