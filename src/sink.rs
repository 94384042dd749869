//! Destinations for batch log lines
//!
//! The batch runner only knows it can hand over a line of text; the console,
//! a test buffer or any other front end decides what to do with it.

use crate::info;
use crate::logger::is_quiet;
use crate::utils::create_progress_bar;
use indicatif::ProgressBar;

pub trait LogSink {
    fn line(&mut self, line: &str);

    /// Called before each file; `position` is 0-based.
    fn file_started(&mut self, _position: usize, _total: usize, _name: &str) {}

    fn batch_finished(&mut self) {}
}

/// Prints through the `info!` macro, keeping a progress bar below the log
/// while a batch runs.
#[derive(Default)]
pub struct ConsoleSink {
    progress: Option<ProgressBar>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogSink for ConsoleSink {
    fn line(&mut self, line: &str) {
        match &self.progress {
            // A hidden bar swallows println, so fall back to stdout.
            Some(pb) if !pb.is_hidden() => pb.println(line),
            _ => info!("{}", line),
        }
    }

    fn file_started(&mut self, position: usize, total: usize, name: &str) {
        let pb = self
            .progress
            .get_or_insert_with(|| create_progress_bar(total as u64, !is_quiet()));
        pb.set_position(position as u64);
        pb.set_message(name.to_string());
    }

    fn batch_finished(&mut self) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
    }
}

/// Collects lines in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl LogSink for MemorySink {
    fn line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

impl<F: FnMut(&str)> LogSink for F {
    fn line(&mut self, line: &str) {
        self(line)
    }
}
