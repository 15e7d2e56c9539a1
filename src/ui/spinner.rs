use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::output;

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A terminal spinner shown while a request is in flight.
///
/// Clears itself when dropped. Hidden in quiet mode.
pub struct Spinner {
    progress_bar: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let progress_bar = if output::is_quiet() {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(TICKS)
            .template("{spinner} {msg}")
        {
            progress_bar.set_style(style);
        }
        progress_bar.set_message(message.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(80));

        Self { progress_bar }
    }

    /// Stops the spinner and clears it from the terminal.
    pub fn stop(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.progress_bar.finish_and_clear();
    }
}

/// Chunk progress bar for file translation.
pub struct ChunkProgress {
    progress_bar: ProgressBar,
}

impl ChunkProgress {
    pub fn new(label: &str) -> Self {
        let progress_bar = if output::is_quiet() {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{msg} [{bar:30}] {pos}/{len} chunks ({elapsed})")
        {
            progress_bar.set_style(style.progress_chars("=> "));
        }
        progress_bar.set_message(label.to_string());

        Self { progress_bar }
    }

    /// Updates the bar to `completed` of `total` chunks.
    pub fn update(&self, completed: usize, total: usize) {
        self.progress_bar.set_length(total as u64);
        self.progress_bar.set_position(completed as u64);
    }

    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl Drop for ChunkProgress {
    fn drop(&mut self) {
        self.progress_bar.finish_and_clear();
    }
}
