//! Progress bar implementation for CLI operations.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::path::Path;
use tarsubset_core::Phase;
use tarsubset_core::ProgressCallback;

/// CLI progress bar wrapper implementing `ProgressCallback`.
///
/// Shows one bar per pipeline phase with member count and bytes moved.
/// The bar is cleared when a phase completes and on drop.
pub struct CliProgress {
    bar: Option<ProgressBar>,
    bytes_moved: u64,
}

impl CliProgress {
    /// Creates an idle progress reporter. Bars appear when a phase starts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bar: None,
            bytes_moved: 0,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }

    fn style() -> ProgressStyle {
        // Template: "Extracting [████████░░░░] 4/10 books (3.2 MB)"
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} books ({prefix})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░")
    }

    fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_phase_start(&mut self, phase: Phase, total: usize) {
        self.clear();
        self.bytes_moved = 0;

        let bar = ProgressBar::new(total as u64);
        bar.set_style(Self::style());
        bar.set_message(phase.to_string());
        bar.set_prefix(humanize_bytes(0));
        self.bar = Some(bar);
    }

    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {
        // The counter advances in on_entry_complete
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bytes_moved += bytes;
        if let Some(bar) = &self.bar {
            bar.set_prefix(humanize_bytes(self.bytes_moved));
        }
    }

    fn on_entry_complete(&mut self, _path: &Path) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_complete(&mut self) {
        self.clear();
    }
}

/// Converts bytes to human-readable format (KB, MB, GB).
fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
