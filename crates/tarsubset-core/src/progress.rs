//! Progress reporting for the extract and repack phases.
//!
//! The pipeline reports through [`ProgressCallback`]; callers that do not
//! care pass [`NoopProgress`]. [`ProgressTracker`] numbers entries and
//! [`ProgressReader`] batches byte counts so large members do not flood the
//! callback.

use std::fmt;
use std::io::Read;
use std::path::Path;

/// Pipeline phase that is reporting progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Selected members are being unpacked into the staging directory.
    Extract,
    /// Staged files are being appended to the output archive.
    Repack,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extract => f.write_str("Extracting"),
            Self::Repack => f.write_str("Repacking"),
        }
    }
}

/// Callback trait for progress reporting.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tarsubset_core::ProgressCallback;
///
/// struct Printer;
///
/// impl ProgressCallback for Printer {
///     fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("[{current}/{total}] {}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, _path: &Path) {}
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ProgressCallback {
    /// Called when a phase begins, with the number of entries it will handle.
    fn on_phase_start(&mut self, _phase: Phase, _total: usize) {}

    /// Called when starting to process an entry.
    ///
    /// * `total` - Total number of entries in the current phase
    /// * `current` - Current entry number (1-indexed)
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called with the number of bytes moved since the previous update.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called when an entry has been completely processed.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called once when the current phase is complete.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}

/// Numbers entries within one phase and forwards lifecycle events.
pub struct ProgressTracker<'a> {
    progress: &'a mut dyn ProgressCallback,
    current_entry: usize,
    total_entries: usize,
}

impl<'a> ProgressTracker<'a> {
    /// Starts a phase and returns a tracker for its entries.
    pub fn start(progress: &'a mut dyn ProgressCallback, phase: Phase, total_entries: usize) -> Self {
        progress.on_phase_start(phase, total_entries);
        Self {
            progress,
            current_entry: 0,
            total_entries,
        }
    }

    /// Reports that processing started for an entry.
    pub fn on_entry_start(&mut self, path: &Path) {
        self.current_entry += 1;
        self.progress
            .on_entry_start(path, self.total_entries, self.current_entry);
    }

    /// Reports that processing completed for an entry.
    pub fn on_entry_complete(&mut self, path: &Path) {
        self.progress.on_entry_complete(path);
    }

    /// Reports that the phase completed.
    pub fn on_complete(&mut self) {
        self.progress.on_complete();
    }

    /// Borrows the underlying callback, e.g. to wrap a reader.
    pub fn callback(&mut self) -> &mut dyn ProgressCallback {
        &mut *self.progress
    }
}

/// Reader that reports bytes read to a progress callback in batches.
///
/// Remaining bytes are flushed to the callback on drop.
pub struct ProgressReader<'a, R> {
    inner: R,
    progress: &'a mut dyn ProgressCallback,
    bytes_since_last_update: u64,
    batch_threshold: u64,
}

impl<'a, R> ProgressReader<'a, R> {
    /// Default batch size before the callback is invoked (1 MiB).
    pub const DEFAULT_BATCH: u64 = 1024 * 1024;

    /// Wraps `inner` with the default 1 MiB batch threshold.
    #[must_use]
    pub fn new(inner: R, progress: &'a mut dyn ProgressCallback) -> Self {
        Self::with_batch_threshold(inner, progress, Self::DEFAULT_BATCH)
    }

    /// Wraps `inner` with a custom batch threshold.
    #[must_use]
    pub fn with_batch_threshold(
        inner: R,
        progress: &'a mut dyn ProgressCallback,
        batch_threshold: u64,
    ) -> Self {
        Self {
            inner,
            progress,
            bytes_since_last_update: 0,
            batch_threshold,
        }
    }

    /// Flushes any accumulated bytes to the progress callback.
    pub fn flush_progress(&mut self) {
        if self.bytes_since_last_update > 0 {
            self.progress.on_bytes_written(self.bytes_since_last_update);
            self.bytes_since_last_update = 0;
        }
    }
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let bytes_read = self.inner.read(buf)?;
        self.bytes_since_last_update += bytes_read as u64;
        if self.bytes_since_last_update >= self.batch_threshold {
            self.flush_progress();
        }
        Ok(bytes_read)
    }
}

impl<R> Drop for ProgressReader<'_, R> {
    fn drop(&mut self) {
        self.flush_progress();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    #[derive(Default)]
    struct Recorder {
        phases: Vec<(Phase, usize)>,
        starts: Vec<(PathBuf, usize, usize)>,
        byte_updates: Vec<u64>,
        completed: usize,
        finished: usize,
    }

    impl ProgressCallback for Recorder {
        fn on_phase_start(&mut self, phase: Phase, total: usize) {
            self.phases.push((phase, total));
        }

        fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
            self.starts.push((path.to_path_buf(), total, current));
        }

        fn on_bytes_written(&mut self, bytes: u64) {
            self.byte_updates.push(bytes);
        }

        fn on_entry_complete(&mut self, _path: &Path) {
            self.completed += 1;
        }

        fn on_complete(&mut self) {
            self.finished += 1;
        }
    }

    #[test]
    fn test_tracker_numbers_entries() {
        let mut recorder = Recorder::default();
        {
            let mut tracker = ProgressTracker::start(&mut recorder, Phase::Repack, 2);
            tracker.on_entry_start(Path::new("cache/epub/11/pg11.txt"));
            tracker.on_entry_complete(Path::new("cache/epub/11/pg11.txt"));
            tracker.on_entry_start(Path::new("cache/epub/84/pg84.txt"));
            tracker.on_entry_complete(Path::new("cache/epub/84/pg84.txt"));
            tracker.on_complete();
        }

        assert_eq!(recorder.phases, vec![(Phase::Repack, 2)]);
        assert_eq!(recorder.starts[0].2, 1);
        assert_eq!(recorder.starts[1].2, 2);
        assert_eq!(recorder.starts[1].1, 2);
        assert_eq!(recorder.completed, 2);
        assert_eq!(recorder.finished, 1);
    }

    #[test]
    fn test_reader_batches_and_flushes_on_drop() {
        let mut recorder = Recorder::default();
        {
            let data = vec![7u8; 10];
            let mut reader =
                ProgressReader::with_batch_threshold(Cursor::new(data), &mut recorder, 4);
            let mut buf = [0u8; 3];
            while reader.read(&mut buf).unwrap() > 0 {}
        }

        assert_eq!(recorder.byte_updates.iter().sum::<u64>(), 10);
        assert!(recorder.byte_updates.len() >= 2);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Extract.to_string(), "Extracting");
        assert_eq!(Phase::Repack.to_string(), "Repacking");
    }

    #[test]
    fn test_noop_progress() {
        let mut noop = NoopProgress;
        noop.on_phase_start(Phase::Extract, 3);
        noop.on_entry_start(Path::new("x"), 1, 1);
        noop.on_bytes_written(10);
        noop.on_entry_complete(Path::new("x"));
        noop.on_complete();
    }
}
