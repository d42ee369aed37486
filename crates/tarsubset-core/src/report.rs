//! Reports produced by the subsetting pipeline.

use std::path::PathBuf;
use std::time::Duration;

const MIB: f64 = 1024.0 * 1024.0;

/// Outcome of the extract phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Number of members unpacked into the staging directory.
    pub files_extracted: usize,
    /// Uncompressed bytes unpacked.
    pub bytes_extracted: u64,
    /// Source entries that were read past without being selected.
    pub entries_skipped: usize,
}

/// Outcome of the repack phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepackSummary {
    /// Entry names in the order they were appended.
    pub members: Vec<String>,
    /// Uncompressed bytes appended (file contents only).
    pub bytes_written: u64,
    /// Compressed bytes written to the output file.
    pub bytes_compressed: u64,
}

/// Report of a complete subsetting run.
///
/// # Examples
///
/// ```
/// use tarsubset_core::SubsetReport;
///
/// let mut report = SubsetReport::default();
/// report.output_size = 3 * 1024 * 1024;
/// report.members = vec!["cache/epub/11/pg11.txt".to_string()];
///
/// assert_eq!(report.members_packed(), 1);
/// assert!((report.mebibytes() - 3.0).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SubsetReport {
    /// Path of the written archive.
    pub output_path: PathBuf,
    /// Entry names in pack order.
    pub members: Vec<String>,
    /// Uncompressed bytes of the packed members.
    pub bytes_written: u64,
    /// Compressed bytes produced by the encoder.
    pub bytes_compressed: u64,
    /// Size of the output archive on disk.
    pub output_size: u64,
    /// Source entries skipped during extraction.
    pub entries_skipped: usize,
    /// Staging directory left on disk, when cleanup was disabled.
    pub kept_staging: Option<PathBuf>,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl SubsetReport {
    /// Number of members in the output archive.
    #[must_use]
    pub fn members_packed(&self) -> usize {
        self.members.len()
    }

    /// Output size in mebibytes (1024²).
    #[must_use]
    pub fn mebibytes(&self) -> f64 {
        self.output_size as f64 / MIB
    }

    /// Returns the compression ratio (uncompressed / compressed), or 0.0 when
    /// either side is empty.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed == 0 || self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.bytes_compressed as f64
    }

    /// One-line summary printed after a successful run.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use tarsubset_core::SubsetReport;
    ///
    /// let report = SubsetReport {
    ///     output_path: PathBuf::from("mini.tar.gz"),
    ///     members: vec!["a".into(), "b".into()],
    ///     output_size: 1024 * 1024 / 2,
    ///     ..Default::default()
    /// };
    /// assert_eq!(report.summary_line(), "Created mini.tar.gz (0.50 MiB) with 2 books");
    /// ```
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "Created {} ({:.2} MiB) with {} books",
            self.output_path.display(),
            self.mebibytes(),
            self.members_packed()
        )
    }
}

/// Report of a sample-archive synthesis.
#[derive(Debug, Clone, Default)]
pub struct SynthesisReport {
    /// Path of the written archive.
    pub output_path: PathBuf,
    /// Entry names in the order they were appended.
    pub members: Vec<String>,
    /// Uncompressed bytes of all entries.
    pub bytes_written: u64,
    /// Size of the output archive on disk.
    pub output_size: u64,
}

impl SynthesisReport {
    /// Output size in mebibytes (1024²).
    #[must_use]
    pub fn mebibytes(&self) -> f64 {
        self.output_size as f64 / MIB
    }

    /// One-line summary printed after synthesis.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "Created {} ({:.2} MiB) with {} sample books",
            self.output_path.display(),
            self.mebibytes(),
            self.members.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let report = SubsetReport::default();
        assert_eq!(report.members_packed(), 0);
        assert!(report.mebibytes().abs() < f64::EPSILON);
        assert!(report.compression_ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn test_compression_ratio() {
        let report = SubsetReport {
            bytes_written: 1000,
            bytes_compressed: 250,
            ..Default::default()
        };
        assert!((report.compression_ratio() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_line_uses_binary_megabytes() {
        let report = SubsetReport {
            output_path: PathBuf::from("/data/mini-gutenberg-10mb.tar.gz"),
            members: (0..10).map(|i| format!("m{i}")).collect(),
            output_size: 4_194_304 + 524_288,
            ..Default::default()
        };
        assert_eq!(
            report.summary_line(),
            "Created /data/mini-gutenberg-10mb.tar.gz (4.50 MiB) with 10 books"
        );
    }

    #[test]
    fn test_synthesis_summary_line() {
        let report = SynthesisReport {
            output_path: PathBuf::from("mini.tar.gz"),
            members: vec!["a".into()],
            output_size: 1024 * 1024,
            ..Default::default()
        };
        assert_eq!(
            report.summary_line(),
            "Created mini.tar.gz (1.00 MiB) with 1 sample books"
        );
    }
}
