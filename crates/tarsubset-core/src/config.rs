//! Configuration for subsetting and synthesis runs.

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::SubsetError;
use crate::catalog::DEFAULT_EBOOK_IDS;
use crate::catalog::EbookId;
use crate::formats::compression::MAX_COMPRESSION_LEVEL;
use crate::formats::detect::ArchiveType;

/// File name of the full corpus archive under the project root.
pub const SOURCE_ARCHIVE_NAME: &str = "gutenberg-txt-files.tar.gz";

/// File name of the subset archive under the project root.
pub const OUTPUT_ARCHIVE_NAME: &str = "mini-gutenberg-10mb.tar.gz";

/// Name of the staging directory under the project root.
pub const STAGING_DIR_NAME: &str = ".mini_tmp";

/// Configuration for one subsetting run.
///
/// # Examples
///
/// ```
/// use tarsubset_core::EbookId;
/// use tarsubset_core::SubsetConfig;
///
/// let config = SubsetConfig::for_root("/srv/corpus")
///     .with_ids(vec![EbookId::new(11), EbookId::new(84)])
///     .with_keep_staging(true);
///
/// assert!(config.source.ends_with("gutenberg-txt-files.tar.gz"));
/// assert_eq!(config.compression_level, 9);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetConfig {
    /// Full archive to select from.
    pub source: PathBuf,

    /// Archive to write. Overwritten when the run succeeds.
    pub output: PathBuf,

    /// Scratch directory owned by the run.
    pub staging_dir: PathBuf,

    /// Identifiers to pack, in pack order.
    pub ids: Vec<EbookId>,

    /// Compression level (1-9). Default: 9.
    pub compression_level: u8,

    /// Output format. `None` detects it from the output extension.
    pub format: Option<ArchiveType>,

    /// Leave the staging directory on disk after the run.
    pub keep_staging: bool,
}

impl Default for SubsetConfig {
    /// Layout rooted at the current directory.
    fn default() -> Self {
        Self::for_root(".")
    }
}

impl SubsetConfig {
    /// Builds the standard layout under `root`: source
    /// `gutenberg-txt-files.tar.gz`, output `mini-gutenberg-10mb.tar.gz`,
    /// staging `.mini_tmp`, the ten default identifiers, level 9.
    #[must_use]
    pub fn for_root<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            source: root.join(SOURCE_ARCHIVE_NAME),
            output: root.join(OUTPUT_ARCHIVE_NAME),
            staging_dir: root.join(STAGING_DIR_NAME),
            ids: DEFAULT_EBOOK_IDS.to_vec(),
            compression_level: MAX_COMPRESSION_LEVEL,
            format: None,
            keep_staging: false,
        }
    }

    /// Sets the source archive.
    #[must_use]
    pub fn with_source<P: Into<PathBuf>>(mut self, source: P) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the output archive.
    #[must_use]
    pub fn with_output<P: Into<PathBuf>>(mut self, output: P) -> Self {
        self.output = output.into();
        self
    }

    /// Sets the staging directory.
    #[must_use]
    pub fn with_staging_dir<P: Into<PathBuf>>(mut self, staging_dir: P) -> Self {
        self.staging_dir = staging_dir.into();
        self
    }

    /// Replaces the identifier list.
    #[must_use]
    pub fn with_ids(mut self, ids: Vec<EbookId>) -> Self {
        self.ids = ids;
        self
    }

    /// Sets the compression level. Checked by [`SubsetConfig::validate`].
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }

    /// Forces the output format instead of detecting it.
    #[must_use]
    pub fn with_format(mut self, format: Option<ArchiveType>) -> Self {
        self.format = format;
        self
    }

    /// Sets whether the staging directory survives the run.
    #[must_use]
    pub fn with_keep_staging(mut self, keep: bool) -> Self {
        self.keep_staging = keep;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the compression level is outside 1-9
    /// - the identifier list is empty or repeats an identifier
    /// - source and output are the same file
    /// - the staging directory is, or contains, the source or the output
    pub fn validate(&self) -> Result<()> {
        validate_level(self.compression_level)?;

        if self.ids.is_empty() {
            return Err(SubsetError::EmptySelection);
        }

        let mut seen = HashSet::with_capacity(self.ids.len());
        for id in &self.ids {
            if !seen.insert(*id) {
                return Err(SubsetError::DuplicateIdentifier { id: *id });
            }
        }

        if same_file(&self.source, &self.output) {
            return Err(SubsetError::SourceIsOutput {
                path: self.output.clone(),
            });
        }

        for path in [&self.source, &self.output] {
            if contains_path(&self.staging_dir, path) {
                return Err(SubsetError::StagingOverlap {
                    staging: self.staging_dir.clone(),
                    path: path.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Default size of each synthesized entry body (1 MiB).
pub const DEFAULT_SAMPLE_TARGET_BYTES: usize = 1024 * 1024;

/// Configuration for fabricating a mini archive from local sample texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisConfig {
    /// Directory holding the sample `.txt` files.
    pub samples_dir: PathBuf,

    /// Archive to write.
    pub output: PathBuf,

    /// Body size of each entry in bytes.
    pub target_bytes: usize,

    /// Compression level (1-9). Default: 9.
    pub compression_level: u8,
}

impl SynthesisConfig {
    /// Creates a configuration with 1 MiB entries at level 9.
    #[must_use]
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(samples_dir: P, output: Q) -> Self {
        Self {
            samples_dir: samples_dir.into(),
            output: output.into(),
            target_bytes: DEFAULT_SAMPLE_TARGET_BYTES,
            compression_level: MAX_COMPRESSION_LEVEL,
        }
    }

    /// Sets the body size of each entry.
    #[must_use]
    pub fn with_target_bytes(mut self, target_bytes: usize) -> Self {
        self.target_bytes = target_bytes;
        self
    }

    /// Sets the compression level. Checked by [`SynthesisConfig::validate`].
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level is outside 1-9.
    pub fn validate(&self) -> Result<()> {
        validate_level(self.compression_level)
    }
}

fn validate_level(level: u8) -> Result<()> {
    if (1..=9).contains(&level) {
        Ok(())
    } else {
        Err(SubsetError::InvalidCompressionLevel { level })
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Returns `true` if `dir` is `path` or one of its ancestors, compared
/// both as written and after resolving symlinks and `..`.
fn contains_path(dir: &Path, path: &Path) -> bool {
    path.starts_with(dir) || resolve(path).starts_with(resolve(dir))
}

/// Absolute form of `path` with its longest existing prefix canonicalized.
/// The prefix may be all of `path`, or none of it.
fn resolve(path: &Path) -> PathBuf {
    let Ok(absolute) = std::path::absolute(path) else {
        return path.to_path_buf();
    };

    let mut existing = absolute.as_path();
    let mut rest = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return rest
                .iter()
                .rev()
                .fold(canonical, |acc, name| acc.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name);
                existing = parent;
            }
            _ => break,
        }
    }
    absolute
}
