//! Error types for archive subsetting operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::EbookId;

/// Result type alias using `SubsetError`.
pub type Result<T> = std::result::Result<T, SubsetError>;

/// Errors that can occur while selecting, extracting, or repacking members.
#[derive(Error, Debug)]
pub enum SubsetError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive format is unsupported or unrecognized.
    #[error("unsupported archive format: {path}")]
    UnsupportedFormat {
        /// The archive whose format was not recognized.
        path: PathBuf,
    },

    /// Creating, writing, or moving the output archive into place failed.
    #[error("failed to write {path}: {source}")]
    OutputWrite {
        /// The output archive.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Archive is corrupted or invalid.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// A required member is absent from the source archive.
    #[error("missing {name} in archive")]
    MissingMember {
        /// The expected member name.
        name: String,
    },

    /// Source archive does not exist.
    #[error("source archive not found: {path}")]
    SourceNotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// Source and output resolve to the same file.
    #[error("output would overwrite the source archive: {path}")]
    SourceIsOutput {
        /// The shared path.
        path: PathBuf,
    },

    /// The staging directory is, or contains, the source or the output.
    #[error("staging directory {staging} would remove {path}")]
    StagingOverlap {
        /// The configured staging directory.
        staging: PathBuf,
        /// The source or output path it overlaps.
        path: PathBuf,
    },

    /// Sample text used for synthesis does not exist.
    #[error("sample file not found: {path}")]
    SampleNotFound {
        /// The missing sample path.
        path: PathBuf,
    },

    /// Compression level outside 1-9.
    #[error("invalid compression level {level}, must be 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// No identifiers were configured.
    #[error("identifier list is empty")]
    EmptySelection,

    /// The same identifier appears more than once.
    #[error("identifier {id} listed more than once")]
    DuplicateIdentifier {
        /// The repeated identifier.
        id: EbookId,
    },
}

impl SubsetError {
    /// Returns `true` if this error was caused by the configuration rather
    /// than by the archive or the filesystem.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarsubset_core::SubsetError;
    ///
    /// assert!(SubsetError::EmptySelection.is_config_error());
    ///
    /// let err = SubsetError::InvalidArchive("truncated".to_string());
    /// assert!(!err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCompressionLevel { .. }
                | Self::EmptySelection
                | Self::DuplicateIdentifier { .. }
                | Self::SourceIsOutput { .. }
                | Self::StagingOverlap { .. }
        )
    }

    /// Returns the missing member name, if this is a missing-member error.
    #[must_use]
    pub fn missing_member(&self) -> Option<&str> {
        match self {
            Self::MissingMember { name } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SubsetError::UnsupportedFormat {
            path: PathBuf::from("corpus.zip"),
        };
        assert_eq!(err.to_string(), "unsupported archive format: corpus.zip");
    }

    #[test]
    fn test_missing_member_names_exact_path() {
        let err = SubsetError::MissingMember {
            name: "cache/epub/84/pg84.txt".to_string(),
        };
        assert_eq!(err.to_string(), "missing cache/epub/84/pg84.txt in archive");
        assert_eq!(err.missing_member(), Some("cache/epub/84/pg84.txt"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SubsetError = io_err.into();
        assert!(matches!(err, SubsetError::Io(_)));
        assert!(err.missing_member().is_none());
    }

    #[test]
    fn test_is_config_error() {
        assert!(SubsetError::InvalidCompressionLevel { level: 0 }.is_config_error());
        assert!(
            SubsetError::DuplicateIdentifier {
                id: EbookId::new(11)
            }
            .is_config_error()
        );
        assert!(
            !SubsetError::SourceNotFound {
                path: PathBuf::from("missing.tar.gz")
            }
            .is_config_error()
        );
        assert!(
            !SubsetError::MissingMember {
                name: "x".to_string()
            }
            .is_config_error()
        );
    }

    #[test]
    fn test_staging_overlap_is_config_error() {
        let err = SubsetError::StagingOverlap {
            staging: PathBuf::from("/corpus"),
            path: PathBuf::from("/corpus/gutenberg-txt-files.tar.gz"),
        };
        assert!(err.is_config_error());
        assert!(err.to_string().contains("/corpus/gutenberg-txt-files.tar.gz"));
    }

    #[test]
    fn test_duplicate_identifier_display() {
        let err = SubsetError::DuplicateIdentifier {
            id: EbookId::new(1342),
        };
        assert!(err.to_string().contains("1342"));
    }
}
