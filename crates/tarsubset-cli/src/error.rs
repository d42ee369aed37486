//! Error conversion utilities for CLI.
//!
//! Converts tarsubset-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use tarsubset_core::SubsetConfig;
use tarsubset_core::SubsetError;

/// Converts `SubsetError` to a user-friendly anyhow error with context.
///
/// `archive` is the archive the failing command was working on.
pub fn convert_subset_error(err: SubsetError, archive: &Path) -> anyhow::Error {
    match err {
        SubsetError::MissingMember { name } => {
            anyhow!(
                "missing {name} in archive '{}'\n\
                 HINT: The source is incomplete. Re-download it or pass --id to choose other books.",
                archive.display()
            )
        }
        SubsetError::SourceNotFound { path } => {
            anyhow!(
                "Source archive not found: {}\n\
                 HINT: Place gutenberg-txt-files.tar.gz in the project root, or pass --root/--source.",
                path.display()
            )
        }
        SubsetError::SampleNotFound { path } => {
            anyhow!(
                "Sample file not found: {}\n\
                 HINT: The samples directory must contain alice.txt, pride.txt, frankenstein.txt, \
                 dracula.txt and sherlock.txt.",
                path.display()
            )
        }
        SubsetError::SourceIsOutput { path } => {
            anyhow!(
                "Refusing to overwrite the source archive: {}\n\
                 HINT: Pass a different --output path.",
                path.display()
            )
        }
        SubsetError::UnsupportedFormat { path } => {
            anyhow!(
                "Archive format not supported: {}\n\
                 HINT: Supported formats: tar, tar.gz, tar.bz2, tar.xz, tar.zst",
                path.display()
            )
        }
        SubsetError::OutputWrite { path, source } => {
            anyhow!(
                "Failed to write output archive '{}': {}\n\
                 HINT: Check that the output directory exists and is writable.",
                path.display(),
                source
            )
        }
        SubsetError::StagingOverlap { staging, path } => {
            anyhow!(
                "Staging directory {} would remove {}\n\
                 HINT: Pass a --staging-dir that holds neither the source nor the output.",
                staging.display(),
                path.display()
            )
        }
        SubsetError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The archive may be corrupted or truncated.",
                archive.display(),
                reason
            )
        }
        SubsetError::DuplicateIdentifier { id } => {
            anyhow!(
                "Identifier {id} was given more than once\n\
                 HINT: Each --id must be unique."
            )
        }
        SubsetError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                archive.display(),
                io_err
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}

/// Adds context to a `build_subset` result.
///
/// Errors from the source side name the source; I/O failures outside the
/// source name the output being built.
pub fn add_build_context<T>(
    result: Result<T, SubsetError>,
    config: &SubsetConfig,
) -> anyhow::Result<T> {
    result.map_err(|err| match err {
        SubsetError::Io(io_err) => anyhow!(
            "I/O error while building '{}': {}",
            config.output.display(),
            io_err
        ),
        other => convert_subset_error(other, &config.source),
    })
}

/// Adds archive context to a core result.
pub fn add_archive_context<T>(
    result: Result<T, SubsetError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_subset_error(e, archive))
}
