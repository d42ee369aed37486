//! High-level public API for building a corpus subset.

use std::fs;
use std::time::Instant;

use crate::ProgressCallback;
use crate::Result;
use crate::SubsetConfig;
use crate::SubsetError;
use crate::extraction::extract_members;
use crate::formats::detect::detect_format;
use crate::repack::repack_members;
use crate::report::SubsetReport;
use crate::selection::select_members;
use crate::staging::StagingDir;

/// Builds the subset archive described by `config`.
///
/// Steps, in order: validate the configuration, resolve every identifier
/// against the source listing, prepare an empty staging directory, extract
/// the selected members, repack them into the output, and remove the
/// staging directory.
///
/// The staging directory is removed on every failure path as well. The
/// output is only replaced once the new archive is complete, so a failed
/// run leaves any previous output untouched.
///
/// # Errors
///
/// Returns an error if:
/// - the configuration is invalid
/// - the source archive does not exist or its format is unsupported
/// - any configured member is missing from the source
/// - reading the source or writing the output fails
///
/// # Examples
///
/// ```no_run
/// use tarsubset_core::NoopProgress;
/// use tarsubset_core::SubsetConfig;
/// use tarsubset_core::build_subset;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SubsetConfig::for_root(".");
/// let report = build_subset(&config, &mut NoopProgress)?;
/// println!("{}", report.summary_line());
/// # Ok(())
/// # }
/// ```
pub fn build_subset(
    config: &SubsetConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<SubsetReport> {
    let started = Instant::now();
    config.validate()?;

    if !config.source.is_file() {
        return Err(SubsetError::SourceNotFound {
            path: config.source.clone(),
        });
    }
    let source_format = detect_format(&config.source)?;
    let output_format = match config.format {
        Some(format) => format,
        None => detect_format(&config.output)?,
    };
    log::debug!(
        "building {} ({output_format}) from {} ({source_format})",
        config.output.display(),
        config.source.display()
    );

    let selection = select_members(&config.source, source_format, &config.ids)?;
    log::info!("selected {} members", selection.len());

    let staging = StagingDir::prepare(&config.staging_dir)?;

    let extracted = extract_members(
        &config.source,
        source_format,
        &selection,
        staging.path(),
        progress,
    )?;
    log::info!(
        "extracted {} members ({} bytes)",
        extracted.files_extracted,
        extracted.bytes_extracted
    );

    let packed = repack_members(
        &config.output,
        output_format,
        config.compression_level,
        staging.path(),
        &selection,
        progress,
    )?;

    let kept_staging = if config.keep_staging {
        let path = staging.keep();
        log::info!("kept staging directory {}", path.display());
        Some(path)
    } else {
        staging.close()?;
        None
    };

    let output_size = fs::metadata(&config.output)?.len();
    log::info!(
        "wrote {} ({output_size} bytes)",
        config.output.display()
    );

    Ok(SubsetReport {
        output_path: config.output.clone(),
        members: packed.members,
        bytes_written: packed.bytes_written,
        bytes_compressed: packed.bytes_compressed,
        output_size,
        entries_skipped: extracted.entries_skipped,
        kept_staging,
        duration: started.elapsed(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::EbookId;
    use crate::NoopProgress;
    use crate::test_utils::corpus_tar;
    use crate::test_utils::write_archive;
    use tempfile::TempDir;

    fn root_with_corpus(ids: &[EbookId]) -> TempDir {
        let temp = TempDir::new().unwrap();
        write_archive(temp.path(), "gutenberg-txt-files.tar.gz", &corpus_tar(ids));
        temp
    }

    #[test]
    fn test_build_subset_default_layout() {
        let ids = [EbookId::new(11), EbookId::new(84)];
        let root = root_with_corpus(&ids);
        let config = SubsetConfig::for_root(root.path()).with_ids(ids.to_vec());

        let report = build_subset(&config, &mut NoopProgress).unwrap();
        assert_eq!(report.members_packed(), 2);
        assert_eq!(report.output_path, root.path().join("mini-gutenberg-10mb.tar.gz"));
        assert!(report.output_path.is_file());
        assert!(report.entries_skipped > 0);
        assert!(report.kept_staging.is_none());
        assert!(!root.path().join(".mini_tmp").exists());
    }

    #[test]
    fn test_build_subset_missing_source() {
        let temp = TempDir::new().unwrap();
        let config = SubsetConfig::for_root(temp.path());

        let err = build_subset(&config, &mut NoopProgress).unwrap_err();
        assert!(matches!(err, SubsetError::SourceNotFound { .. }));
        assert!(!temp.path().join(".mini_tmp").exists());
    }

    #[test]
    fn test_build_subset_rejects_invalid_config_first() {
        let root = root_with_corpus(&[EbookId::new(11)]);
        let config = SubsetConfig::for_root(root.path()).with_compression_level(0);

        let err = build_subset(&config, &mut NoopProgress).unwrap_err();
        assert!(err.is_config_error());
        assert!(!root.path().join(".mini_tmp").exists());
    }

    #[test]
    fn test_build_subset_explicit_output_format() {
        let ids = [EbookId::new(98)];
        let root = root_with_corpus(&ids);
        let output = root.path().join("subset.bin");
        let config = SubsetConfig::for_root(root.path())
            .with_ids(ids.to_vec())
            .with_output(&output)
            .with_format(Some(crate::formats::ArchiveType::TarXz));

        build_subset(&config, &mut NoopProgress).unwrap();
        let manifest =
            crate::inspection::list_archive_as(&output, crate::formats::ArchiveType::TarXz)
                .unwrap();
        assert_eq!(manifest.total_entries, 1);
    }
}
