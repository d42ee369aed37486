//! Materializing selected members into the staging directory.

use std::collections::HashSet;
use std::path::Path;

use crate::Result;
use crate::SubsetError;
use crate::formats::detect::ArchiveType;
use crate::formats::stream::open_archive_reader;
use crate::inspection::manifest::is_file_entry;
use crate::progress::Phase;
use crate::progress::ProgressCallback;
use crate::progress::ProgressTracker;
use crate::report::ExtractionSummary;
use crate::selection::MemberSelection;

/// Extracts exactly the selected members of `source` under `staging_root`,
/// preserving their relative paths.
///
/// The source is read in a single pass. Reading stops once every selected
/// member has been written; when a name occurs more than once, the first
/// occurrence wins. Unselected members are skipped without touching disk.
///
/// # Errors
///
/// Returns an error if:
/// - the source cannot be opened or decoded
/// - a selected member would land outside `staging_root`
/// - a selected member was not found in the stream
/// - writing into the staging directory fails
pub fn extract_members(
    source: &Path,
    format: ArchiveType,
    selection: &MemberSelection,
    staging_root: &Path,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionSummary> {
    let reader = open_archive_reader(source, format)?;
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(false);
    archive.set_preserve_mtime(true);

    let mut tracker = ProgressTracker::start(progress, Phase::Extract, selection.len());
    let mut summary = ExtractionSummary::default();
    let mut pending: HashSet<&str> = selection.names().collect();

    let entries = archive
        .entries()
        .map_err(|e| SubsetError::InvalidArchive(format!("failed to read TAR entries: {e}")))?;

    for entry_result in entries {
        if pending.is_empty() {
            break;
        }

        let mut entry = entry_result
            .map_err(|e| SubsetError::InvalidArchive(format!("failed to read TAR entry: {e}")))?;

        if !is_file_entry(entry.header().entry_type()) {
            summary.entries_skipped += 1;
            continue;
        }

        let name = entry
            .path()
            .map_err(|e| SubsetError::InvalidArchive(format!("invalid path: {e}")))?
            .to_string_lossy()
            .into_owned();

        if !pending.remove(name.as_str()) {
            summary.entries_skipped += 1;
            continue;
        }

        let member_path = Path::new(&name);
        tracker.on_entry_start(member_path);

        let size = entry.size();
        if !entry.unpack_in(staging_root)? {
            return Err(SubsetError::InvalidArchive(format!(
                "member escapes the staging directory: {name}"
            )));
        }
        log::debug!("extracted {name} ({size} bytes)");

        tracker.callback().on_bytes_written(size);
        tracker.on_entry_complete(member_path);
        summary.files_extracted += 1;
        summary.bytes_extracted += size;
    }

    // Report the first absent member in pack order.
    if let Some(name) = selection.names().find(|n| pending.contains(n)) {
        return Err(SubsetError::MissingMember {
            name: name.to_string(),
        });
    }

    tracker.on_complete();
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::EbookId;
    use crate::inspection::list::list_archive_as;
    use crate::progress::NoopProgress;
    use crate::test_utils::TarTestBuilder;
    use crate::test_utils::book_text;
    use crate::test_utils::corpus_tar;
    use crate::test_utils::write_archive;
    use std::fs;
    use tempfile::TempDir;

    fn selection_for(path: &Path, format: ArchiveType, ids: &[EbookId]) -> MemberSelection {
        let manifest = list_archive_as(path, format).unwrap();
        MemberSelection::resolve(&manifest, ids).unwrap()
    }

    fn staged_files(root: &Path) -> Vec<String> {
        let mut files: Vec<String> = walkdir::WalkDir::new(root)
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_extracts_only_selected_members() {
        let temp = TempDir::new().unwrap();
        let ids = [EbookId::new(11), EbookId::new(84), EbookId::new(98)];
        let source = write_archive(temp.path(), "corpus.tar.gz", &corpus_tar(&ids));
        let selection = selection_for(&source, ArchiveType::TarGz, &ids[..2]);
        let staging = temp.path().join("staging");
        fs::create_dir(&staging).unwrap();

        let summary = extract_members(
            &source,
            ArchiveType::TarGz,
            &selection,
            &staging,
            &mut NoopProgress,
        )
        .unwrap();

        assert_eq!(summary.files_extracted, 2);
        assert_eq!(
            staged_files(&staging),
            vec!["cache/epub/11/pg11.txt", "cache/epub/84/pg84.txt"]
        );
        assert_eq!(
            fs::read_to_string(staging.join("cache/epub/84/pg84.txt")).unwrap(),
            book_text(EbookId::new(84))
        );
        assert_eq!(
            summary.bytes_extracted,
            (book_text(EbookId::new(11)).len() + book_text(EbookId::new(84)).len()) as u64
        );
    }

    #[test]
    fn test_first_duplicate_wins() {
        let temp = TempDir::new().unwrap();
        let tar = TarTestBuilder::new()
            .add_file("cache/epub/11/pg11.txt", b"first")
            .add_file("cache/epub/11/pg11.txt", b"second")
            .build();
        let source = write_archive(temp.path(), "dup.tar", &tar);
        let selection = selection_for(&source, ArchiveType::Tar, &[EbookId::new(11)]);

        extract_members(
            &source,
            ArchiveType::Tar,
            &selection,
            temp.path(),
            &mut NoopProgress,
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("cache/epub/11/pg11.txt")).unwrap(),
            "first"
        );
    }

    #[test]
    fn test_contiguous_file_member_is_extracted() {
        let temp = TempDir::new().unwrap();
        let tar = TarTestBuilder::new()
            .add_contiguous_file("cache/epub/11/pg11.txt", b"contiguous")
            .add_book(EbookId::new(84))
            .build();
        let source = write_archive(temp.path(), "contiguous.tar", &tar);
        let ids = [EbookId::new(11), EbookId::new(84)];
        let selection = selection_for(&source, ArchiveType::Tar, &ids);
        let staging = temp.path().join("staging");
        fs::create_dir(&staging).unwrap();

        let summary = extract_members(
            &source,
            ArchiveType::Tar,
            &selection,
            &staging,
            &mut NoopProgress,
        )
        .unwrap();

        assert_eq!(summary.files_extracted, 2);
        assert_eq!(
            fs::read_to_string(staging.join("cache/epub/11/pg11.txt")).unwrap(),
            "contiguous"
        );
    }

    #[test]
    fn test_missing_member_after_listing() {
        let temp = TempDir::new().unwrap();
        let listed = write_archive(
            temp.path(),
            "listed.tar",
            &TarTestBuilder::new().add_book(EbookId::new(11)).build(),
        );
        let selection = selection_for(&listed, ArchiveType::Tar, &[EbookId::new(11)]);

        let other = write_archive(
            temp.path(),
            "other.tar",
            &TarTestBuilder::new().add_book(EbookId::new(84)).build(),
        );
        let staging = temp.path().join("staging");
        fs::create_dir(&staging).unwrap();

        let err = extract_members(
            &other,
            ArchiveType::Tar,
            &selection,
            &staging,
            &mut NoopProgress,
        )
        .unwrap_err();
        assert_eq!(err.missing_member(), Some("cache/epub/11/pg11.txt"));
        assert!(staged_files(&staging).is_empty());
    }
}
