//! Archive listing implementation.

use std::io::Read;
use std::path::Path;

use crate::Result;
use crate::SubsetError;
use crate::formats::detect::ArchiveType;
use crate::formats::detect::detect_format;
use crate::formats::stream::open_archive_reader;
use crate::inspection::manifest::ArchiveEntry;
use crate::inspection::manifest::ArchiveManifest;
use crate::inspection::manifest::MemberKind;

/// Lists archive contents without extracting.
///
/// The format is detected from the file extension.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened, its format is not
/// recognized, or its headers are corrupted.
///
/// # Examples
///
/// ```no_run
/// use tarsubset_core::list_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let manifest = list_archive("gutenberg-txt-files.tar.gz")?;
/// println!("Archive contains {} members", manifest.total_entries);
/// # Ok(())
/// # }
/// ```
pub fn list_archive<P: AsRef<Path>>(archive_path: P) -> Result<ArchiveManifest> {
    let archive_path = archive_path.as_ref();
    let format = detect_format(archive_path)?;
    list_archive_as(archive_path, format)
}

/// Lists archive contents, reading the archive as `format`.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or read as `format`.
pub fn list_archive_as(archive_path: &Path, format: ArchiveType) -> Result<ArchiveManifest> {
    log::debug!("listing {} as {format}", archive_path.display());
    let reader = open_archive_reader(archive_path, format)?;
    list_tar_entries(tar::Archive::new(reader), format)
}

fn list_tar_entries<R: Read>(
    mut archive: tar::Archive<R>,
    format: ArchiveType,
) -> Result<ArchiveManifest> {
    let mut manifest = ArchiveManifest::new(format);

    let entries = archive
        .entries()
        .map_err(|e| SubsetError::InvalidArchive(format!("failed to read TAR entries: {e}")))?;

    for entry_result in entries {
        let entry = entry_result
            .map_err(|e| SubsetError::InvalidArchive(format!("failed to read TAR entry: {e}")))?;

        let path = entry
            .path()
            .map_err(|e| SubsetError::InvalidArchive(format!("invalid path: {e}")))?
            .to_string_lossy()
            .into_owned();

        manifest.add_entry(ArchiveEntry {
            path,
            kind: MemberKind::from(entry.header().entry_type()),
            size: entry.size(),
            mode: entry.header().mode().ok(),
        });
    }

    log::debug!(
        "{} members, {} bytes uncompressed",
        manifest.total_entries,
        manifest.total_size
    );
    Ok(manifest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;
    use crate::test_utils::write_archive;
    use tempfile::TempDir;

    #[test]
    fn test_list_archive_empty_tar() {
        let temp = TempDir::new().unwrap();
        let path = write_archive(temp.path(), "empty.tar", &TarTestBuilder::new().build());

        let manifest = list_archive(&path).unwrap();
        assert_eq!(manifest.total_entries, 0);
        assert_eq!(manifest.total_size, 0);
        assert_eq!(manifest.format, ArchiveType::Tar);
    }

    #[test]
    fn test_list_archive_tar_gz_preserves_order_and_kinds() {
        let temp = TempDir::new().unwrap();
        let tar = TarTestBuilder::new()
            .add_directory("cache/epub/84/")
            .add_file("cache/epub/84/pg84.txt", b"Frankenstein")
            .add_file("cache/epub/11/pg11.txt", b"Alice")
            .add_symlink("latest", "cache/epub/11/pg11.txt")
            .build();
        let path = write_archive(temp.path(), "corpus.tar.gz", &tar);

        let manifest = list_archive(&path).unwrap();
        assert_eq!(manifest.format, ArchiveType::TarGz);
        assert_eq!(manifest.total_entries, 4);
        assert_eq!(manifest.total_size, 17);

        let kinds: Vec<MemberKind> = manifest.entries.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MemberKind::Directory,
                MemberKind::File,
                MemberKind::File,
                MemberKind::Symlink
            ]
        );
        assert_eq!(manifest.entries[1].path, "cache/epub/84/pg84.txt");
        assert_eq!(manifest.entries[1].mode, Some(0o644));
    }

    #[test]
    fn test_list_archive_corrupted() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.tar.gz");
        std::fs::write(&path, b"definitely not gzip").unwrap();

        let result = list_archive(&path);
        assert!(matches!(result, Err(SubsetError::InvalidArchive(_))));
    }

    #[test]
    fn test_list_archive_unsupported_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("corpus.zip");
        std::fs::write(&path, b"PK").unwrap();

        assert!(matches!(
            list_archive(&path),
            Err(SubsetError::UnsupportedFormat { .. })
        ));
    }
}
