//! Writing staged members into a fresh compressed tar archive.
//!
//! The archive is assembled in a temporary file next to the output and
//! renamed over it only once the codec trailer has been written, so a
//! failed run never leaves a truncated archive at the output path.

use std::fs;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use tar::Builder;
use tar::Header;
use tempfile::NamedTempFile;

use crate::Result;
use crate::SubsetError;
use crate::formats::detect::ArchiveType;
use crate::formats::stream::ArchiveWriter;
use crate::io::CountingWriter;
use crate::progress::Phase;
use crate::progress::ProgressCallback;
use crate::progress::ProgressReader;
use crate::progress::ProgressTracker;
use crate::report::RepackSummary;
use crate::selection::MemberSelection;

/// Packs the staged copies of `selection` into `output`.
///
/// Members are appended in selection order under their original names,
/// which are the paths relative to `staging_root`.
///
/// # Errors
///
/// Returns an error if a staged file is missing, or if the output cannot be
/// written or moved into place.
pub fn repack_members(
    output: &Path,
    format: ArchiveType,
    level: u8,
    staging_root: &Path,
    selection: &MemberSelection,
    progress: &mut dyn ProgressCallback,
) -> Result<RepackSummary> {
    let mut tracker = ProgressTracker::start(progress, Phase::Repack, selection.len());
    let mut members = Vec::with_capacity(selection.len());
    let mut bytes_written = 0u64;

    let bytes_compressed = write_archive_atomically(output, format, level, |builder| {
        for member in selection {
            let member_path = Path::new(&member.name);
            tracker.on_entry_start(member_path);

            let staged = staging_root.join(member_path);
            let size = append_file(builder, &staged, &member.name, tracker.callback())?;

            tracker.on_entry_complete(member_path);
            members.push(member.name.clone());
            bytes_written += size;
        }
        Ok(())
    })?;

    tracker.on_complete();
    log::debug!(
        "packed {} members into {} ({bytes_written} -> {bytes_compressed} bytes)",
        members.len(),
        output.display()
    );

    Ok(RepackSummary {
        members,
        bytes_written,
        bytes_compressed,
    })
}

/// Builds a tar archive at `output` through a temporary sibling file.
///
/// `fill` appends the entries. Returns the compressed size in bytes.
pub(crate) fn write_archive_atomically<F>(
    output: &Path,
    format: ArchiveType,
    level: u8,
    fill: F,
) -> Result<u64>
where
    F: FnOnce(&mut Builder<&mut dyn Write>) -> Result<()>,
{
    let output_error = |source: io::Error| SubsetError::OutputWrite {
        path: output.to_path_buf(),
        source,
    };
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(output_error)?;

    let mut temp = new_partial_file(parent).map_err(output_error)?;

    // An existing output keeps its mode across the replace.
    if let Ok(metadata) = fs::metadata(output) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(output_error)?;
    }

    let compressed = {
        let counting = CountingWriter::new(BufWriter::new(temp.as_file_mut()));
        let mut encoder = ArchiveWriter::new(counting, format, level)?;
        {
            let mut builder = Builder::new(&mut encoder as &mut dyn Write);
            fill(&mut builder)?;
            builder.into_inner().map_err(output_error)?;
        }
        let mut counting = encoder.finish().map_err(output_error)?;
        counting.flush().map_err(output_error)?;
        counting.total_bytes()
    };

    temp.as_file().sync_all().map_err(output_error)?;
    temp.persist(output).map_err(|e| output_error(e.error))?;
    Ok(compressed)
}

/// Creates the temporary sibling with the mode a plain `File::create` would
/// get (0o666 less the umask).
fn new_partial_file(parent: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".tarsubset-").suffix(".partial");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    builder.tempfile_in(parent)
}

/// Appends a regular file from disk under `name`. Returns its size.
pub(crate) fn append_file(
    builder: &mut Builder<&mut dyn Write>,
    staged: &Path,
    name: &str,
    progress: &mut dyn ProgressCallback,
) -> Result<u64> {
    let file = File::open(staged)?;
    let metadata = file.metadata()?;
    let size = metadata.len();

    let mut header = Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(size);
    set_permissions(&mut header, &metadata);

    let reader = ProgressReader::new(file, progress);
    builder.append_data(&mut header, name, reader)?;
    Ok(size)
}

#[cfg(unix)]
fn set_permissions(header: &mut Header, metadata: &fs::Metadata) {
    use std::os::unix::fs::MetadataExt;
    header.set_mode(metadata.mode() & 0o7777);
    // mtime can be negative for dates before epoch, clamp to 0
    #[allow(clippy::cast_sign_loss)]
    let mtime = metadata.mtime().max(0) as u64;
    header.set_mtime(mtime);
}

#[cfg(not(unix))]
fn set_permissions(header: &mut Header, metadata: &fs::Metadata) {
    let mode = if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    };
    header.set_mode(mode);

    if let Ok(modified) = metadata.modified()
        && let Ok(duration) = modified.duration_since(std::time::UNIX_EPOCH)
    {
        header.set_mtime(duration.as_secs());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::EbookId;
    use crate::inspection::list::list_archive;
    use crate::inspection::manifest::ArchiveEntry;
    use crate::inspection::manifest::ArchiveManifest;
    use crate::inspection::manifest::MemberKind;
    use crate::progress::NoopProgress;
    use std::io::Read;
    use tempfile::TempDir;

    fn stage(root: &Path, ids: &[EbookId]) -> MemberSelection {
        let mut manifest = ArchiveManifest::new(ArchiveType::Tar);
        for id in ids {
            let name = id.member_name();
            let path = root.join(&name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, format!("body of {id}")).unwrap();
            manifest.add_entry(ArchiveEntry {
                path: name,
                kind: MemberKind::File,
                size: 0,
                mode: None,
            });
        }
        MemberSelection::resolve(&manifest, ids).unwrap()
    }

    #[test]
    fn test_repack_preserves_names_and_order() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        let ids = [EbookId::new(1342), EbookId::new(11)];
        let selection = stage(&staging, &ids);
        let output = temp.path().join("out/mini.tar.gz");

        let summary = repack_members(
            &output,
            ArchiveType::TarGz,
            9,
            &staging,
            &selection,
            &mut NoopProgress,
        )
        .unwrap();

        assert_eq!(
            summary.members,
            vec!["cache/epub/1342/pg1342.txt", "cache/epub/11/pg11.txt"]
        );
        assert_eq!(summary.bytes_compressed, fs::metadata(&output).unwrap().len());

        let manifest = list_archive(&output).unwrap();
        assert_eq!(
            manifest.names().collect::<Vec<_>>(),
            vec!["cache/epub/1342/pg1342.txt", "cache/epub/11/pg11.txt"]
        );
        assert!(manifest.entries.iter().all(ArchiveEntry::is_file));
    }

    #[test]
    fn test_repack_content_matches_staged_files() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        let selection = stage(&staging, &[EbookId::new(84)]);
        let output = temp.path().join("mini.tar");

        repack_members(
            &output,
            ArchiveType::Tar,
            9,
            &staging,
            &selection,
            &mut NoopProgress,
        )
        .unwrap();

        let mut archive = tar::Archive::new(File::open(&output).unwrap());
        let mut entry = archive.entries().unwrap().next().unwrap().unwrap();
        let mut body = String::new();
        entry.read_to_string(&mut body).unwrap();
        assert_eq!(body, "body of 84");
    }

    #[test]
    fn test_failed_repack_keeps_previous_output() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        let selection = stage(&staging, &[EbookId::new(11), EbookId::new(84)]);
        fs::remove_file(staging.join("cache/epub/84/pg84.txt")).unwrap();

        let output = temp.path().join("mini.tar.gz");
        fs::write(&output, b"previous archive").unwrap();

        let result = repack_members(
            &output,
            ArchiveType::TarGz,
            9,
            &staging,
            &selection,
            &mut NoopProgress,
        );
        assert!(result.is_err());
        assert_eq!(fs::read(&output).unwrap(), b"previous archive");

        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".partial"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_new_output_mode_matches_plain_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        let selection = stage(&staging, &[EbookId::new(11)]);
        let output = temp.path().join("mini.tar.gz");
        let plain = temp.path().join("plain.txt");
        File::create(&plain).unwrap();

        repack_members(
            &output,
            ArchiveType::TarGz,
            9,
            &staging,
            &selection,
            &mut NoopProgress,
        )
        .unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(output.as_path()), mode(plain.as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_replaced_output_keeps_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        let selection = stage(&staging, &[EbookId::new(11)]);
        let output = temp.path().join("mini.tar.gz");
        fs::write(&output, b"previous archive").unwrap();
        fs::set_permissions(&output, fs::Permissions::from_mode(0o640)).unwrap();

        repack_members(
            &output,
            ArchiveType::TarGz,
            9,
            &staging,
            &selection,
            &mut NoopProgress,
        )
        .unwrap();

        let mode = fs::metadata(&output).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
