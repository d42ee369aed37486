//! Test utilities for building corpus archives on the fly.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::catalog::EbookId;
use crate::formats::detect::detect_format;
use crate::formats::stream::ArchiveWriter;

/// Builder for in-memory TAR archives with various entry types.
///
/// # Examples
///
/// ```
/// use tarsubset_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_directory("cache/epub/11/")
///     .add_file("cache/epub/11/pg11.txt", b"Alice")
///     .add_symlink("latest", "cache/epub/11/pg11.txt")
///     .build();
/// assert!(!tar_data.is_empty());
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new TAR test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file with mode 0o644.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(1_700_000_000);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a contiguous-file entry (type `7`) with mode 0o644.
    #[must_use]
    pub fn add_contiguous_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Continuous);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Directory);
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds a symlink entry.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o777);
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_link_name(target).unwrap();
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds the text member for `id` with deterministic content.
    #[must_use]
    pub fn add_book(self, id: EbookId) -> Self {
        let name = id.member_name();
        let text = book_text(id);
        self.add_file(&name, text.as_bytes())
    }

    /// Builds and returns the TAR archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic body used for the member of `id`.
#[must_use]
pub fn book_text(id: EbookId) -> String {
    format!("The Project Gutenberg eBook #{id}\n").repeat(32)
}

/// Builds a corpus holding `ids` in reverse order, interleaved with
/// directories and unrelated members the selection must ignore.
#[must_use]
pub fn corpus_tar(ids: &[EbookId]) -> Vec<u8> {
    let mut builder = TarTestBuilder::new()
        .add_directory("cache/")
        .add_file("GUTINDEX.ALL", b"index of all ebooks\n");

    for (i, id) in ids.iter().rev().enumerate() {
        builder = builder
            .add_directory(&format!("cache/epub/{id}/"))
            .add_file(&format!("cache/epub/{id}/pg{id}.rdf"), b"<rdf/>");
        builder = builder.add_book(*id);
        if i % 2 == 0 {
            builder = builder.add_file(&format!("cache/epub/{id}/pg{id}-images.txt"), b"[img]");
        }
    }

    builder
        .add_file("cache/epub/99999/pg99999.txt", b"unrelated")
        .build()
}

/// Writes raw tar bytes to `dir/name`, compressed according to the extension.
#[must_use]
pub fn write_archive(dir: &Path, name: &str, tar_data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let format = detect_format(&path).unwrap();
    let file = File::create(&path).unwrap();
    let mut writer = ArchiveWriter::new(file, format, 6).unwrap();
    writer.write_all(tar_data).unwrap();
    writer.finish().unwrap();
    path
}
