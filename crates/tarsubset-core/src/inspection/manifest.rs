//! Archive member listing types.

use std::collections::HashSet;
use std::fmt;

use crate::formats::detect::ArchiveType;

/// Kind of an archive member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Hard link.
    Hardlink,
    /// Device node, FIFO, or any other special entry.
    Other,
}

impl MemberKind {
    /// Single-character marker used in long listings.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::File => '-',
            Self::Directory => 'd',
            Self::Symlink => 'l',
            Self::Hardlink => 'h',
            Self::Other => '?',
        }
    }
}

/// Returns `true` for tar entry types that hold regular file data:
/// plain and contiguous files.
pub(crate) fn is_file_entry(entry_type: tar::EntryType) -> bool {
    matches!(
        entry_type,
        tar::EntryType::Regular | tar::EntryType::Continuous
    )
}

impl From<tar::EntryType> for MemberKind {
    fn from(entry_type: tar::EntryType) -> Self {
        match entry_type {
            t if is_file_entry(t) => Self::File,
            tar::EntryType::Directory => Self::Directory,
            tar::EntryType::Symlink => Self::Symlink,
            tar::EntryType::Link => Self::Hardlink,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Hardlink => "hardlink",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// One member of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Member name as stored in the archive.
    pub path: String,
    /// File-vs-directory kind.
    pub kind: MemberKind,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Unix mode bits, when recorded.
    pub mode: Option<u32>,
}

impl ArchiveEntry {
    /// Returns `true` for regular files.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == MemberKind::File
    }
}

/// Listing of every member of an archive, in archive order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveManifest {
    /// Format the archive was read as.
    pub format: ArchiveType,
    /// Members in archive order.
    pub entries: Vec<ArchiveEntry>,
    /// Number of members.
    pub total_entries: usize,
    /// Sum of member sizes.
    pub total_size: u64,
}

impl ArchiveManifest {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new(format: ArchiveType) -> Self {
        Self {
            format,
            entries: Vec::new(),
            total_entries: 0,
            total_size: 0,
        }
    }

    /// Appends a member and updates the totals.
    pub fn add_entry(&mut self, entry: ArchiveEntry) {
        self.total_entries += 1;
        self.total_size = self.total_size.saturating_add(entry.size);
        self.entries.push(entry);
    }

    /// Names of all regular-file members.
    #[must_use]
    pub fn file_names(&self) -> HashSet<&str> {
        self.entries
            .iter()
            .filter(|e| e.is_file())
            .map(|e| e.path.as_str())
            .collect()
    }

    /// Names of all members, in archive order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }
}
