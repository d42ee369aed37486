//! Mapping identifiers to archive members.
//!
//! Selection is resolved against a full listing of the source before
//! anything is written, so a missing member aborts the run with nothing
//! to clean up.

use std::collections::HashSet;
use std::path::Path;

use crate::Result;
use crate::SubsetError;
use crate::catalog::EbookId;
use crate::formats::detect::ArchiveType;
use crate::inspection::list::list_archive_as;
use crate::inspection::manifest::ArchiveManifest;

/// One selected member and the identifier it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMember {
    /// Identifier the member name was derived from.
    pub id: EbookId,
    /// Exact member name in the source archive.
    pub name: String,
}

/// Ordered set of members to copy, in identifier-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberSelection {
    members: Vec<SelectedMember>,
}

impl MemberSelection {
    /// Number of selected members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates members in pack order.
    pub fn iter(&self) -> std::slice::Iter<'_, SelectedMember> {
        self.members.iter()
    }

    /// Member names in pack order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }

    /// Returns `true` if `name` is one of the selected members.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m.name == name)
    }

    /// Resolves `ids` against an existing listing.
    ///
    /// Only regular files count; a directory that happens to carry the
    /// member name does not satisfy the selection.
    ///
    /// # Errors
    ///
    /// Returns `MissingMember` naming the first identifier, in list order,
    /// whose member is absent.
    pub fn resolve(manifest: &ArchiveManifest, ids: &[EbookId]) -> Result<Self> {
        let available: HashSet<&str> = manifest.file_names();
        let mut members = Vec::with_capacity(ids.len());

        for id in ids {
            let name = id.member_name();
            if !available.contains(name.as_str()) {
                return Err(SubsetError::MissingMember { name });
            }
            members.push(SelectedMember { id: *id, name });
        }

        Ok(Self { members })
    }
}

impl<'a> IntoIterator for &'a MemberSelection {
    type Item = &'a SelectedMember;
    type IntoIter = std::slice::Iter<'a, SelectedMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lists `source` and resolves `ids` to member names.
///
/// # Errors
///
/// Returns an error if the source cannot be read, or `MissingMember` if any
/// identifier has no corresponding member.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tarsubset_core::DEFAULT_EBOOK_IDS;
/// use tarsubset_core::formats::ArchiveType;
/// use tarsubset_core::select_members;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let selection = select_members(
///     Path::new("gutenberg-txt-files.tar.gz"),
///     ArchiveType::TarGz,
///     &DEFAULT_EBOOK_IDS,
/// )?;
/// assert_eq!(selection.len(), 10);
/// # Ok(())
/// # }
/// ```
pub fn select_members(
    source: &Path,
    format: ArchiveType,
    ids: &[EbookId],
) -> Result<MemberSelection> {
    let manifest = list_archive_as(source, format)?;
    let selection = MemberSelection::resolve(&manifest, ids)?;
    log::debug!(
        "selected {} of {} members in {}",
        selection.len(),
        manifest.total_entries,
        source.display()
    );
    Ok(selection)
}
