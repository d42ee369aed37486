//! Fixed identifier list and sample catalog.
//!
//! Identifiers are Project Gutenberg ebook numbers. Each maps to exactly one
//! archive member through the `cache/epub/<id>/pg<id>.txt` template.

use std::fmt;

/// Numeric key identifying one text in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EbookId(u32);

impl EbookId {
    /// Wraps a raw ebook number.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ebook number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the archive member name for this identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarsubset_core::EbookId;
    ///
    /// assert_eq!(EbookId::new(84).member_name(), "cache/epub/84/pg84.txt");
    /// ```
    #[must_use]
    pub fn member_name(self) -> String {
        format!("cache/epub/{0}/pg{0}.txt", self.0)
    }
}

impl fmt::Display for EbookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EbookId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Identifiers packed into the mini archive, in pack order.
pub const DEFAULT_EBOOK_IDS: [EbookId; 10] = [
    EbookId(11),
    EbookId(84),
    EbookId(98),
    EbookId(345),
    EbookId(1184),
    EbookId(1232),
    EbookId(1342),
    EbookId(1661),
    EbookId(2542),
    EbookId(2701),
];

/// One row of the synthesis catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSpec {
    /// Identifier the synthesized entry is filed under.
    pub id: EbookId,
    /// Title written on the first line of the entry.
    pub title: &'static str,
    /// Sample text file the body is grown from.
    pub sample_file: &'static str,
}

const fn sample(id: u32, title: &'static str, sample_file: &'static str) -> SampleSpec {
    SampleSpec {
        id: EbookId(id),
        title,
        sample_file,
    }
}

/// Sample texts used to fabricate the mini archive without the full corpus.
///
/// Several titles reuse the same sample file since only five samples exist.
pub const SAMPLE_CATALOG: [SampleSpec; 10] = [
    sample(11, "Alice's Adventures in Wonderland", "alice.txt"),
    sample(1342, "Pride and Prejudice", "pride.txt"),
    sample(84, "Frankenstein", "frankenstein.txt"),
    sample(345, "Dracula", "dracula.txt"),
    sample(1661, "The Adventures of Sherlock Holmes", "sherlock.txt"),
    sample(2701, "Moby Dick", "dracula.txt"),
    sample(98, "Tale of Two Cities", "pride.txt"),
    sample(1232, "The Jungle Book", "alice.txt"),
    sample(1184, "The Odyssey", "frankenstein.txt"),
    sample(2542, "A Room with a View", "sherlock.txt"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_member_name_template() {
        assert_eq!(EbookId::new(11).member_name(), "cache/epub/11/pg11.txt");
        assert_eq!(
            EbookId::new(2701).member_name(),
            "cache/epub/2701/pg2701.txt"
        );
    }

    #[test]
    fn test_default_ids_order() {
        let raw: Vec<u32> = DEFAULT_EBOOK_IDS.iter().map(|id| id.get()).collect();
        assert_eq!(raw, vec![11, 84, 98, 345, 1184, 1232, 1342, 1661, 2542, 2701]);
    }

    #[test]
    fn test_sample_catalog_covers_default_ids() {
        let catalog: HashSet<EbookId> = SAMPLE_CATALOG.iter().map(|s| s.id).collect();
        let defaults: HashSet<EbookId> = DEFAULT_EBOOK_IDS.iter().copied().collect();
        assert_eq!(catalog, defaults);
    }

    #[test]
    fn test_display() {
        assert_eq!(EbookId::from(1342).to_string(), "1342");
    }
}
