//! Archive inspection without extraction.
//!
//! # Examples
//!
//! ```no_run
//! use tarsubset_core::list_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = list_archive("mini-gutenberg-10mb.tar.gz")?;
//! for entry in &manifest.entries {
//!     println!("{}", entry.path);
//! }
//! # Ok(())
//! # }
//! ```

pub mod list;
pub mod manifest;

pub use list::list_archive;
pub use list::list_archive_as;
pub use manifest::ArchiveEntry;
pub use manifest::ArchiveManifest;
pub use manifest::MemberKind;
