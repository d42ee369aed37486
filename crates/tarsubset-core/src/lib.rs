//! Build a small, fixed subset of a large text-corpus archive.
//!
//! `tarsubset-core` selects a fixed list of members from a compressed tar
//! archive, stages them in a scratch directory, and repacks them into a new
//! compressed archive. The scratch directory is removed on every exit path
//! and the output is replaced atomically.
//!
//! # Examples
//!
//! ```no_run
//! use tarsubset_core::NoopProgress;
//! use tarsubset_core::SubsetConfig;
//! use tarsubset_core::build_subset;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SubsetConfig::for_root("/srv/corpus");
//! let report = build_subset(&config, &mut NoopProgress)?;
//! println!("{}", report.summary_line());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod inspection;
pub mod io;
pub mod progress;
pub mod repack;
pub mod report;
pub mod selection;
pub mod staging;
pub mod synth;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::build_subset;
pub use catalog::DEFAULT_EBOOK_IDS;
pub use catalog::EbookId;
pub use catalog::SAMPLE_CATALOG;
pub use config::SubsetConfig;
pub use config::SynthesisConfig;
pub use error::Result;
pub use error::SubsetError;
pub use inspection::ArchiveEntry;
pub use inspection::ArchiveManifest;
pub use inspection::MemberKind;
pub use inspection::list_archive;
pub use progress::NoopProgress;
pub use progress::Phase;
pub use progress::ProgressCallback;
pub use report::SubsetReport;
pub use report::SynthesisReport;
pub use selection::MemberSelection;
pub use selection::select_members;
pub use synth::synthesize_archive;
