//! I/O wrappers shared by the extractor and repacker.

pub mod counting;

pub use counting::CountingWriter;
