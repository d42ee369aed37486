//! Archive formats: detection, codecs, and stream plumbing.

pub mod compression;
pub mod detect;
pub mod stream;

pub use compression::CompressionCodec;
pub use detect::ArchiveType;
pub use detect::detect_format;
pub use stream::ArchiveWriter;
pub use stream::open_archive_reader;
