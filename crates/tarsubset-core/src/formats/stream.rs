//! Codec-aware readers and writers around a tar stream.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::io::{self};
use std::path::Path;

use crate::Result;
use crate::SubsetError;
use crate::formats::compression::compression_level_to_bzip2;
use crate::formats::compression::compression_level_to_flate2;
use crate::formats::compression::compression_level_to_xz;
use crate::formats::compression::compression_level_to_zstd;
use crate::formats::detect::ArchiveType;

/// Opens `path` and returns a reader yielding the decompressed tar stream.
///
/// Gzip input is read with a multi-member decoder so archives built by
/// concatenating gzip streams are read to the end.
///
/// # Errors
///
/// Returns `SourceNotFound` if the file does not exist, or an I/O error if it
/// cannot be opened or the decoder cannot be initialized.
pub fn open_archive_reader(path: &Path, format: ArchiveType) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            SubsetError::SourceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SubsetError::Io(e)
        }
    })?;
    let reader = BufReader::new(file);

    let decoded: Box<dyn Read> = match format {
        ArchiveType::Tar => Box::new(reader),
        ArchiveType::TarGz => Box::new(flate2::read::MultiGzDecoder::new(reader)),
        ArchiveType::TarBz2 => Box::new(bzip2::read::BzDecoder::new(reader)),
        ArchiveType::TarXz => Box::new(xz2::read::XzDecoder::new(reader)),
        ArchiveType::TarZst => Box::new(zstd::stream::read::Decoder::new(reader)?),
    };
    Ok(decoded)
}

/// Writer that compresses a tar stream with the codec of an [`ArchiveType`].
///
/// Call [`ArchiveWriter::finish`] once the tar builder is done; it writes the
/// codec trailer and surfaces any error that dropping the encoder would hide.
pub enum ArchiveWriter<W: Write> {
    /// No compression.
    Plain(W),
    /// Gzip encoder.
    Gzip(flate2::write::GzEncoder<W>),
    /// Bzip2 encoder.
    Bzip2(bzip2::write::BzEncoder<W>),
    /// Xz encoder.
    Xz(xz2::write::XzEncoder<W>),
    /// Zstd encoder.
    Zstd(zstd::Encoder<'static, W>),
}

impl<W: Write> ArchiveWriter<W> {
    /// Wraps `inner` in the encoder for `format` at the given user level (1-9).
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the zstd encoder cannot be initialized.
    pub fn new(inner: W, format: ArchiveType, level: u8) -> Result<Self> {
        let writer = match format {
            ArchiveType::Tar => Self::Plain(inner),
            ArchiveType::TarGz => Self::Gzip(flate2::write::GzEncoder::new(
                inner,
                compression_level_to_flate2(level),
            )),
            ArchiveType::TarBz2 => Self::Bzip2(bzip2::write::BzEncoder::new(
                inner,
                compression_level_to_bzip2(level),
            )),
            ArchiveType::TarXz => {
                Self::Xz(xz2::write::XzEncoder::new(inner, compression_level_to_xz(level)))
            }
            ArchiveType::TarZst => {
                let mut encoder = zstd::Encoder::new(inner, compression_level_to_zstd(level))?;
                encoder.include_checksum(true)?;
                Self::Zstd(encoder)
            }
        };
        Ok(writer)
    }

    /// Flushes the codec trailer and returns the inner writer.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the trailer cannot be written.
    pub fn finish(self) -> io::Result<W> {
        match self {
            Self::Plain(w) => Ok(w),
            Self::Gzip(e) => e.finish(),
            Self::Bzip2(e) => e.finish(),
            Self::Xz(e) => e.finish(),
            Self::Zstd(e) => e.finish(),
        }
    }
}

impl<W: Write> Write for ArchiveWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            Self::Gzip(e) => e.write(buf),
            Self::Bzip2(e) => e.write(buf),
            Self::Xz(e) => e.write(buf),
            Self::Zstd(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(e) => e.flush(),
            Self::Bzip2(e) => e.flush(),
            Self::Xz(e) => e.flush(),
            Self::Zstd(e) => e.flush(),
        }
    }
}
