//! Byte-counting writer.
//!
//! Sits between the codec encoder and the output file so the repacker can
//! report the compressed size without re-reading the archive.

use std::io::Write;

/// Wrapper writer that tracks total bytes successfully written.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use tarsubset_core::io::CountingWriter;
///
/// let mut writer = CountingWriter::new(Vec::new());
/// writer.write_all(b"pg11")?;
/// assert_eq!(writer.total_bytes(), 4);
/// assert_eq!(writer.into_inner(), b"pg11");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
}

impl<W> CountingWriter<W> {
    /// Creates a new counting writer.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    /// Returns the total number of bytes successfully written.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.bytes_written
    }

    /// Consumes the counting writer and returns the inner writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let bytes = self.inner.write(buf)?;
        self.bytes_written += bytes as u64;
        Ok(bytes)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_across_writes() {
        let mut writer = CountingWriter::new(Vec::new());
        writer.write_all(b"cache/").unwrap();
        write!(writer, "epub/{}", 11).unwrap();
        writer.flush().unwrap();

        assert_eq!(writer.total_bytes(), 13);
        assert_eq!(writer.into_inner(), b"cache/epub/11");
    }

    #[test]
    fn test_empty_writer_reports_zero() {
        let writer = CountingWriter::new(Vec::<u8>::new());
        assert_eq!(writer.total_bytes(), 0);
    }

    #[test]
    fn test_partial_write_counts_only_accepted_bytes() {
        struct Trickle(Vec<u8>);

        impl Write for Trickle {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                let n = buf.len().min(2);
                self.0.extend_from_slice(&buf[..n]);
                Ok(n)
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = CountingWriter::new(Trickle(Vec::new()));
        assert_eq!(writer.write(b"pg84").unwrap(), 2);
        assert_eq!(writer.total_bytes(), 2);
    }
}
