//! Compression codecs and level conversion.
//!
//! Levels follow one user-facing scale (1-9) that each codec maps onto its
//! own range. The subset archive is always written at 9, the best ratio each
//! codec offers on that scale.

/// Level used for the output archive unless overridden.
pub const MAX_COMPRESSION_LEVEL: u8 = 9;

/// Compression codec wrapping a tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip compression (deflate algorithm).
    Gzip,
    /// Bzip2 compression (Burrows-Wheeler algorithm).
    Bzip2,
    /// Xz compression (LZMA2 algorithm).
    Xz,
    /// Zstd compression (Zstandard algorithm).
    Zstd,
}

impl CompressionCodec {
    /// Returns a human-readable name for this codec.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarsubset_core::formats::compression::CompressionCodec;
    ///
    /// assert_eq!(CompressionCodec::Gzip.name(), "gzip");
    /// assert_eq!(CompressionCodec::Zstd.name(), "zstd");
    /// ```
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }
}

/// Converts a user compression level (1-9) to a flate2 compression level.
///
/// - `6`: default compression
/// - `1-3`: fast compression
/// - `7-9`: best compression
/// - other values: literal level
#[must_use]
pub fn compression_level_to_flate2(level: u8) -> flate2::Compression {
    match level {
        6 => flate2::Compression::default(),
        1..=3 => flate2::Compression::fast(),
        7..=9 => flate2::Compression::best(),
        n => flate2::Compression::new(u32::from(n)),
    }
}

/// Converts a user compression level (1-9) to a bzip2 compression level.
#[must_use]
pub fn compression_level_to_bzip2(level: u8) -> bzip2::Compression {
    match level {
        6 => bzip2::Compression::default(),
        1 => bzip2::Compression::fast(),
        7..=9 => bzip2::Compression::best(),
        n => bzip2::Compression::new(u32::from(n.clamp(1, 9))),
    }
}

/// Converts a user compression level (1-9) to an xz preset.
#[must_use]
pub fn compression_level_to_xz(level: u8) -> u32 {
    u32::from(level.min(9))
}

/// Converts a user compression level (1-9) to a zstd compression level.
///
/// Zstd has a wider range (1-22) than the user scale:
///
/// - `1`, `2`: levels 1 and 2
/// - `7`: level 10
/// - `8`: level 15
/// - `9`: level 19
/// - everything else: level 3 (zstd default)
///
/// # Examples
///
/// ```
/// use tarsubset_core::formats::compression::compression_level_to_zstd;
///
/// assert_eq!(compression_level_to_zstd(9), 19);
/// assert_eq!(compression_level_to_zstd(6), 3);
/// ```
#[allow(clippy::match_same_arms)]
#[must_use]
pub fn compression_level_to_zstd(level: u8) -> i32 {
    match level {
        1 => 1,
        2 => 2,
        7 => 10,
        8 => 15,
        9 => 19,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level_to_flate2() {
        assert_eq!(compression_level_to_flate2(6), flate2::Compression::default());
        assert_eq!(compression_level_to_flate2(1), flate2::Compression::fast());
        assert_eq!(compression_level_to_flate2(9), flate2::Compression::best());
        assert_eq!(compression_level_to_flate2(5), flate2::Compression::new(5));
    }

    #[test]
    fn test_compression_level_to_bzip2() {
        assert_eq!(compression_level_to_bzip2(6), bzip2::Compression::default());
        assert_eq!(compression_level_to_bzip2(1), bzip2::Compression::fast());
        assert_eq!(compression_level_to_bzip2(9), bzip2::Compression::best());
        assert_eq!(compression_level_to_bzip2(4), bzip2::Compression::new(4));
    }

    #[test]
    fn test_compression_level_to_xz() {
        assert_eq!(compression_level_to_xz(1), 1);
        assert_eq!(compression_level_to_xz(9), 9);
    }

    #[test]
    fn test_compression_level_to_zstd() {
        assert_eq!(compression_level_to_zstd(1), 1);
        assert_eq!(compression_level_to_zstd(2), 2);
        assert_eq!(compression_level_to_zstd(6), 3);
        assert_eq!(compression_level_to_zstd(7), 10);
        assert_eq!(compression_level_to_zstd(8), 15);
        assert_eq!(compression_level_to_zstd(9), 19);
    }

    #[test]
    fn test_codec_name() {
        assert_eq!(CompressionCodec::Bzip2.name(), "bzip2");
        assert_eq!(CompressionCodec::Xz.name(), "xz");
    }
}
