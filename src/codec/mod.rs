//! Compression format detection and streaming decoders.
//!
//! Formats are identified from the source name only. The suffix table is
//! ordered so that compound tar-family suffixes (`.tgz`, `.txz`, ...) are
//! matched before the plain ones.

#[cfg(feature = "gzip")]
pub mod gzip;

#[cfg(feature = "bzip2")]
pub mod bzip2;

#[cfg(feature = "xz")]
pub mod xz;

use std::fmt;
use std::io::{self, Read, Write};

use serde::Serialize;

use crate::{Error, READ_BUFFER_SIZE, Result};

#[cfg(feature = "gzip")]
pub use self::gzip::GzipDecoder;

#[cfg(feature = "bzip2")]
pub use self::bzip2::Bzip2Decoder;

#[cfg(feature = "xz")]
pub use self::xz::{LzmaDecoder, XzDecoder};

/// A single-stream compression format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionFormat {
    /// gzip (RFC 1952), possibly multi-member.
    Gzip,
    /// bzip2, possibly multi-stream.
    Bzip2,
    /// xz container, possibly concatenated streams.
    Xz,
    /// Legacy `.lzma` ("LZMA alone") stream.
    Lzma,
}

impl CompressionFormat {
    /// All supported formats.
    pub const ALL: [CompressionFormat; 4] = [Self::Gzip, Self::Bzip2, Self::Xz, Self::Lzma];

    /// Returns the canonical file extension, including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Gzip => ".gz",
            Self::Bzip2 => ".bz2",
            Self::Xz => ".xz",
            Self::Lzma => ".lzma",
        }
    }

    /// Returns a short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Lzma => "lzma",
        }
    }

    /// Returns the cargo feature that provides this format's decoder.
    pub fn feature(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz | Self::Lzma => "xz",
        }
    }

    /// Returns true if a decoder for this format is compiled in.
    pub fn is_supported(self) -> bool {
        match self {
            Self::Gzip => cfg!(feature = "gzip"),
            Self::Bzip2 => cfg!(feature = "bzip2"),
            Self::Xz | Self::Lzma => cfg!(feature = "xz"),
        }
    }
}

impl fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the suffix table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suffix {
    /// Lowercase suffix including the leading dot.
    pub suffix: &'static str,
    /// Format the suffix denotes.
    pub format: CompressionFormat,
    /// True for tar-family shorthands whose payload is a `.tar`.
    pub tar_compound: bool,
}

const fn row(suffix: &'static str, format: CompressionFormat, tar_compound: bool) -> Suffix {
    Suffix {
        suffix,
        format,
        tar_compound,
    }
}

/// Recognised suffixes, most specific first.
pub const SUFFIXES: &[Suffix] = &[
    row(".tgz", CompressionFormat::Gzip, true),
    row(".gz", CompressionFormat::Gzip, false),
    row(".tbz2", CompressionFormat::Bzip2, true),
    row(".tbz", CompressionFormat::Bzip2, true),
    row(".bz2", CompressionFormat::Bzip2, false),
    row(".txz", CompressionFormat::Xz, true),
    row(".xz", CompressionFormat::Xz, false),
    row(".tlz", CompressionFormat::Lzma, true),
    row(".lzma", CompressionFormat::Lzma, false),
];

impl Suffix {
    /// Strips this suffix from `name` and returns the decompressed file name.
    ///
    /// Compound suffixes are replaced with `.tar` instead of being removed.
    /// Returns `None` unless `name` ends with the suffix (ASCII
    /// case-insensitively).
    pub fn strip(&self, name: &str) -> Option<String> {
        let split = name.len().checked_sub(self.suffix.len())?;
        let (stem, tail) = (name.get(..split)?, name.get(split..)?);
        if !tail.eq_ignore_ascii_case(self.suffix) {
            return None;
        }
        Some(if self.tar_compound {
            format!("{}.tar", stem)
        } else {
            stem.to_string()
        })
    }
}

/// Looks up the suffix table for `name` without failing.
pub fn match_suffix(name: &str) -> Option<Suffix> {
    let lower = name.to_ascii_lowercase();
    SUFFIXES
        .iter()
        .find(|row| lower.ends_with(row.suffix))
        .copied()
}

/// Detects the compression format of a source file name.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] naming the trailing extension when no
/// suffix matches. The format is never guessed.
pub fn detect_format(name: &str) -> Result<Suffix> {
    match_suffix(name).ok_or_else(|| Error::UnsupportedFormat {
        name: name.to_string(),
        extension: trailing_extension(name).to_string(),
    })
}

/// Returns the last `.ext` of `name`, or an empty string.
fn trailing_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos > 0 => &name[pos..],
        _ => "",
    }
}

/// A decoder that reads compressed data and produces uncompressed output.
pub trait Decoder: Read + Send {
    /// Returns the format this decoder handles.
    fn format(&self) -> CompressionFormat;
}

/// Fails with [`Error::UnsupportedFeature`] if `format` is compiled out.
pub fn ensure_supported(format: CompressionFormat) -> Result<()> {
    if format.is_supported() {
        Ok(())
    } else {
        Err(Error::UnsupportedFeature {
            feature: format.feature(),
        })
    }
}

/// Builds a decoder for `format` over `input`.
///
/// # Errors
///
/// Returns an error if the decoder cannot be initialised or the format is
/// not compiled in.
pub fn build_decoder<'a, R: Read + Send + 'a>(
    input: R,
    format: CompressionFormat,
) -> io::Result<Box<dyn Decoder + 'a>> {
    match format {
        #[cfg(feature = "gzip")]
        CompressionFormat::Gzip => Ok(Box::new(GzipDecoder::new(input))),

        #[cfg(feature = "bzip2")]
        CompressionFormat::Bzip2 => Ok(Box::new(Bzip2Decoder::new(input))),

        #[cfg(feature = "xz")]
        CompressionFormat::Xz => Ok(Box::new(XzDecoder::new(input)?)),

        #[cfg(feature = "xz")]
        CompressionFormat::Lzma => Ok(Box::new(LzmaDecoder::new(input)?)),

        #[allow(unreachable_patterns)]
        other => {
            drop(input);
            Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("{} support is not compiled in", other),
            ))
        }
    }
}

/// Failure while streaming a decompression.
#[derive(Debug)]
pub enum StreamError {
    /// The decoder failed: corrupt, truncated or mismatched input.
    Decode(io::Error),
    /// The output sink failed.
    Write(io::Error),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "decode error: {}", e),
            Self::Write(e) => write!(f, "write error: {}", e),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) | Self::Write(e) => Some(e),
        }
    }
}

/// Decompresses `input` into `output` in bounded chunks.
///
/// Returns the number of decompressed bytes written. Memory use is bounded by
/// [`READ_BUFFER_SIZE`] plus the decoder's own state.
pub fn decompress<R: Read + Send, W: Write + ?Sized>(
    input: R,
    format: CompressionFormat,
    output: &mut W,
) -> std::result::Result<u64, StreamError> {
    let mut decoder = build_decoder(input, format).map_err(StreamError::Decode)?;
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let n = match decoder.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(StreamError::Decode(e)),
        };
        output.write_all(&buf[..n]).map_err(StreamError::Write)?;
        total += n as u64;
    }

    output.flush().map_err(StreamError::Write)?;
    Ok(total)
}
