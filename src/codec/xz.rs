//! XZ and legacy LZMA codec implementations.

use std::io::{self, Read};

use xz2::read::XzDecoder as XzReader;
use xz2::stream::{CONCATENATED, Stream};

use super::{CompressionFormat, Decoder};

/// XZ decoder.
///
/// Concatenated `.xz` streams are decoded as one output. Only the `.xz`
/// container is accepted; LZMA-alone data fails to decode.
pub struct XzDecoder<R: Read> {
    inner: XzReader<R>,
}

impl<R: Read> std::fmt::Debug for XzDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XzDecoder").finish_non_exhaustive()
    }
}

impl<R: Read + Send> XzDecoder<R> {
    /// Creates a new XZ decoder with no memory limit.
    ///
    /// # Arguments
    ///
    /// * `input` - The compressed data source
    ///
    /// # Errors
    ///
    /// Returns an error if liblzma cannot allocate the decoder.
    pub fn new(input: R) -> io::Result<Self> {
        let stream = Stream::new_stream_decoder(u64::MAX, CONCATENATED).map_err(io::Error::other)?;
        Ok(Self {
            inner: XzReader::new_stream(input, stream),
        })
    }
}

impl<R: Read + Send> Read for XzDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Send> Decoder for XzDecoder<R> {
    fn format(&self) -> CompressionFormat {
        CompressionFormat::Xz
    }
}

/// LZMA decoder for the legacy `.lzma` ("LZMA alone") container.
pub struct LzmaDecoder<R: Read> {
    inner: XzReader<R>,
}

impl<R: Read> std::fmt::Debug for LzmaDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LzmaDecoder").finish_non_exhaustive()
    }
}

impl<R: Read + Send> LzmaDecoder<R> {
    /// Creates a new LZMA decoder with no memory limit.
    ///
    /// # Arguments
    ///
    /// * `input` - The compressed data source
    ///
    /// # Errors
    ///
    /// Returns an error if liblzma cannot allocate the decoder.
    pub fn new(input: R) -> io::Result<Self> {
        let stream = Stream::new_lzma_decoder(u64::MAX).map_err(io::Error::other)?;
        Ok(Self {
            inner: XzReader::new_stream(input, stream),
        })
    }
}

impl<R: Read + Send> Read for LzmaDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Send> Decoder for LzmaDecoder<R> {
    fn format(&self) -> CompressionFormat {
        CompressionFormat::Lzma
    }
}
