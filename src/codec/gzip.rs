//! Gzip codec implementation.

use std::io::{self, Read};

use flate2::read::MultiGzDecoder;

use super::{CompressionFormat, Decoder};

/// Gzip decoder.
///
/// Concatenated gzip members are decoded back to back, as `gunzip` does.
pub struct GzipDecoder<R> {
    inner: MultiGzDecoder<R>,
}

impl<R> std::fmt::Debug for GzipDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GzipDecoder").finish_non_exhaustive()
    }
}

impl<R: Read + Send> GzipDecoder<R> {
    /// Creates a new gzip decoder.
    ///
    /// # Arguments
    ///
    /// * `input` - The compressed data source
    pub fn new(input: R) -> Self {
        Self {
            inner: MultiGzDecoder::new(input),
        }
    }
}

impl<R: Read + Send> Read for GzipDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Send> Decoder for GzipDecoder<R> {
    fn format(&self) -> CompressionFormat {
        CompressionFormat::Gzip
    }
}
