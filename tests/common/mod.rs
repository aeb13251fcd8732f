//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use uncompress::codec::detect_format;
use uncompress::{CompressionFormat, Error, Fetcher};
use url::Url;

/// Compresses `data` in the given format.
pub fn compress(format: CompressionFormat, data: &[u8]) -> Vec<u8> {
    match format {
        CompressionFormat::Gzip => {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionFormat::Bzip2 => {
            let mut encoder =
                bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionFormat::Xz => {
            let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionFormat::Lzma => {
            let options = xz2::stream::LzmaOptions::new_preset(6).unwrap();
            let stream = xz2::stream::Stream::new_lzma_encoder(&options).unwrap();
            let mut encoder = xz2::write::XzEncoder::new_stream(Vec::new(), stream);
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
    }
}

/// Writes `data` compressed according to the suffix of `name` into `dir`.
pub fn write_source(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let format = detect_format(name).unwrap().format;
    let path = dir.join(name);
    std::fs::write(&path, compress(format, data)).unwrap();
    path
}

/// Formats a directory as a destination string with a trailing separator.
pub fn dir_dest(dir: &Path) -> String {
    format!("{}/", dir.display())
}

/// Returns the path as a `&str`.
pub fn s(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Sample content with some structure, so every codec has work to do.
pub fn sample_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 31) ^ (i >> 3)) as u8).collect()
}

/// In-memory fetcher serving fixed bodies by URL.
#[derive(Debug, Clone, Default)]
pub struct MapFetcher {
    bodies: HashMap<String, Vec<u8>>,
    calls: Arc<AtomicUsize>,
}

impl MapFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: Vec<u8>) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }

    /// Shared counter of fetch calls.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Fetcher for MapFetcher {
    fn fetch(&self, url: &Url, sink: &mut dyn Write) -> uncompress::Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = self.bodies.get(url.as_str()).ok_or_else(|| Error::SourceUnavailable {
            source_ref: url.to_string(),
            reason: "HTTP status 404 Not Found".to_string(),
        })?;
        sink.write_all(body)?;
        Ok(body.len() as u64)
    }
}

/// Fetcher that must never be called.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicFetcher;

impl Fetcher for PanicFetcher {
    fn fetch(&self, url: &Url, _sink: &mut dyn Write) -> uncompress::Result<u64> {
        panic!("unexpected fetch of {}", url);
    }
}
