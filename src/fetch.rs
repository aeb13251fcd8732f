//! Source acquisition.
//!
//! Local sources are read in place. Remote sources are downloaded by a
//! [`Fetcher`] into a temporary file that is removed when the task ends.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
#[cfg(feature = "http")]
use std::time::Duration;

use tempfile::NamedTempFile;
use url::Url;

use crate::source::SourceRef;
use crate::{Error, READ_BUFFER_SIZE, Result};

/// Downloads remote sources.
///
/// Implementations own any timeout or retry policy; the task itself never
/// retries.
pub trait Fetcher {
    /// Streams the body at `url` into `sink` and returns the byte count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnavailable`] on network failures and
    /// non-success responses.
    fn fetch(&self, url: &Url, sink: &mut dyn Write) -> Result<u64>;
}

/// HTTP(S) fetcher backed by a blocking `reqwest` client.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    /// Creates a fetcher without a request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Creates a fetcher with an optional whole-request timeout.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("uncompress/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Io(io::Error::other(e)))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url, sink: &mut dyn Write) -> Result<u64> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| Error::source_unavailable(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::source_unavailable(
                url.as_str(),
                format!("HTTP status {}", status),
            ));
        }

        response
            .copy_to(sink)
            .map_err(|e| Error::source_unavailable(url.as_str(), e))
    }
}

/// Fetcher used when HTTP support is compiled out.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledFetcher;

impl Fetcher for DisabledFetcher {
    fn fetch(&self, _url: &Url, _sink: &mut dyn Write) -> Result<u64> {
        Err(Error::UnsupportedFeature { feature: "http" })
    }
}

/// A source that is ready to be read from the local filesystem.
#[derive(Debug)]
pub enum AcquiredSource {
    /// The caller's own file.
    Local(PathBuf),
    /// A downloaded copy, deleted on drop.
    Downloaded(NamedTempFile),
}

impl AcquiredSource {
    /// Returns the path to read from.
    pub fn path(&self) -> &Path {
        match self {
            Self::Local(path) => path,
            Self::Downloaded(file) => file.path(),
        }
    }

    /// Opens the source for reading.
    pub fn open(&self) -> Result<File> {
        File::open(self.path())
            .map_err(|e| Error::source_unavailable(self.path().display().to_string(), e))
    }
}

/// Makes `source` available locally.
///
/// # Errors
///
/// - [`Error::SourceUnavailable`] if a local file is missing or unreadable,
///   or the download fails
/// - [`Error::EmptySource`] if the source holds no bytes
pub fn acquire(source: &SourceRef, fetcher: &dyn Fetcher) -> Result<AcquiredSource> {
    let acquired = match source {
        SourceRef::Local(path) => {
            let meta = fs::metadata(path).map_err(|e| {
                let reason = if e.kind() == io::ErrorKind::NotFound {
                    "does not exist".to_string()
                } else {
                    e.to_string()
                };
                Error::source_unavailable(path.display().to_string(), reason)
            })?;
            if !meta.is_file() {
                return Err(Error::source_unavailable(
                    path.display().to_string(),
                    "not a regular file",
                ));
            }
            AcquiredSource::Local(path.clone())
        }
        SourceRef::Remote(url) => {
            let file = download(url, fetcher)?;
            AcquiredSource::Downloaded(file)
        }
    };

    let size = fs::metadata(acquired.path())
        .map_err(|e| Error::source_unavailable(source.to_string(), e))?
        .len();
    if size == 0 {
        return Err(Error::EmptySource {
            path: acquired.path().to_path_buf(),
        });
    }

    acquired.open()?;
    Ok(acquired)
}

fn download(url: &Url, fetcher: &dyn Fetcher) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(".uncompress-download-")
        .tempfile()?;

    let bytes = {
        let mut writer = BufWriter::with_capacity(READ_BUFFER_SIZE, file.as_file_mut());
        let bytes = fetcher.fetch(url, &mut writer)?;
        writer.flush()?;
        bytes
    };
    log::debug!("Downloaded {} bytes from {} to '{}'", bytes, url, file.path().display());

    file.as_file_mut().sync_all()?;
    Ok(file)
}
