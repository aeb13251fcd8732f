//! Source references: local paths and remote URLs.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::{Error, Result};

/// URL schemes recognised as remote sources.
///
/// Anything else (notably `C:/dir/file.gz`) is treated as a local path.
pub const URL_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps", "file"];

/// Where the compressed input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// A file on the local filesystem.
    Local(PathBuf),
    /// A URL that has to be fetched before decompression.
    Remote(Url),
}

impl SourceRef {
    /// Interprets a `src` option.
    ///
    /// With `copy` set the source is always a local path. Otherwise URLs with
    /// a recognised scheme become [`SourceRef::Remote`] (`file://` URLs are
    /// turned back into local paths) and anything else is a local path.
    pub fn parse(src: &str, copy: bool) -> Result<Self> {
        if copy {
            return Ok(Self::Local(expand_user(src)));
        }

        match parse_url(src) {
            Some(url) if url.scheme() == "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| Error::source_unavailable(src, "not a valid file URL"))?;
                Ok(Self::Local(path))
            }
            Some(url) => Ok(Self::Remote(url)),
            None => Ok(Self::Local(expand_user(src))),
        }
    }

    /// Returns true if the source has to be fetched.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Returns the source's base name.
    ///
    /// For URLs this is the last path segment; query string and fragment are
    /// never part of it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSourceName`] if the source has no usable base
    /// name (a directory-like path, a URL ending in `/`, non-UTF-8 names).
    pub fn file_name(&self) -> Result<String> {
        let name = match self {
            Self::Local(path) => path.file_name().and_then(|n| n.to_str()),
            Self::Remote(url) => url.path_segments().and_then(|mut s| s.next_back()),
        };

        match name {
            Some(n) if !n.is_empty() => Ok(n.to_string()),
            _ => Err(Error::InvalidSourceName {
                name: self.to_string(),
            }),
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Parses `src` as a URL if it carries one of the [`URL_SCHEMES`].
pub fn parse_url(src: &str) -> Option<Url> {
    let (scheme, _) = src.split_once("://")?;
    if !URL_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) {
        return None;
    }
    Url::parse(src).ok()
}

/// Expands a leading `~` to the current user's home directory.
pub fn expand_user(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(std::path::is_separator) => rest,
        _ => return PathBuf::from(path),
    };

    match home::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(std::path::is_separator)),
        None => PathBuf::from(path),
    }
}

/// Returns true if `path` ends with a path separator.
pub(crate) fn has_trailing_separator(path: &str) -> bool {
    path.chars().last().is_some_and(std::path::is_separator)
}

/// Returns the directory a path lives in, treating a bare file name as `.`.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
