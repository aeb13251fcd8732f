//! Destination path resolution.
//!
//! A destination is either a concrete file path, which is used as given, or
//! a directory, in which case the output name is derived from the source
//! name by removing one compression suffix.
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use uncompress::resolve::{DestinationSpec, resolve};
//! use uncompress::source::SourceRef;
//!
//! let src = SourceRef::parse("https://x/file.gz?version=1.0&token=abc", false).unwrap();
//! let dest = DestinationSpec::directory("/tmp/");
//! assert_eq!(resolve(&src, &dest).unwrap(), Path::new("/tmp/file"));
//! ```

use std::path::{Path, PathBuf};

use crate::codec::match_suffix;
use crate::safety::validate_file_name;
use crate::source::{SourceRef, expand_user, has_trailing_separator};
use crate::Result;

/// A destination as requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationSpec {
    path: PathBuf,
    is_dir: bool,
}

impl DestinationSpec {
    /// Interprets a `dest` option.
    ///
    /// The destination denotes a directory if it ends with a path separator
    /// or names an existing directory.
    pub fn parse(dest: &str) -> Self {
        let path = expand_user(dest);
        let is_dir = has_trailing_separator(dest) || path.is_dir();
        Self { path, is_dir }
    }

    /// A destination that is known to be a directory.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }

    /// A destination that is known to be a file path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    /// Returns the destination path as given.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the destination denotes a directory.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// Derives the decompressed file name from a source base name.
///
/// One recognised compression suffix is removed, case-insensitively.
/// Tar-family shorthands (`.tgz`, `.txz`, ...) become `.tar`. Names without
/// a recognised suffix are returned unchanged.
///
/// # Errors
///
/// Returns [`Error::InvalidSourceName`][crate::Error::InvalidSourceName] if
/// nothing usable remains, e.g. for a source literally named `.gz`.
pub fn derive_file_name(source_name: &str) -> Result<String> {
    let derived = match match_suffix(source_name) {
        Some(suffix) => suffix.strip(source_name).unwrap_or_default(),
        None => source_name.to_string(),
    };
    validate_file_name(&derived, source_name)?;
    Ok(derived)
}

/// Computes the final output path for `source` and `dest`.
///
/// File destinations are returned unchanged. Directory destinations get the
/// derived file name appended.
pub fn resolve(source: &SourceRef, dest: &DestinationSpec) -> Result<PathBuf> {
    if !dest.is_dir() {
        return Ok(dest.path.clone());
    }

    let name = derive_file_name(&source.file_name()?)?;
    Ok(dest.path.join(name))
}
