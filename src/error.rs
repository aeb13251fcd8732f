//! Error types for decompression tasks.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes of an uncompress task, along with a convenient
//! [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. A failed
//! task never leaves a partially written destination behind, so callers can
//! report the error and stop:
//!
//! ```rust,no_run
//! use uncompress::{Error, Uncompress, UncompressOptions};
//!
//! fn run(src: &str, dest: &str) -> uncompress::Result<()> {
//!     match Uncompress::new(UncompressOptions::new(src, dest)).run() {
//!         Ok(result) => {
//!             println!("{} (changed: {})", result.dest.display(), result.changed);
//!             Ok(())
//!         }
//!         Err(Error::UnsupportedFormat { extension, .. }) => {
//!             eprintln!("Cannot decompress '{}' files", extension);
//!             Err(Error::UnsupportedFormat { name: src.into(), extension })
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;

use crate::codec::CompressionFormat;

/// Which kind of principal an ownership lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalKind {
    /// A user (file owner).
    User,
    /// A group.
    Group,
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// The main error type for uncompress tasks.
///
/// Each variant carries the path, name or extension that caused it, so a
/// failure can be diagnosed from the message alone.
///
/// # Error Categories
///
/// | Category | Variants |
/// |----------|----------|
/// | Source | [`SourceUnavailable`][Self::SourceUnavailable], [`EmptySource`][Self::EmptySource] |
/// | Naming | [`UnsupportedFormat`][Self::UnsupportedFormat], [`InvalidSourceName`][Self::InvalidSourceName] |
/// | Data | [`DecompressionError`][Self::DecompressionError] |
/// | Destination | [`DestinationWriteError`][Self::DestinationWriteError] |
/// | Metadata | [`InvalidMode`][Self::InvalidMode], [`UnknownOwner`][Self::UnknownOwner], [`MetadataError`][Self::MetadataError] |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error not attributable to a more specific stage.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source could not be read or fetched.
    ///
    /// Returned for missing local files, unreadable files, network failures
    /// and non-success HTTP responses. The destination is never touched.
    #[error("Source '{source_ref}' is unavailable: {reason}")]
    SourceUnavailable {
        /// The source path or URL as given.
        source_ref: String,
        /// What went wrong.
        reason: String,
    },

    /// The source exists but contains no bytes.
    #[error("Invalid source '{}': the file is 0 bytes", path.display())]
    EmptySource {
        /// The local source path.
        path: PathBuf,
    },

    /// The source name carries no recognised compression extension.
    #[error("Unsupported compression format for '{name}': extension '{extension}'")]
    UnsupportedFormat {
        /// The source file name.
        name: String,
        /// The offending extension (empty when the name has none).
        extension: String,
    },

    /// A destination filename could not be derived from the source name.
    #[error("Cannot derive a file name from source '{name}'")]
    InvalidSourceName {
        /// The source name the derivation started from.
        name: String,
    },

    /// The compressed stream is corrupt, truncated or not of the detected format.
    #[error("Failed to decompress '{}' as {format}: {source}", path.display())]
    DecompressionError {
        /// The local source path being decoded.
        path: PathBuf,
        /// The format the source was decoded as.
        format: CompressionFormat,
        /// The underlying decoder error.
        #[source]
        source: io::Error,
    },

    /// The destination could not be written.
    ///
    /// Covers missing parent directories, permission problems, a full disk,
    /// and destinations that exist but are not regular files.
    #[error("Cannot write destination '{}': {source}", path.display())]
    DestinationWriteError {
        /// The destination path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The requested mode string could not be parsed.
    #[error("Invalid mode '{mode}': {reason}")]
    InvalidMode {
        /// The mode as given.
        mode: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A user or group name did not resolve.
    #[error("Unknown {kind} '{name}'")]
    UnknownOwner {
        /// User or group.
        kind: PrincipalKind,
        /// The name as given.
        name: String,
    },

    /// Applying mode or ownership to the destination failed.
    #[error("Failed to apply metadata to '{}': {source}", path.display())]
    MetadataError {
        /// The destination path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// A feature needed for this source is not compiled in.
    ///
    /// Enable the corresponding cargo feature (`gzip`, `bzip2`, `xz`, `http`).
    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature {
        /// The name of the missing feature.
        feature: &'static str,
    },
}

/// A specialized Result type for uncompress operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps an I/O error raised while writing `path`.
    pub(crate) fn destination(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::DestinationWriteError {
            path: path.into(),
            source,
        }
    }

    /// Wraps an I/O error raised while applying metadata to `path`.
    pub(crate) fn metadata(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::MetadataError {
            path: path.into(),
            source,
        }
    }

    /// Builds a [`SourceUnavailable`][Self::SourceUnavailable] error.
    pub(crate) fn source_unavailable(
        source_ref: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::SourceUnavailable {
            source_ref: source_ref.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if the error was caused by the source rather than the destination.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. }
                | Self::EmptySource { .. }
                | Self::UnsupportedFormat { .. }
                | Self::InvalidSourceName { .. }
                | Self::DecompressionError { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_message_names_extension() {
        let err = Error::UnsupportedFormat {
            name: "file.zip".into(),
            extension: ".zip".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("file.zip"));
        assert!(msg.contains("'.zip'"));
    }

    #[test]
    fn test_decompression_error_keeps_cause() {
        use std::error::Error as _;

        let err = Error::DecompressionError {
            path: PathBuf::from("/tmp/a.gz"),
            format: CompressionFormat::Gzip,
            source: io::Error::new(io::ErrorKind::InvalidData, "invalid gzip header"),
        };
        assert!(err.to_string().contains("/tmp/a.gz"));
        assert!(err.to_string().contains("gzip"));
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("invalid gzip header".to_string())
        );
    }

    #[test]
    fn test_source_error_classification() {
        assert!(Error::source_unavailable("x.gz", "not found").is_source_error());
        assert!(
            Error::InvalidSourceName {
                name: ".gz".into()
            }
            .is_source_error()
        );
        assert!(!Error::destination("/tmp/x", io::Error::other("disk full")).is_source_error());
    }

    #[test]
    fn test_principal_kind_display() {
        let err = Error::UnknownOwner {
            kind: PrincipalKind::Group,
            name: "nogroup-xyz".into(),
        };
        assert_eq!(err.to_string(), "Unknown group 'nogroup-xyz'");
    }
}
