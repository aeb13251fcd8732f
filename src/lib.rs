//! # uncompress
//!
//! Idempotent decompression of a single gzip, bzip2, xz or lzma file.
//!
//! A task takes a local path or URL of a compressed file and a destination
//! that is either a file path or a directory. The output name is derived by
//! dropping one compression suffix (`tool.gz` → `tool`, `app.tgz` →
//! `app.tar`). Output is decompressed into a staging file beside the
//! destination and renamed into place only if the content differs, so
//! re-running a task reports `changed: false` and leaves the file alone.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use uncompress::{Result, Uncompress, UncompressOptions};
//!
//! fn main() -> Result<()> {
//!     let options = UncompressOptions::new("/tmp/myfile.bz2", "/opt/myapp/").mode("0755");
//!     let result = Uncompress::new(options).run()?;
//!
//!     println!("{} (changed: {})", result.dest.display(), result.changed);
//!     Ok(())
//! }
//! ```
//!
//! ### Remote Sources
//!
//! With `copy(false)`, `http`, `https`, `ftp`, `ftps` and `file` URLs are
//! fetched first. The query string never becomes part of the output name:
//!
//! ```rust,no_run
//! use uncompress::{Uncompress, UncompressOptions};
//!
//! let options = UncompressOptions::new("https://example.com/file.gz?version=1.0", "/tmp/")
//!     .copy(false)
//!     .timeout(30);
//! let result = Uncompress::new(options).run().unwrap();
//! assert!(result.dest.ends_with("file"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `gzip` | Yes | `.gz` / `.tgz` via flate2 |
//! | `bzip2` | Yes | `.bz2` / `.tbz2` / `.tbz` via bzip2 |
//! | `xz` | Yes | `.xz` / `.txz` and legacy `.lzma` / `.tlz` via xz2 |
//! | `http` | Yes | Blocking HTTP(S) fetcher via reqwest |
//! | `cli` | No | Command-line interface tool |
//!
//! A format whose feature is disabled fails with
//! [`Error::UnsupportedFeature`] before anything is read or written.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`], with [`Error`] naming the path,
//! URL or extension at fault. See the [`error`] module.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

/// Default buffer size for streaming reads and writes (64 KiB).
pub(crate) const READ_BUFFER_SIZE: usize = 64 * 1024;

pub mod change;
pub mod codec;
pub mod error;
pub mod fetch;
pub mod metadata;
pub mod options;
pub mod ownership;
pub mod resolve;
pub mod safety;
pub mod source;
pub mod task;

pub use codec::CompressionFormat;
pub use error::{Error, Result};
pub use fetch::Fetcher;
pub use metadata::{FileAttributes, FileMode};
pub use options::UncompressOptions;
pub use ownership::UnixOwnership;
pub use resolve::DestinationSpec;
pub use source::SourceRef;
pub use task::{ResolvedTask, TaskResult, Uncompress, run};

#[cfg(feature = "http")]
#[cfg_attr(docsrs, doc(cfg(feature = "http")))]
pub use fetch::HttpFetcher;
