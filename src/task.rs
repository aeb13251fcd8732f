//! The decompression task.
//!
//! [`Uncompress`] runs the whole pipeline for one source:
//!
//! 1. Plan: parse the source, detect the format from its name, resolve and
//!    validate the destination, parse mode and ownership.
//! 2. Acquire: use the local file or download the URL to a temporary file.
//! 3. Stage: decompress into a hidden file next to the destination.
//! 4. Commit: if the content differs, apply mode and ownership to the staged
//!    file and rename it over the destination. Otherwise discard it and apply
//!    mode and ownership to the existing destination.
//!
//! Nothing is written to the destination path before the rename, and the
//! rename is the last fallible step of a content change, so a failed task
//! never leaves a partial or half-configured file behind.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::change::{ContentChange, detect_change};
use crate::codec::{self, CompressionFormat, StreamError};
use crate::fetch::{AcquiredSource, DisabledFetcher, Fetcher, acquire};
use crate::metadata::FileAttributes;
use crate::options::UncompressOptions;
use crate::resolve::{DestinationSpec, resolve};
use crate::safety::validate_destination;
use crate::source::{SourceRef, parent_dir};
use crate::{Error, READ_BUFFER_SIZE, Result};

/// Outcome of a successful task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskResult {
    /// True if the content or the metadata of the destination changed.
    pub changed: bool,
    /// The final destination path.
    pub dest: PathBuf,
    /// True if the decompressed content was written.
    pub content_changed: bool,
    /// True if mode or ownership was altered.
    pub metadata_changed: bool,
    /// The format the source was decoded as.
    pub format: CompressionFormat,
}

/// Everything decided before any I/O on the source.
#[derive(Debug, Clone)]
pub struct ResolvedTask {
    /// Where the compressed data comes from.
    pub source: SourceRef,
    /// The final destination path.
    pub dest: PathBuf,
    /// The detected compression format.
    pub format: CompressionFormat,
    /// Requested mode and ownership.
    pub attributes: FileAttributes,
}

/// A single-file decompression task.
pub struct Uncompress {
    options: UncompressOptions,
    fetcher: Option<Box<dyn Fetcher>>,
}

impl fmt::Debug for Uncompress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uncompress")
            .field("options", &self.options)
            .field("custom_fetcher", &self.fetcher.is_some())
            .finish_non_exhaustive()
    }
}

impl Uncompress {
    /// Creates a task from options.
    pub fn new(options: UncompressOptions) -> Self {
        Self {
            options,
            fetcher: None,
        }
    }

    /// Replaces the default HTTP fetcher for remote sources.
    pub fn with_fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    /// Returns the task options.
    pub fn options(&self) -> &UncompressOptions {
        &self.options
    }

    /// Resolves source, format, destination and attributes without touching
    /// any file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`], [`Error::UnsupportedFeature`],
    /// [`Error::InvalidSourceName`], [`Error::DestinationWriteError`],
    /// [`Error::InvalidMode`] or [`Error::UnknownOwner`].
    pub fn plan(&self) -> Result<ResolvedTask> {
        let options = &self.options;
        let source = SourceRef::parse(&options.src, options.copy)?;
        let suffix = codec::detect_format(&source.file_name()?)?;
        codec::ensure_supported(suffix.format)?;

        let dest = resolve(&source, &DestinationSpec::parse(&options.dest))?;
        validate_destination(&dest)?;

        let attributes = FileAttributes::from_options(
            options.mode.as_deref(),
            options.owner.as_deref(),
            options.group.as_deref(),
        )?;

        Ok(ResolvedTask {
            source,
            dest,
            format: suffix.format,
            attributes,
        })
    }

    /// Runs the task.
    ///
    /// # Errors
    ///
    /// Any [`Error`]. On error the destination content is unchanged.
    pub fn run(&self) -> Result<TaskResult> {
        let task = self.plan()?;
        log::debug!(
            "Decompressing '{}' as {} into '{}'",
            task.source,
            task.format,
            task.dest.display()
        );

        let acquired = self.acquire(&task.source)?;
        let staged = stage(&task, &acquired)?;

        let change = detect_change(&task.dest, staged.path())?;
        drop(acquired);

        let metadata_changed = match change {
            ContentChange::Unchanged => {
                log::debug!("'{}' is up to date", task.dest.display());
                drop(staged);
                task.attributes.apply(&task.dest)?
            }
            change => {
                if change == ContentChange::Replace {
                    preserve_permissions(&task.dest, staged.path());
                }
                let changed = task
                    .attributes
                    .apply(staged.path())
                    .map_err(|e| staged_error(e, &task.dest))?;
                commit(staged, &task.dest, change)?;
                changed
            }
        };
        let content_changed = change.needs_write();

        Ok(TaskResult {
            changed: content_changed || metadata_changed,
            dest: task.dest,
            content_changed,
            metadata_changed,
            format: task.format,
        })
    }

    fn acquire(&self, source: &SourceRef) -> Result<AcquiredSource> {
        if let Some(fetcher) = &self.fetcher {
            return acquire(source, fetcher.as_ref());
        }
        if !source.is_remote() {
            return acquire(source, &DisabledFetcher);
        }

        #[cfg(feature = "http")]
        {
            let fetcher = crate::fetch::HttpFetcher::with_timeout(self.options.timeout_duration())?;
            acquire(source, &fetcher)
        }
        #[cfg(not(feature = "http"))]
        {
            acquire(source, &DisabledFetcher)
        }
    }
}

/// Runs a task with the default fetcher.
///
/// Shorthand for `Uncompress::new(options).run()`.
pub fn run(options: UncompressOptions) -> Result<TaskResult> {
    Uncompress::new(options).run()
}

/// Name prefix of staging files. The destination name is not embedded, so
/// any valid destination name leaves room for the random part.
const STAGING_PREFIX: &str = ".uncompress-";

/// Decompresses the acquired source into a staging file beside `task.dest`.
fn stage(task: &ResolvedTask, acquired: &AcquiredSource) -> Result<NamedTempFile> {
    let dest = &task.dest;
    let mut staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(".tmp")
        .make_in(parent_dir(dest), |path| {
            File::options().write(true).create_new(true).open(path)
        })
        .map_err(|e| Error::destination(dest, e))?;

    let input = BufReader::with_capacity(READ_BUFFER_SIZE, acquired.open()?);
    let written = {
        let mut output = BufWriter::with_capacity(READ_BUFFER_SIZE, staged.as_file_mut());
        codec::decompress(input, task.format, &mut output).map_err(|e| match e {
            StreamError::Decode(source) => Error::DecompressionError {
                path: acquired.path().to_path_buf(),
                format: task.format,
                source,
            },
            StreamError::Write(source) => Error::destination(dest, source),
        })?
    };
    staged
        .as_file()
        .sync_all()
        .map_err(|e| Error::destination(dest, e))?;

    log::debug!(
        "Staged {} decompressed bytes in '{}'",
        written,
        staged.path().display()
    );
    Ok(staged)
}

/// Atomically moves the staged file to `dest`.
fn commit(staged: NamedTempFile, dest: &Path, change: ContentChange) -> Result<()> {
    staged
        .persist(dest)
        .map_err(|e| Error::destination(dest, e.error))?;
    log::debug!(
        "{} '{}'",
        if change == ContentChange::Create {
            "Created"
        } else {
            "Replaced"
        },
        dest.display()
    );
    Ok(())
}

/// Reports a metadata failure on the staging file against `dest`.
fn staged_error(error: Error, dest: &Path) -> Error {
    match error {
        Error::MetadataError { source, .. } => Error::metadata(dest, source),
        other => other,
    }
}

/// Carries the permissions of a replaced destination over to its successor.
fn preserve_permissions(dest: &Path, staged: &Path) {
    let result =
        std::fs::metadata(dest).and_then(|meta| std::fs::set_permissions(staged, meta.permissions()));
    if let Err(e) = result {
        log::warn!(
            "Failed to carry permissions of '{}' over: {}",
            dest.display(),
            e
        );
    }
}
