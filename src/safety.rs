//! Validation of derived file names and destination paths.
//!
//! A file name derived from a source must be a single normal path component,
//! so that joining it onto the destination directory can never escape it.
//! The destination itself must live in an existing directory and must not be
//! anything other than a regular file if it already exists.

use std::fs;
use std::io;
use std::path::Path;

use crate::source::parent_dir;
use crate::{Error, Result};

/// Validates a file name derived from a source name.
///
/// # Errors
///
/// Returns [`Error::InvalidSourceName`] if the name:
/// - Is empty
/// - Is `.` or `..`
/// - Contains a path separator (`/` or `\`)
/// - Contains a NUL byte
pub fn validate_file_name(name: &str, source_name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        return Err(Error::InvalidSourceName {
            name: source_name.to_string(),
        });
    }
    Ok(())
}

/// Checks that `dest` can receive a decompressed file.
///
/// The parent directory must exist, and `dest` must either not exist or be a
/// regular file (symlinks are followed).
///
/// # Errors
///
/// Returns [`Error::DestinationWriteError`] describing the conflict.
pub fn validate_destination(dest: &Path) -> Result<()> {
    let parent = parent_dir(dest);
    match fs::metadata(parent) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(Error::destination(
                dest,
                io::Error::new(
                    io::ErrorKind::NotADirectory,
                    format!("'{}' is not a directory", parent.display()),
                ),
            ));
        }
        Err(e) => {
            return Err(Error::destination(
                dest,
                io::Error::new(
                    e.kind(),
                    format!("parent directory '{}': {}", parent.display(), e),
                ),
            ));
        }
    }

    match fs::metadata(dest) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(meta) if meta.is_dir() => Err(Error::destination(
            dest,
            io::Error::new(io::ErrorKind::IsADirectory, "destination is a directory"),
        )),
        Ok(_) => Err(Error::destination(
            dest,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "destination exists and is not a regular file",
            ),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::destination(dest, e)),
    }
}
