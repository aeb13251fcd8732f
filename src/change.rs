//! Content change detection for idempotent re-runs.
//!
//! The decompressed output is always staged next to the destination first.
//! The staged file then decides whether the destination has to be replaced:
//! a missing destination or a size difference means a write, and equal sizes
//! fall back to a streamed byte comparison. Size alone never skips a write.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::{Error, READ_BUFFER_SIZE, Result};

/// What committing the staged output would do to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentChange {
    /// The destination does not exist yet.
    Create,
    /// The destination exists with different content.
    Replace,
    /// The destination already holds exactly the staged content.
    Unchanged,
}

impl ContentChange {
    /// Returns true if the staged output has to be moved into place.
    pub fn needs_write(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Compares the existing destination with staged output.
///
/// # Errors
///
/// Returns [`Error::DestinationWriteError`] if the destination exists but is
/// not a regular file or cannot be read.
pub fn detect_change(dest: &Path, staged: &Path) -> Result<ContentChange> {
    let dest_meta = match fs::metadata(dest) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ContentChange::Create),
        Err(e) => return Err(Error::destination(dest, e)),
    };

    if !dest_meta.is_file() {
        return Err(Error::destination(
            dest,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "destination exists and is not a regular file",
            ),
        ));
    }

    let staged_len = fs::metadata(staged)?.len();
    if dest_meta.len() != staged_len {
        log::debug!(
            "'{}' differs in size ({} vs {} bytes)",
            dest.display(),
            dest_meta.len(),
            staged_len
        );
        return Ok(ContentChange::Replace);
    }

    let identical = files_identical(dest, staged).map_err(|e| Error::destination(dest, e))?;
    Ok(if identical {
        ContentChange::Unchanged
    } else {
        ContentChange::Replace
    })
}

/// Convenience wrapper returning whether `staged` has to replace `dest`.
pub fn needs_write(dest: &Path, staged: &Path) -> Result<bool> {
    detect_change(dest, staged).map(ContentChange::needs_write)
}

/// Returns true if both files have identical contents.
pub fn files_identical(a: &Path, b: &Path) -> io::Result<bool> {
    let mut a = BufReader::with_capacity(READ_BUFFER_SIZE, File::open(a)?);
    let mut b = BufReader::with_capacity(READ_BUFFER_SIZE, File::open(b)?);
    let mut buf_a = vec![0u8; READ_BUFFER_SIZE];
    let mut buf_b = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let n_a = read_full(&mut a, &mut buf_a)?;
        let n_b = read_full(&mut b, &mut buf_b)?;
        if n_a != n_b || buf_a[..n_a] != buf_b[..n_b] {
            return Ok(false);
        }
        if n_a == 0 {
            return Ok(true);
        }
    }
}

/// Reads until `buf` is full or the reader is exhausted.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(dest: Option<&[u8]>, staged: &[u8]) -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let dest_path = dir.path().join("dest");
        let staged_path = dir.path().join("staged");
        if let Some(content) = dest {
            fs::write(&dest_path, content).unwrap();
        }
        fs::write(&staged_path, staged).unwrap();
        (dir, dest_path, staged_path)
    }

    #[test]
    fn test_missing_destination_is_create() {
        let (_dir, dest, staged) = setup(None, b"new");
        assert_eq!(detect_change(&dest, &staged).unwrap(), ContentChange::Create);
        assert!(needs_write(&dest, &staged).unwrap());
    }

    #[test]
    fn test_identical_is_unchanged() {
        let (_dir, dest, staged) = setup(Some(b"same content"), b"same content");
        assert_eq!(detect_change(&dest, &staged).unwrap(), ContentChange::Unchanged);
        assert!(!needs_write(&dest, &staged).unwrap());
    }

    #[test]
    fn test_size_difference_is_replace() {
        let (_dir, dest, staged) = setup(Some(b"short"), b"much longer");
        assert_eq!(detect_change(&dest, &staged).unwrap(), ContentChange::Replace);
    }

    #[test]
    fn test_same_size_different_content_is_replace() {
        let (_dir, dest, staged) = setup(Some(b"aaaa"), b"aaab");
        assert_eq!(detect_change(&dest, &staged).unwrap(), ContentChange::Replace);
    }

    #[test]
    fn test_empty_files_are_identical() {
        let (_dir, dest, staged) = setup(Some(b""), b"");
        assert_eq!(detect_change(&dest, &staged).unwrap(), ContentChange::Unchanged);
    }

    #[test]
    fn test_difference_beyond_first_chunk() {
        let mut a = vec![7u8; READ_BUFFER_SIZE * 2 + 17];
        let b = a.clone();
        let last = a.len() - 1;
        a[last] = 8;
        let (_dir, dest, staged) = setup(Some(&a), &b);
        assert_eq!(detect_change(&dest, &staged).unwrap(), ContentChange::Replace);

        let (_dir, dest, staged) = setup(Some(&b), &b);
        assert_eq!(detect_change(&dest, &staged).unwrap(), ContentChange::Unchanged);
    }

    #[test]
    fn test_directory_destination_is_error() {
        let (dir, _dest, staged) = setup(None, b"x");
        assert!(matches!(
            detect_change(dir.path(), &staged),
            Err(Error::DestinationWriteError { .. })
        ));
    }
}
