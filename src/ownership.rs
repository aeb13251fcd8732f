//! Unix file ownership support.
//!
//! Owners and groups are given either as names or as numeric ids. Names are
//! resolved against the system user and group databases up front, so an
//! unknown name fails the task before any file is written.
//!
//! # Example
//!
//! ```rust,no_run
//! use uncompress::ownership::UnixOwnership;
//!
//! let ownership = UnixOwnership::resolve(Some("root"), Some("0")).unwrap();
//! assert_eq!(ownership.gid, Some(0));
//! ```

use std::path::Path;

use crate::error::PrincipalKind;
use crate::{Error, Result};

/// Unix file ownership information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnixOwnership {
    /// User ID (UID).
    pub uid: Option<u32>,
    /// Group ID (GID).
    pub gid: Option<u32>,
    /// User name as requested, if it was given by name.
    pub user_name: Option<String>,
    /// Group name as requested, if it was given by name.
    pub group_name: Option<String>,
}

impl UnixOwnership {
    /// Creates a new empty ownership record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves requested `owner` and `group` values.
    ///
    /// Each value is either a numeric id or a name. Numeric ids are taken
    /// as-is; names are looked up in the system databases.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOwner`] if a name does not resolve.
    pub fn resolve(owner: Option<&str>, group: Option<&str>) -> Result<Self> {
        let mut ownership = Self::new();

        if let Some(owner) = owner {
            match owner.parse::<u32>() {
                Ok(uid) => ownership.uid = Some(uid),
                Err(_) => {
                    ownership.uid = lookup(PrincipalKind::User, owner)?;
                    ownership.user_name = Some(owner.to_string());
                }
            }
        }

        if let Some(group) = group {
            match group.parse::<u32>() {
                Ok(gid) => ownership.gid = Some(gid),
                Err(_) => {
                    ownership.gid = lookup(PrincipalKind::Group, group)?;
                    ownership.group_name = Some(group.to_string());
                }
            }
        }

        Ok(ownership)
    }

    /// Returns true if any ownership information is present.
    pub fn is_present(&self) -> bool {
        self.uid.is_some()
            || self.gid.is_some()
            || self.user_name.is_some()
            || self.group_name.is_some()
    }

    /// Describes the requested owner and group, preferring the given names.
    fn describe(&self) -> String {
        fn part(name: &Option<String>, id: Option<u32>) -> String {
            match (name, id) {
                (Some(name), _) => name.clone(),
                (None, Some(id)) => id.to_string(),
                (None, None) => "-".to_string(),
            }
        }
        format!(
            "{}:{}",
            part(&self.user_name, self.uid),
            part(&self.group_name, self.gid)
        )
    }

    /// Changes the owner and group of `path` where they differ.
    ///
    /// Returns true if `chown` was called. Ids that already match are left
    /// alone, so a run without effective changes needs no privileges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetadataError`] if the file cannot be inspected or
    /// the ownership change is refused.
    #[cfg(unix)]
    pub fn apply_if_different(&self, path: &Path) -> Result<bool> {
        use std::os::unix::fs::{MetadataExt, chown};

        if self.uid.is_none() && self.gid.is_none() {
            return Ok(false);
        }

        let metadata = std::fs::metadata(path).map_err(|e| Error::metadata(path, e))?;
        let uid = self.uid.filter(|&uid| uid != metadata.uid());
        let gid = self.gid.filter(|&gid| gid != metadata.gid());
        if uid.is_none() && gid.is_none() {
            return Ok(false);
        }

        chown(path, uid, gid).map_err(|e| Error::metadata(path, e))?;
        log::debug!(
            "Changed ownership of '{}' to {}",
            path.display(),
            self.describe()
        );
        Ok(true)
    }

    /// Changes the owner and group of `path` where they differ.
    ///
    /// Ownership is a Unix concept; elsewhere the request is ignored.
    #[cfg(not(unix))]
    pub fn apply_if_different(&self, path: &Path) -> Result<bool> {
        if self.is_present() {
            log::warn!(
                "Ignoring owner/group {} for '{}': not supported on this platform",
                self.describe(),
                path.display()
            );
        }
        Ok(false)
    }
}

#[cfg(unix)]
fn lookup(kind: PrincipalKind, name: &str) -> Result<Option<u32>> {
    use nix::unistd::{Group, User};

    let id = match kind {
        PrincipalKind::User => User::from_name(name)
            .map_err(|e| Error::Io(e.into()))?
            .map(|user| user.uid.as_raw()),
        PrincipalKind::Group => Group::from_name(name)
            .map_err(|e| Error::Io(e.into()))?
            .map(|group| group.gid.as_raw()),
    };

    match id {
        Some(id) => Ok(Some(id)),
        None => Err(Error::UnknownOwner {
            kind,
            name: name.to_string(),
        }),
    }
}

#[cfg(not(unix))]
fn lookup(_kind: PrincipalKind, _name: &str) -> Result<Option<u32>> {
    Ok(None)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_numeric_ids() {
        let ownership = UnixOwnership::resolve(Some("1000"), Some("100")).unwrap();
        assert_eq!(ownership.uid, Some(1000));
        assert_eq!(ownership.gid, Some(100));
        assert!(ownership.user_name.is_none());
        assert!(ownership.is_present());
    }

    #[test]
    fn test_nothing_requested() {
        let ownership = UnixOwnership::resolve(None, None).unwrap();
        assert!(!ownership.is_present());
    }

    #[test]
    fn test_root_resolves_by_name() {
        let ownership = UnixOwnership::resolve(Some("root"), None).unwrap();
        assert_eq!(ownership.uid, Some(0));
        assert_eq!(ownership.user_name.as_deref(), Some("root"));
    }

    #[test]
    fn test_describe_prefers_names() {
        let ownership = UnixOwnership::resolve(Some("root"), Some("0")).unwrap();
        assert_eq!(ownership.describe(), "root:0");
        assert_eq!(UnixOwnership::resolve(None, Some("7")).unwrap().describe(), "-:7");
    }

    #[test]
    fn test_unknown_user() {
        match UnixOwnership::resolve(Some("no-such-user-4f1c"), None) {
            Err(Error::UnknownOwner { kind, name }) => {
                assert_eq!(kind, PrincipalKind::User);
                assert_eq!(name, "no-such-user-4f1c");
            }
            other => panic!("expected UnknownOwner, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_group() {
        assert!(matches!(
            UnixOwnership::resolve(None, Some("no-such-group-4f1c")),
            Err(Error::UnknownOwner {
                kind: PrincipalKind::Group,
                ..
            })
        ));
    }

    #[test]
    fn test_apply_current_ids_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file");
        std::fs::write(&path, b"x").unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        let current = UnixOwnership {
            uid: Some(std::os::unix::fs::MetadataExt::uid(&metadata)),
            gid: Some(std::os::unix::fs::MetadataExt::gid(&metadata)),
            ..UnixOwnership::new()
        };
        assert!(!current.apply_if_different(&path).unwrap());
        assert!(!UnixOwnership::new().apply_if_different(&path).unwrap());
    }

    #[test]
    fn test_apply_missing_file() {
        let dir = TempDir::new().unwrap();
        let ownership = UnixOwnership::resolve(Some("0"), Some("0")).unwrap();
        assert!(matches!(
            ownership.apply_if_different(&dir.path().join("missing")),
            Err(Error::MetadataError { .. })
        ));
    }
}
