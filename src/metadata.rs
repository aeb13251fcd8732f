//! File mode and ownership for the decompressed file.
//!
//! Modes are accepted in octal (`"0644"`, `"755"`) or in the symbolic
//! notation understood by `chmod` (`"u=rw,g=r,o="`, `"a+x"`, `"g-w"`).
//! Symbolic modes are relative to the file's current permissions, so they are
//! resolved at apply time.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::ownership::UnixOwnership;
use crate::{Error, Result};

/// Permission bits a mode may touch.
const PERMISSION_MASK: u32 = 0o7777;

/// A requested file mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMode {
    /// An absolute mode such as `0o644`.
    Octal(u32),
    /// One or more comma separated symbolic clauses.
    Symbolic(Vec<ModeClause>),
}

/// A symbolic clause such as `ug+rw` or `o=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeClause {
    who: Vec<Class>,
    actions: Vec<(Op, Vec<Perm>)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    User,
    Group,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Remove,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Perm {
    Read,
    Write,
    Execute,
    /// `X`: execute only for directories or files already executable by someone.
    ConditionalExecute,
    SetId,
    Sticky,
    /// `u`, `g` or `o` on the right hand side copies that class's bits.
    Copy(Class),
}

impl Class {
    const ALL: [Class; 3] = [Class::User, Class::Group, Class::Other];

    fn shift(self) -> u32 {
        match self {
            Self::User => 6,
            Self::Group => 3,
            Self::Other => 0,
        }
    }

    fn rwx(self) -> u32 {
        0o7 << self.shift()
    }

    fn special(self) -> u32 {
        match self {
            Self::User => 0o4000,
            Self::Group => 0o2000,
            Self::Other => 0o1000,
        }
    }
}

impl Perm {
    fn bits(self, class: Class, current: u32, is_dir: bool) -> u32 {
        let shift = class.shift();
        match self {
            Self::Read => 0o4 << shift,
            Self::Write => 0o2 << shift,
            Self::Execute => 0o1 << shift,
            Self::ConditionalExecute if is_dir || current & 0o111 != 0 => 0o1 << shift,
            Self::ConditionalExecute => 0,
            Self::SetId if class != Class::Other => class.special(),
            Self::Sticky if class == Class::Other => class.special(),
            Self::SetId | Self::Sticky => 0,
            Self::Copy(from) => ((current >> from.shift()) & 0o7) << shift,
        }
    }
}

impl FileMode {
    /// Parses a mode string.
    ///
    /// Strings starting with a digit are octal (an optional `0o` prefix is
    /// accepted); everything else is symbolic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMode`] for malformed or out-of-range modes.
    pub fn parse(mode: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidMode {
            mode: mode.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = mode.trim();
        if trimmed.is_empty() {
            return Err(invalid("mode is empty"));
        }

        if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
            let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);
            if digits.is_empty() || !digits.chars().all(|c| ('0'..='7').contains(&c)) {
                return Err(invalid("not an octal number"));
            }
            let value = u32::from_str_radix(digits, 8).map_err(|_| invalid("octal value too large"))?;
            if value > PERMISSION_MASK {
                return Err(invalid("octal value exceeds 07777"));
            }
            return Ok(Self::Octal(value));
        }

        trimmed
            .split(',')
            .map(|clause| parse_clause(clause).map_err(|reason| invalid(&reason)))
            .collect::<Result<Vec<_>>>()
            .map(Self::Symbolic)
    }

    /// Computes the permission bits this mode yields for a file whose
    /// current bits are `current`.
    pub fn resolve(&self, current: u32, is_dir: bool) -> u32 {
        let mut mode = current & PERMISSION_MASK;
        let clauses = match self {
            Self::Octal(bits) => return *bits,
            Self::Symbolic(clauses) => clauses,
        };

        for clause in clauses {
            for (op, perms) in &clause.actions {
                let base = mode;
                for &class in &clause.who {
                    let bits = perms
                        .iter()
                        .fold(0, |acc, perm| acc | perm.bits(class, base, is_dir));
                    match op {
                        Op::Add => mode |= bits,
                        Op::Remove => mode &= !bits,
                        Op::Set => mode = (mode & !(class.rwx() | class.special())) | bits,
                    }
                }
            }
        }
        mode
    }
}

fn parse_clause(clause: &str) -> std::result::Result<ModeClause, String> {
    let mut chars = clause.chars().peekable();
    let mut who = Vec::new();

    while let Some(&c) = chars.peek() {
        let classes: &[Class] = match c {
            'u' => &[Class::User],
            'g' => &[Class::Group],
            'o' => &[Class::Other],
            'a' => &Class::ALL,
            _ => break,
        };
        for class in classes {
            if !who.contains(class) {
                who.push(*class);
            }
        }
        chars.next();
    }
    if who.is_empty() {
        who.extend(Class::ALL);
    }

    let mut actions: Vec<(Op, Vec<Perm>)> = Vec::new();
    for c in chars {
        let op = match c {
            '+' => Some(Op::Add),
            '-' => Some(Op::Remove),
            '=' => Some(Op::Set),
            _ => None,
        };
        if let Some(op) = op {
            actions.push((op, Vec::new()));
            continue;
        }

        let perm = match c {
            'r' => Perm::Read,
            'w' => Perm::Write,
            'x' => Perm::Execute,
            'X' => Perm::ConditionalExecute,
            's' => Perm::SetId,
            't' => Perm::Sticky,
            'u' => Perm::Copy(Class::User),
            'g' => Perm::Copy(Class::Group),
            'o' => Perm::Copy(Class::Other),
            other => return Err(format!("unexpected character '{}' in '{}'", other, clause)),
        };
        match actions.last_mut() {
            Some((_, perms)) => perms.push(perm),
            None => return Err(format!("missing operator in '{}'", clause)),
        }
    }

    if actions.is_empty() {
        return Err(format!("missing operator in '{}'", clause));
    }
    Ok(ModeClause { who, actions })
}

impl FromStr for FileMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Octal(bits) => write!(f, "{:04o}", bits),
            Self::Symbolic(clauses) => write!(f, "<symbolic: {} clause(s)>", clauses.len()),
        }
    }
}

/// Mode and ownership requested for the destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAttributes {
    /// Requested mode, if any.
    pub mode: Option<FileMode>,
    /// Requested owner and group.
    pub ownership: UnixOwnership,
}

impl FileAttributes {
    /// Parses the `mode`, `owner` and `group` options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMode`] or [`Error::UnknownOwner`].
    pub fn from_options(mode: Option<&str>, owner: Option<&str>, group: Option<&str>) -> Result<Self> {
        Ok(Self {
            mode: mode.map(FileMode::parse).transpose()?,
            ownership: UnixOwnership::resolve(owner, group)?,
        })
    }

    /// Returns true if nothing is requested.
    pub fn is_empty(&self) -> bool {
        self.mode.is_none() && !self.ownership.is_present()
    }

    /// Applies the requested attributes to `path`.
    ///
    /// Ownership is applied first since `chown` may clear set-id bits.
    /// Returns true if anything on disk changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetadataError`] if a change is refused.
    pub fn apply(&self, path: &Path) -> Result<bool> {
        let mut changed = self.ownership.apply_if_different(path)?;
        if let Some(mode) = &self.mode {
            changed |= apply_mode(path, mode)?;
        }
        Ok(changed)
    }
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: &FileMode) -> Result<bool> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path).map_err(|e| Error::metadata(path, e))?;
    let current = metadata.permissions().mode() & PERMISSION_MASK;
    let wanted = mode.resolve(current, metadata.is_dir());
    if wanted == current {
        return Ok(false);
    }

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(wanted))
        .map_err(|e| Error::metadata(path, e))?;
    log::debug!(
        "Changed mode of '{}' from {:04o} to {:04o}",
        path.display(),
        current,
        wanted
    );
    Ok(true)
}

#[cfg(not(unix))]
fn apply_mode(path: &Path, _mode: &FileMode) -> Result<bool> {
    log::warn!(
        "Ignoring mode for '{}': not supported on this platform",
        path.display()
    );
    Ok(false)
}
