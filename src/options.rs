//! Task configuration.
//!
//! [`UncompressOptions`] is built either in code with the builder methods or
//! deserialized from the JSON parameter object an automation runner passes.
//!
//! # Example
//!
//! ```rust
//! use uncompress::UncompressOptions;
//!
//! let options = UncompressOptions::new("https://example.com/tool.xz", "/usr/local/bin/")
//!     .copy(false)
//!     .mode("0755")
//!     .owner("root");
//! assert!(!options.copy);
//! ```

use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Options for a single decompression task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UncompressOptions {
    /// Local path or URL of the compressed source.
    pub src: String,
    /// Destination file path or directory.
    pub dest: String,
    /// If true, `src` is always a local path. If false, URLs are fetched.
    #[serde(default = "default_copy")]
    pub copy: bool,
    /// Octal or symbolic mode for the destination.
    #[serde(default, deserialize_with = "deserialize_mode")]
    pub mode: Option<String>,
    /// Owner name or uid.
    #[serde(default, deserialize_with = "deserialize_principal")]
    pub owner: Option<String>,
    /// Group name or gid.
    #[serde(default, deserialize_with = "deserialize_principal")]
    pub group: Option<String>,
    /// Timeout for remote fetches, in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,
}

fn default_copy() -> bool {
    true
}

impl UncompressOptions {
    /// Creates options for decompressing `src` into `dest`.
    pub fn new(src: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
            copy: default_copy(),
            mode: None,
            owner: None,
            group: None,
            timeout: None,
        }
    }

    /// Sets whether `src` is always treated as a local path.
    pub fn copy(mut self, copy: bool) -> Self {
        self.copy = copy;
        self
    }

    /// Sets the destination mode.
    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Sets the destination owner.
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Sets the destination group.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the fetch timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Returns the fetch timeout as a [`Duration`].
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(u32),
}

/// Accepts `"0644"` as well as the number `420`, which YAML-to-JSON
/// conversion produces from an unquoted `0644`.
fn deserialize_mode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|raw| match raw {
            StringOrNumber::Text(text) => text,
            StringOrNumber::Number(bits) => format!("{:o}", bits),
        }),
    )
}

fn deserialize_principal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|raw| match raw {
            StringOrNumber::Text(text) => text,
            StringOrNumber::Number(id) => id.to_string(),
        }),
    )
}
