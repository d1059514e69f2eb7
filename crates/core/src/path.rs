//! Object-key and path handling
//!
//! Object keys are delimiter-separated, path-like strings. A key ending in
//! the delimiter denotes a directory; every other key denotes a file. That
//! convention is load-bearing across the whole facade, so all shape checks
//! and splits go through this module.
//!
//! The module also parses CLI addresses of the form `alias/bucket[/key]`;
//! anything else is treated as a local filesystem path.

use crate::error::{Error, Result};

/// Delimiter separating key segments
pub const DELIMITER: char = '/';

/// True when the key is directory-shaped (ends with the delimiter)
pub fn is_directory_key(key: &str) -> bool {
    key.ends_with(DELIMITER)
}

/// Parent directory of a key, with a trailing delimiter.
///
/// Edge cases:
/// - a directory-shaped key is its own parent (`"a/b/"` -> `"a/b/"`)
/// - a leading delimiter is ignored (`"/a/b.txt"` -> `"a/"`)
/// - a root-level file has the empty parent (`"b.txt"` -> `""`)
/// - interior empty segments are preserved (`"a//b.txt"` -> `"a//"`)
pub fn parent_directory(key: &str) -> String {
    if is_directory_key(key) {
        return key.to_string();
    }
    let key = key.strip_prefix(DELIMITER).unwrap_or(key);
    match key.rfind(DELIMITER) {
        Some(pos) => key[..=pos].to_string(),
        None => String::new(),
    }
}

/// Leaf name of a key: the last segment, or `""` for directory-shaped keys
pub fn leaf_name(key: &str) -> String {
    if is_directory_key(key) {
        return String::new();
    }
    match key.rfind(DELIMITER) {
        Some(pos) => key[pos + 1..].to_string(),
        None => key.to_string(),
    }
}

/// Split a key into (parent directory without trailing delimiter, leaf name).
///
/// This is the form upload calls expect: `"a/b/c.txt"` -> `("a/b", "c.txt")`,
/// `"c.txt"` -> `("", "c.txt")`. Directory-shaped keys yield an empty leaf.
pub fn split_key(key: &str) -> (String, String) {
    let parent = parent_directory(key);
    let parent = parent.trim_end_matches(DELIMITER).to_string();
    (parent, leaf_name(key))
}

/// A parsed address pointing into a configured store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePath {
    /// Store alias name
    pub alias: String,
    /// Bucket name
    pub bucket: String,
    /// Object key (empty for bucket root)
    pub key: String,
    /// Whether the address has directory semantics
    pub is_dir: bool,
}

impl StorePath {
    /// Create a new StorePath
    pub fn new(
        alias: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let is_dir = key.is_empty() || is_directory_key(&key);
        Self {
            alias: alias.into(),
            bucket: bucket.into(),
            key,
            is_dir,
        }
    }

    /// Render as `alias/bucket[/key]`
    pub fn to_full_path(&self) -> String {
        if self.key.is_empty() {
            format!("{}/{}", self.alias, self.bucket)
        } else {
            format!("{}/{}/{}", self.alias, self.bucket, self.key)
        }
    }
}

impl std::fmt::Display for StorePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_full_path())
    }
}

/// Parsed CLI address: either a local path or a store address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPath {
    /// Local filesystem path
    Local(std::path::PathBuf),
    /// Address inside a configured store
    Store(StorePath),
}

impl ParsedPath {
    /// Check if this is a store address
    pub fn is_store(&self) -> bool {
        matches!(self, ParsedPath::Store(_))
    }

    /// Get the store address if there is one
    pub fn as_store(&self) -> Option<&StorePath> {
        match self {
            ParsedPath::Store(p) => Some(p),
            ParsedPath::Local(_) => None,
        }
    }

    /// Get the local path if there is one
    pub fn as_local(&self) -> Option<&std::path::PathBuf> {
        match self {
            ParsedPath::Local(p) => Some(p),
            ParsedPath::Store(_) => None,
        }
    }
}

/// Parse a CLI path string into a ParsedPath
///
/// Store addresses have the format `alias/bucket[/key]`. Absolute paths,
/// explicit relative paths, and anything that does not fit the alias pattern
/// are local.
pub fn parse_path(path: &str) -> Result<ParsedPath> {
    if path.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    if path.starts_with('/') || path.starts_with("./") || path.starts_with("../") {
        return Ok(ParsedPath::Local(std::path::PathBuf::from(path)));
    }

    let parts: Vec<&str> = path.splitn(3, '/').collect();

    match parts.len() {
        1 => {
            if parts[0].contains('.') {
                Ok(ParsedPath::Local(std::path::PathBuf::from(path)))
            } else {
                Err(Error::InvalidPath(format!(
                    "Path '{path}' is incomplete. Use format: alias/bucket[/key]"
                )))
            }
        }
        2 => {
            let (alias, bucket) = (parts[0], parts[1]);
            if !is_valid_alias_name(alias) {
                return Ok(ParsedPath::Local(std::path::PathBuf::from(path)));
            }
            if bucket.is_empty() {
                return Err(Error::InvalidPath("Bucket name cannot be empty".into()));
            }
            Ok(ParsedPath::Store(StorePath::new(alias, bucket, "")))
        }
        3 => {
            let (alias, bucket, key) = (parts[0], parts[1], parts[2]);
            if !is_valid_alias_name(alias) {
                return Ok(ParsedPath::Local(std::path::PathBuf::from(path)));
            }
            if bucket.is_empty() {
                return Err(Error::InvalidPath("Bucket name cannot be empty".into()));
            }
            Ok(ParsedPath::Store(StorePath::new(alias, bucket, key)))
        }
        _ => unreachable!(),
    }
}

/// Check if a string is a valid alias name
fn is_valid_alias_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
