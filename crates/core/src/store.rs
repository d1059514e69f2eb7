//! TreeStore trait definition
//!
//! This trait is the contract the facade requires from a hierarchical
//! storage backend: a tree of directories and files reachable through
//! existence checks, metadata lookup, streamed read/write, non-recursive
//! listing, copy, delete, and container lifecycle. Any backend implementing
//! it can sit under the object-storage facade.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use jiff::Timestamp;

use crate::error::Result;

/// Stream of content bytes flowing to or from a backend
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Credentials for backends that require them on connect
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account or access-key identifier
    pub access_key: String,
    /// Secret
    pub secret_key: String,
}

/// Native metadata of one backend entry
///
/// A lookup on a missing entry does not fail: it yields a meta with neither
/// `length` nor `md5_hex`, which is the backend's not-found signal (see
/// `bk_facade::meta::is_describable`).
#[derive(Debug, Clone, Default)]
pub struct EntryMeta {
    /// Entry path relative to the bucket root, no trailing delimiter
    pub path: String,

    /// Whether the entry is a file (directories carry no content)
    pub is_file: bool,

    /// Content length in bytes, if known
    pub length: Option<u64>,

    /// Hex-encoded MD5 digest of the content, if known
    pub md5_hex: Option<String>,

    /// Last modification time, if tracked by the backend
    pub last_modified: Option<Timestamp>,
}

impl EntryMeta {
    /// Meta for a file entry
    pub fn file(path: impl Into<String>, length: u64) -> Self {
        Self {
            path: path.into(),
            is_file: true,
            length: Some(length),
            md5_hex: None,
            last_modified: None,
        }
    }

    /// Meta for a directory entry
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_file: false,
            length: None,
            md5_hex: None,
            last_modified: None,
        }
    }
}

/// Descriptor of one backend container (bucket)
#[derive(Debug, Clone)]
pub struct ContainerMeta {
    /// Container name
    pub name: String,
    /// Creation time, if the backend tracks one
    pub created: Option<Timestamp>,
}

/// Trait for hierarchical storage backends
///
/// Implementations must be safe for concurrent use; the facade adds no
/// locking of its own. Every method is one round trip to the backend.
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Establish the connection. Called exactly once, by the facade
    /// constructor; a failure there is fatal to facade construction.
    async fn connect(&self, credentials: Option<&Credentials>) -> Result<()>;

    /// Check that `key` exists as a file
    async fn file_exists(&self, bucket: &str, key: &str) -> Result<bool>;

    /// Check that `key` exists as a directory
    async fn directory_exists(&self, bucket: &str, key: &str) -> Result<bool>;

    /// Native metadata for `key`. Missing entries yield an empty meta,
    /// never an error.
    async fn metadata(&self, bucket: &str, key: &str) -> Result<EntryMeta>;

    /// Open a read stream over a file entry's content
    async fn open_read(&self, bucket: &str, key: &str) -> Result<ByteStream>;

    /// Write `data` as `parent/name` inside `bucket`. `length` is the
    /// declared content length; backends may ignore it.
    async fn upload_stream(
        &self,
        data: ByteStream,
        bucket: &str,
        parent: &str,
        name: &str,
        length: u64,
    ) -> Result<()>;

    /// Upload a local file into `parent` inside `bucket`, keeping its name
    async fn upload_file(&self, local: &Path, bucket: &str, parent: &str) -> Result<()>;

    /// Download the file at `key` into `local_dir`, returning the local path
    async fn download_to_dir(&self, bucket: &str, key: &str, local_dir: &Path) -> Result<PathBuf>;

    /// List the entries under `prefix`. Non-recursive listing stops at one
    /// level: immediate children only.
    async fn list_entries(&self, bucket: &str, prefix: &str, recursive: bool)
    -> Result<Vec<EntryMeta>>;

    /// Backend-native copy of a single file entry
    async fn copy_entry(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> Result<()>;

    /// Delete the entry at `key`; `recursive` applies to directories
    async fn delete(&self, bucket: &str, key: &str, recursive: bool) -> Result<()>;

    /// Create a container
    async fn create_container(&self, bucket: &str) -> Result<()>;

    /// Delete a container and everything in it
    async fn delete_container(&self, bucket: &str) -> Result<()>;

    /// Enumerate containers
    async fn list_containers(&self) -> Result<Vec<ContainerMeta>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_meta_file() {
        let meta = EntryMeta::file("a/b.txt", 1024);
        assert!(meta.is_file);
        assert_eq!(meta.length, Some(1024));
        assert!(meta.md5_hex.is_none());
    }

    #[test]
    fn test_entry_meta_directory() {
        let meta = EntryMeta::directory("a/b");
        assert!(!meta.is_file);
        assert!(meta.length.is_none());
    }

    #[test]
    fn test_entry_meta_default_is_undescribed() {
        let meta = EntryMeta::default();
        assert!(meta.length.is_none());
        assert!(meta.md5_hex.is_none());
    }
}
