//! Protocol-facing data types
//!
//! The types the facade hands back to callers: bucket descriptors, object
//! records, listing chunks, and the request shapes for copy and put.

use std::collections::BTreeSet;

use bytes::Bytes;
use futures::StreamExt;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::store::{ByteStream, EntryMeta};

/// Descriptor of one bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketInfo {
    /// Bucket name, unique within the storage namespace
    pub name: String,

    /// Owner name, stamped by the facade (the backend tracks none)
    pub owner: String,

    /// Creation time; synthesized as "now" when the backend has none
    pub created: Timestamp,
}

/// Descriptor of one object within a bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Owning bucket
    pub bucket: String,

    /// Object key
    pub key: String,

    /// Content length in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Hex-encoded MD5 content digest, used as the ETag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Last modification time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
}

impl ObjectRecord {
    /// Build a record for `key` from the backend's native metadata
    pub fn from_entry(bucket: &str, key: &str, meta: &EntryMeta) -> Self {
        Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
            size: meta.length,
            etag: meta.md5_hex.clone(),
            last_modified: meta.last_modified,
        }
    }
}

/// Parameters of one listing call
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    /// Key prefix to list under; `None` means the bucket root
    pub prefix: Option<String>,

    /// Grouping delimiter (usually "/")
    pub delimiter: Option<String>,

    /// Upper bound on returned keys. Accepted for interface compatibility;
    /// the backend call is not paginated, so the full listing comes back in
    /// one chunk regardless.
    pub max_keys: Option<u64>,

    /// Continuation marker from a previous chunk. Same status as `max_keys`.
    pub marker: Option<String>,
}

impl ListRequest {
    /// Listing request for everything under `prefix`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Default::default()
        }
    }
}

/// Result of one listing call
///
/// `objects` and `common_prefixes` partition the entries under the queried
/// prefix: an entry is either a leaf object or folds into exactly one common
/// prefix, never both. An empty listing is an empty chunk, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingChunk {
    /// The effective prefix the listing ran under
    pub prefix: String,

    /// The delimiter the caller asked for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,

    /// Leaf objects, in backend listing order
    pub objects: Vec<ObjectRecord>,

    /// Synthesized folder entries, each suffixed with the delimiter,
    /// de-duplicated
    pub common_prefixes: BTreeSet<String>,

    /// Marker for the next chunk; always absent in the single-chunk contract
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,
}

/// Source and destination of a copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRequest {
    /// Source bucket
    pub src_bucket: String,
    /// Source key
    pub src_key: String,
    /// Destination bucket
    pub dst_bucket: String,
    /// Destination key
    pub dst_key: String,
}

impl CopyRequest {
    /// Create a copy request
    pub fn new(
        src_bucket: impl Into<String>,
        src_key: impl Into<String>,
        dst_bucket: impl Into<String>,
        dst_key: impl Into<String>,
    ) -> Self {
        Self {
            src_bucket: src_bucket.into(),
            src_key: src_key.into(),
            dst_bucket: dst_bucket.into(),
            dst_key: dst_key.into(),
        }
    }
}

/// An object to be written: key, optional content stream, declared length
pub struct PutRequest {
    /// Destination key within the bucket
    pub key: String,

    /// Content stream; `None` writes nothing (metadata-only put)
    pub body: Option<ByteStream>,

    /// Declared content length in bytes
    pub length: u64,
}

impl PutRequest {
    /// Put request with a streamed body
    pub fn new(key: impl Into<String>, body: ByteStream, length: u64) -> Self {
        Self {
            key: key.into(),
            body: Some(body),
            length,
        }
    }

    /// Put request from an in-memory buffer
    pub fn from_bytes(key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let length = data.len() as u64;
        Self {
            key: key.into(),
            body: Some(futures::stream::iter(vec![Ok(data)]).boxed()),
            length,
        }
    }
}

impl std::fmt::Debug for PutRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PutRequest")
            .field("key", &self.key)
            .field("has_body", &self.body.is_some())
            .field("length", &self.length)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_record_from_entry() {
        let mut meta = EntryMeta::file("a/b.txt", 42);
        meta.md5_hex = Some("5d41402abc4b2a76b9719d911017c592".into());

        let record = ObjectRecord::from_entry("data", "a/b.txt", &meta);
        assert_eq!(record.bucket, "data");
        assert_eq!(record.key, "a/b.txt");
        assert_eq!(record.size, Some(42));
        assert_eq!(
            record.etag.as_deref(),
            Some("5d41402abc4b2a76b9719d911017c592")
        );
    }

    #[test]
    fn test_put_request_from_bytes() {
        let request = PutRequest::from_bytes("a/b.txt", "hello".as_bytes().to_vec());
        assert_eq!(request.key, "a/b.txt");
        assert_eq!(request.length, 5);
        assert!(request.body.is_some());
    }

    #[test]
    fn test_list_request_with_prefix() {
        let request = ListRequest::with_prefix("a/");
        assert_eq!(request.prefix.as_deref(), Some("a/"));
        assert!(request.marker.is_none());
    }
}
