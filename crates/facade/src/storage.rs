//! Object-storage facade
//!
//! The public surface of the adapter: bucket lifecycle, object get/put/
//! delete/copy, and prefix listings, all expressed over any backend that
//! implements `TreeStore`. The facade holds no durable state of its own;
//! every result is recomputed per call from the backend.

use std::collections::BTreeMap;

use futures::StreamExt;
use jiff::Timestamp;

use bk_core::path::{is_directory_key, split_key};
use bk_core::{
    BucketInfo, ByteStream, CopyRequest, Error, ListRequest, ListingChunk, ObjectRecord,
    PutRequest, Result, TreeStore,
};

use crate::{copy, listing, meta};

/// An object returned by `get_object`: descriptor, translated metadata
/// headers, and the content stream when one could be opened.
pub struct Object {
    /// Object descriptor
    pub record: ObjectRecord,

    /// Translated protocol metadata headers
    pub headers: BTreeMap<String, String>,

    /// Content stream; `None` for directory-shaped keys and when the
    /// stream could not be opened (the metadata is still returned)
    pub body: Option<ByteStream>,
}

impl Object {
    /// Drain the body into memory; an absent body yields an empty buffer
    pub async fn into_bytes(self) -> std::io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        if let Some(mut body) = self.body {
            while let Some(chunk) = body.next().await {
                buffer.extend_from_slice(&chunk?);
            }
        }
        Ok(buffer)
    }
}

impl std::fmt::Debug for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Object")
            .field("record", &self.record)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Object-storage facade over a hierarchical backend
///
/// The backend handle is injected at construction and connected exactly
/// once; construction fails with `ConnectionFailed` if the connect call
/// does. The facade is safe for concurrent use to the extent the backend
/// is: no locks, no shared mutable cache, one backend round trip per
/// operation.
#[derive(Debug)]
pub struct ObjectStorage<S> {
    store: S,
    owner: String,
}

impl<S: TreeStore> ObjectStorage<S> {
    /// Connect the backend and build the facade with the default owner
    pub async fn connect(store: S) -> Result<Self> {
        Self::connect_as(store, "local").await
    }

    /// Connect the backend and build the facade with an explicit owner
    /// name, stamped on bucket descriptors
    pub async fn connect_as(store: S, owner: impl Into<String>) -> Result<Self> {
        store
            .connect(None)
            .await
            .map_err(|e| Error::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            store,
            owner: owner.into(),
        })
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Fetch an object with its translated metadata and content stream.
    ///
    /// Existence is checked by key shape: directory-shaped keys against
    /// directory existence, everything else against file existence; the
    /// two are never interchangeable. A failure to open the read stream is
    /// tolerated; the object still comes back with metadata and no body.
    pub async fn get_object(&self, bucket: &str, key: &str) -> Result<Object> {
        let present = if is_directory_key(key) {
            self.store.directory_exists(bucket, key).await?
        } else {
            self.store.file_exists(bucket, key).await?
        };
        if !present {
            return Err(Error::NotFound(format!("{bucket}/{key}")));
        }

        let entry = self.store.metadata(bucket, key).await?;

        let body = match self.store.open_read(bucket, key).await {
            Ok(stream) => Some(stream),
            Err(error) => {
                tracing::warn!(bucket, key, %error, "read stream unavailable; returning metadata only");
                None
            }
        };

        Ok(Object {
            record: ObjectRecord::from_entry(bucket, key, &entry),
            headers: meta::protocol_headers(&entry),
            body,
        })
    }

    /// Fetch an object's descriptor without content.
    ///
    /// Fails `NotFound` when the backend metadata is not describable (its
    /// not-found signal for this path).
    pub async fn get_object_metadata(&self, bucket: &str, key: &str) -> Result<ObjectRecord> {
        let entry = self.store.metadata(bucket, key).await?;
        if !meta::is_describable(&entry) {
            return Err(Error::NotFound(format!("{bucket}/{key}")));
        }
        Ok(ObjectRecord::from_entry(bucket, key, &entry))
    }

    /// Write an object.
    ///
    /// The key splits into parent path and leaf name for the backend; a
    /// directory-shaped key has no leaf to write. Upload failures propagate
    /// as typed errors. The returned descriptor carries the declared length
    /// and a fresh last-modified stamp; the authoritative digest comes from
    /// `get_object_metadata`.
    pub async fn put_object(&self, bucket: &str, request: PutRequest) -> Result<ObjectRecord> {
        let (parent, name) = split_key(&request.key);
        if name.is_empty() {
            return Err(Error::InvalidPath(format!(
                "cannot put to a directory-shaped key: {}",
                request.key
            )));
        }

        let length = request.length;
        if let Some(body) = request.body {
            self.store
                .upload_stream(body, bucket, &parent, &name, length)
                .await?;
        }

        Ok(ObjectRecord {
            bucket: bucket.to_string(),
            key: request.key,
            size: Some(length),
            etag: None,
            last_modified: Some(Timestamp::now()),
        })
    }

    /// Delete an object (recursively, for directory-shaped keys)
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.store
            .delete(bucket, key, true)
            .await
            .map_err(|e| Error::DeleteFailed(format!("{bucket}/{key}: {e}")))
    }

    /// Create a bucket
    pub async fn create_bucket(&self, bucket: &str) -> Result<BucketInfo> {
        self.store.create_container(bucket).await?;
        Ok(BucketInfo {
            name: bucket.to_string(),
            owner: self.owner.clone(),
            created: Timestamp::now(),
        })
    }

    /// Delete a bucket and everything in it
    pub async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.store
            .delete_container(bucket)
            .await
            .map_err(|e| Error::DeleteFailed(format!("{bucket}: {e}")))
    }

    /// Enumerate buckets. Creation time is best-effort: synthesized as
    /// "now" when the backend tracks none.
    pub async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        let containers = self.store.list_containers().await?;
        Ok(containers
            .into_iter()
            .map(|c| BucketInfo {
                name: c.name,
                owner: self.owner.clone(),
                created: c.created.unwrap_or_else(Timestamp::now),
            })
            .collect())
    }

    /// Look up a single bucket by name.
    ///
    /// A linear scan over the container listing; bucket counts stay small.
    pub async fn get_bucket(&self, bucket: &str) -> Result<BucketInfo> {
        self.list_buckets()
            .await?
            .into_iter()
            .find(|b| b.name == bucket)
            .ok_or_else(|| Error::NotFound(bucket.to_string()))
    }

    /// Copy an object; see the crate docs for the fallback rules
    pub async fn copy_object(&self, request: &CopyRequest) -> Result<ObjectRecord> {
        copy::copy_object(self, request).await
    }

    /// List objects and common prefixes under a prefix.
    ///
    /// Always a single chunk: the backend call is not paginated, so
    /// `max_keys` and `marker` are accepted for interface compatibility and
    /// the chunk never carries a continuation marker.
    pub async fn list_objects(&self, bucket: &str, request: &ListRequest) -> Result<ListingChunk> {
        listing::list_chunk(&self.store, bucket, request).await
    }
}
