//! Listing orchestration
//!
//! Drives one listing call against the backend and partitions the flat
//! result into leaf objects and the synthesized one-level folder illusion.

use std::collections::BTreeSet;

use bk_core::{
    DELIMITER, EntryMeta, ListRequest, ListingChunk, ObjectRecord, Result, TreeStore,
};

/// Partition a flat backend listing into objects and common prefixes.
///
/// File entries become object records in listing order; directory entries
/// become common prefixes, each suffixed with the delimiter and
/// de-duplicated. Every entry lands on exactly one side.
pub fn partition_entries(
    bucket: &str,
    entries: &[EntryMeta],
) -> (Vec<ObjectRecord>, BTreeSet<String>) {
    let mut objects = Vec::new();
    let mut prefixes = BTreeSet::new();

    for entry in entries {
        if entry.is_file {
            objects.push(ObjectRecord::from_entry(bucket, &entry.path, entry));
        } else {
            prefixes.insert(format!("{}{}", entry.path, DELIMITER));
        }
    }

    (objects, prefixes)
}

/// Run one listing call and assemble the chunk.
///
/// A missing prefix defaults to the bucket root. The backend listing is
/// non-recursive, so the chunk shows immediate children only. The backend
/// call is not paginated; the full result comes back as a single chunk with
/// no continuation marker, and backend failures propagate as errors rather
/// than an empty or absent chunk.
pub(crate) async fn list_chunk<S: TreeStore>(
    store: &S,
    bucket: &str,
    request: &ListRequest,
) -> Result<ListingChunk> {
    let prefix = request.prefix.clone().unwrap_or_default();
    let entries = store.list_entries(bucket, &prefix, false).await?;
    let (objects, common_prefixes) = partition_entries(bucket, &entries);

    Ok(ListingChunk {
        prefix,
        delimiter: request.delimiter.clone(),
        objects,
        common_prefixes,
        next_marker: None,
    })
}
