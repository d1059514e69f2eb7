//! Integration tests for the object-storage facade
//!
//! These run the facade against the real filesystem backend in a scratch
//! root, covering the behaviors the adapter promises: the one-level folder
//! illusion, metadata round-trips, non-destructive copy, scratch-space
//! cleanup, and typed failures.

use bk_core::{CopyRequest, Error, ListRequest, PutRequest};
use bk_facade::ObjectStorage;
use bk_fs::FsStore;
use tempfile::TempDir;

async fn storage() -> (ObjectStorage<FsStore>, TempDir) {
    let root = TempDir::new().unwrap();
    let storage = ObjectStorage::connect(FsStore::new(root.path()))
        .await
        .unwrap();
    (storage, root)
}

fn seed_file(root: &TempDir, rel: &str, content: &str) {
    let path = root.path().join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn md5_hex(content: &str) -> String {
    format!("{:x}", md5::compute(content.as_bytes()))
}

/// Names of copy scratch directories currently present in the system temp
/// directory.
fn scratch_dirs() -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(std::env::temp_dir())
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .filter(|name| name.starts_with("bk-copy-"))
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[tokio::test]
async fn test_connect_failure_is_fatal() {
    let result = ObjectStorage::connect(FsStore::new("/no/such/root")).await;
    assert!(matches!(result.unwrap_err(), Error::ConnectionFailed(_)));
}

#[tokio::test]
async fn test_get_missing_object_is_not_found() {
    let (storage, root) = storage().await;
    std::fs::create_dir(root.path().join("data")).unwrap();

    let err = storage.get_object("data", "never-written.txt").await;
    assert!(matches!(err.unwrap_err(), Error::NotFound(_)));
}

#[tokio::test]
async fn test_put_then_get_roundtrip() {
    let (storage, root) = storage().await;
    std::fs::create_dir(root.path().join("data")).unwrap();

    let content = "hello world";
    let record = storage
        .put_object("data", PutRequest::from_bytes("a/b/greeting.txt", content))
        .await
        .unwrap();
    assert_eq!(record.size, Some(content.len() as u64));
    assert!(record.last_modified.is_some());

    let object = storage.get_object("data", "a/b/greeting.txt").await.unwrap();
    assert_eq!(
        object.headers["content-length"],
        content.len().to_string()
    );
    assert_eq!(object.into_bytes().await.unwrap(), content.as_bytes());

    let fetched = storage
        .get_object_metadata("data", "a/b/greeting.txt")
        .await
        .unwrap();
    assert_eq!(fetched.etag.as_deref(), Some(md5_hex(content).as_str()));
    assert_eq!(fetched.size, Some(content.len() as u64));
}

#[tokio::test]
async fn test_put_to_directory_key_is_rejected() {
    let (storage, root) = storage().await;
    std::fs::create_dir(root.path().join("data")).unwrap();

    let err = storage
        .put_object("data", PutRequest::from_bytes("a/b/", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPath(_)));
}

#[tokio::test]
async fn test_listing_shows_one_level_only() {
    let (storage, root) = storage().await;
    seed_file(&root, "data/a/x.txt", "1");
    seed_file(&root, "data/a/sub/y.txt", "2");

    let chunk = storage
        .list_objects("data", &ListRequest::with_prefix("a/"))
        .await
        .unwrap();

    assert_eq!(chunk.objects.len(), 1);
    assert_eq!(chunk.objects[0].key, "a/x.txt");
    assert_eq!(chunk.common_prefixes.len(), 1);
    assert!(chunk.common_prefixes.contains("a/sub/"));
    // the nested file folds into its prefix, never appearing directly
    assert!(chunk.objects.iter().all(|o| o.key != "a/sub/y.txt"));
    assert!(chunk.next_marker.is_none());
}

#[tokio::test]
async fn test_listing_defaults_to_bucket_root() {
    let (storage, root) = storage().await;
    seed_file(&root, "data/top.txt", "1");
    seed_file(&root, "data/a/deep.txt", "2");

    let chunk = storage
        .list_objects("data", &ListRequest::default())
        .await
        .unwrap();
    assert_eq!(chunk.objects.len(), 1);
    assert_eq!(chunk.objects[0].key, "top.txt");
    assert!(chunk.common_prefixes.contains("a/"));
}

#[tokio::test]
async fn test_listing_with_no_matches_is_an_empty_chunk() {
    let (storage, root) = storage().await;
    std::fs::create_dir(root.path().join("data")).unwrap();

    let chunk = storage
        .list_objects("data", &ListRequest::with_prefix("nothing/here/"))
        .await
        .unwrap();
    assert!(chunk.objects.is_empty());
    assert!(chunk.common_prefixes.is_empty());
}

#[tokio::test]
async fn test_listing_missing_bucket_propagates_error() {
    let (storage, _root) = storage().await;

    let result = storage
        .list_objects("missing-bucket", &ListRequest::default())
        .await;
    assert!(matches!(result.unwrap_err(), Error::NotFound(_)));
}

#[tokio::test]
async fn test_listing_is_single_chunk_regardless_of_paging_hints() {
    let (storage, root) = storage().await;
    seed_file(&root, "data/a.txt", "1");
    seed_file(&root, "data/b.txt", "2");
    seed_file(&root, "data/c.txt", "3");

    let request = ListRequest {
        max_keys: Some(1),
        marker: Some("a.txt".into()),
        ..Default::default()
    };
    let chunk = storage.list_objects("data", &request).await.unwrap();
    assert_eq!(chunk.objects.len(), 3);
    assert!(chunk.next_marker.is_none());
}

#[tokio::test]
async fn test_self_copy_is_rejected_without_mutation() {
    let (storage, root) = storage().await;
    seed_file(&root, "data/a/x.txt", "original");

    let request = CopyRequest::new("data", "a/x.txt", "data", "a/x.txt");
    let err = storage.copy_object(&request).await.unwrap_err();
    assert!(matches!(err, Error::SelfCopy(_)));

    let untouched = std::fs::read_to_string(root.path().join("data/a/x.txt")).unwrap();
    assert_eq!(untouched, "original");
}

#[tokio::test]
async fn test_cross_bucket_copy_preserves_content_hash() {
    let (storage, root) = storage().await;
    seed_file(&root, "src/a/x.txt", "payload");
    std::fs::create_dir(root.path().join("dst")).unwrap();

    let request = CopyRequest::new("src", "a/x.txt", "dst", "a/x.txt");
    let copied = storage.copy_object(&request).await.unwrap();

    let source = storage.get_object_metadata("src", "a/x.txt").await.unwrap();
    assert_eq!(copied.etag, source.etag);
    assert_eq!(copied.size, source.size);
}

#[tokio::test]
async fn test_rename_copy_is_non_destructive_and_cleans_scratch() {
    let (storage, root) = storage().await;
    seed_file(&root, "data/a/x.txt", "rename me");

    // success path
    let before = scratch_dirs();
    let request = CopyRequest::new("data", "a/x.txt", "data", "a/y.txt");
    let copied = storage.copy_object(&request).await.unwrap();
    assert_eq!(copied.key, "a/y.txt");
    assert_eq!(copied.etag.as_deref(), Some(md5_hex("rename me").as_str()));

    let source = std::fs::read_to_string(root.path().join("data/a/x.txt")).unwrap();
    assert_eq!(source, "rename me");
    let dest = std::fs::read_to_string(root.path().join("data/a/y.txt")).unwrap();
    assert_eq!(dest, "rename me");
    assert_eq!(scratch_dirs(), before);

    // induced failure: the destination leaf already exists as a directory,
    // so the re-upload step fails after download and rename succeeded
    std::fs::create_dir(root.path().join("data/a/blocked.txt")).unwrap();
    let request = CopyRequest::new("data", "a/x.txt", "data", "a/blocked.txt");
    let err = storage.copy_object(&request).await.unwrap_err();
    assert!(matches!(err, Error::UploadFailed(_)));

    let source = std::fs::read_to_string(root.path().join("data/a/x.txt")).unwrap();
    assert_eq!(source, "rename me");
    assert_eq!(scratch_dirs(), before);
}

#[tokio::test]
async fn test_rename_copy_of_directory_is_not_supported() {
    let (storage, root) = storage().await;
    seed_file(&root, "data/d1/inner.txt", "x");

    // "d1" is file-shaped as a key but resolves to a directory
    let request = CopyRequest::new("data", "d1", "data", "d2");
    let err = storage.copy_object(&request).await.unwrap_err();
    assert!(matches!(err, Error::NotSupported(_)));
    assert!(root.path().join("data/d1/inner.txt").exists());
    assert!(!root.path().join("data/d2").exists());
}

#[tokio::test]
async fn test_rename_copy_missing_source() {
    let (storage, root) = storage().await;
    std::fs::create_dir(root.path().join("data")).unwrap();

    let request = CopyRequest::new("data", "ghost.txt", "data", "copy.txt");
    let err = storage.copy_object(&request).await.unwrap_err();
    assert!(matches!(err, Error::SourceMissing(_)));
}

#[tokio::test]
async fn test_delete_missing_bucket_reports_delete_failed() {
    let (storage, _root) = storage().await;

    let err = storage.delete_bucket("never-created").await.unwrap_err();
    assert!(matches!(err, Error::DeleteFailed(_)));
}

#[tokio::test]
async fn test_object_and_bucket_lifecycle() {
    let (storage, _root) = storage().await;

    storage.create_bucket("data").await.unwrap();
    storage
        .put_object("data", PutRequest::from_bytes("doc.txt", "body"))
        .await
        .unwrap();

    storage.delete_object("data", "doc.txt").await.unwrap();
    let err = storage.get_object("data", "doc.txt").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    storage.delete_bucket("data").await.unwrap();
    assert!(storage.list_buckets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_bucket_scans_containers() {
    let (storage, _root) = storage().await;
    storage.create_bucket("alpha").await.unwrap();
    storage.create_bucket("beta").await.unwrap();

    let bucket = storage.get_bucket("beta").await.unwrap();
    assert_eq!(bucket.name, "beta");

    let err = storage.get_bucket("gamma").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_bucket_descriptors_carry_owner() {
    let root = TempDir::new().unwrap();
    let storage = ObjectStorage::connect_as(FsStore::new(root.path()), "tester")
        .await
        .unwrap();

    let created = storage.create_bucket("data").await.unwrap();
    assert_eq!(created.owner, "tester");

    let listed = storage.list_buckets().await.unwrap();
    assert_eq!(listed[0].owner, "tester");
}

#[tokio::test]
async fn test_get_directory_object_has_metadata_but_no_body() {
    let (storage, root) = storage().await;
    seed_file(&root, "data/a/sub/y.txt", "x");

    let object = storage.get_object("data", "a/sub/").await.unwrap();
    assert!(object.body.is_none());
    assert_eq!(object.headers["content-length"], "0");
}

#[tokio::test]
async fn test_concurrent_puts_to_distinct_keys() {
    let (storage, root) = storage().await;
    std::fs::create_dir(root.path().join("data")).unwrap();

    let (first, second) = tokio::join!(
        storage.put_object("data", PutRequest::from_bytes("one.txt", "first")),
        storage.put_object("data", PutRequest::from_bytes("two.txt", "second")),
    );
    first.unwrap();
    second.unwrap();

    let one = storage.get_object("data", "one.txt").await.unwrap();
    assert_eq!(one.into_bytes().await.unwrap(), b"first");
    let two = storage.get_object("data", "two.txt").await.unwrap();
    assert_eq!(two.into_bytes().await.unwrap(), b"second");
}
