//! Copy orchestration
//!
//! Decides between the backend's native copy and the same-directory
//! download/rename/reupload fallback, and runs the chosen path without ever
//! touching the source on failure.

use bk_core::path::{DELIMITER, leaf_name, parent_directory};
use bk_core::{CopyRequest, Error, ObjectRecord, Result, TreeStore};

use crate::storage::ObjectStorage;

pub(crate) async fn copy_object<S: TreeStore>(
    storage: &ObjectStorage<S>,
    request: &CopyRequest,
) -> Result<ObjectRecord> {
    if request.src_bucket == request.dst_bucket {
        let src_dir = parent_directory(&request.src_key);
        let dst_dir = parent_directory(&request.dst_key);

        if src_dir == dst_dir {
            let src_name = leaf_name(&request.src_key);
            let dst_name = leaf_name(&request.dst_key);

            if src_name == dst_name {
                return Err(Error::SelfCopy(format!(
                    "{}/{}",
                    request.src_bucket, request.src_key
                )));
            }
            if src_name.is_empty() || dst_name.is_empty() {
                return Err(Error::CopyFailed(format!(
                    "invalid source or destination name: '{}' -> '{}'",
                    request.src_key, request.dst_key
                )));
            }
            return rename_copy(storage, request, &dst_dir, &dst_name).await;
        }
    }

    // Cross-bucket and cross-directory copies go through the backend.
    storage
        .store()
        .copy_entry(
            &request.src_bucket,
            &request.src_key,
            &request.dst_bucket,
            &request.dst_key,
        )
        .await
        .map_err(|e| Error::CopyFailed(e.to_string()))?;

    storage
        .get_object_metadata(&request.dst_bucket, &request.dst_key)
        .await
}

/// Same-bucket, same-directory copy: the backend has no in-place rename, so
/// the object is pulled down, renamed locally, and pushed back up under the
/// destination name.
///
/// The local scratch directory lives exactly as long as this call; the
/// `TempDir` guard removes it on every exit path, success or failure. The
/// source object is never deleted, whichever step fails.
async fn rename_copy<S: TreeStore>(
    storage: &ObjectStorage<S>,
    request: &CopyRequest,
    dst_dir: &str,
    dst_name: &str,
) -> Result<ObjectRecord> {
    let store = storage.store();

    if !store
        .file_exists(&request.src_bucket, &request.src_key)
        .await?
    {
        if store
            .directory_exists(&request.src_bucket, &request.src_key)
            .await?
        {
            return Err(Error::NotSupported(format!(
                "copying a directory within a bucket: {}/{}",
                request.src_bucket, request.src_key
            )));
        }
        return Err(Error::SourceMissing(format!(
            "{}/{}",
            request.src_bucket, request.src_key
        )));
    }

    let scratch = tempfile::Builder::new().prefix("bk-copy-").tempdir()?;

    let downloaded = store
        .download_to_dir(&request.src_bucket, &request.src_key, scratch.path())
        .await
        .map_err(|e| Error::CopyFailed(format!("download step: {e}")))?;

    let renamed = scratch.path().join(dst_name);
    tokio::fs::rename(&downloaded, &renamed)
        .await
        .map_err(|e| Error::CopyFailed(format!("rename step: {e}")))?;

    store
        .upload_file(
            &renamed,
            &request.dst_bucket,
            dst_dir.trim_end_matches(DELIMITER),
        )
        .await?;

    storage
        .get_object_metadata(&request.dst_bucket, &request.dst_key)
        .await
}
