//! Local filesystem backend
//!
//! Implements the TreeStore trait over a root directory: top-level
//! directories are buckets, and entries below them are the hierarchical
//! tree the facade translates into a flat key space. This is the only crate
//! that touches a concrete storage technology.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use jiff::Timestamp;
use tokio::io::AsyncWriteExt;

use bk_core::error::{Error, Result};
use bk_core::store::{ByteStream, ContainerMeta, Credentials, EntryMeta, TreeStore};

const READ_CHUNK: usize = 64 * 1024;

/// TreeStore over a local root directory
#[derive(Debug)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store over `root`. The directory is validated on `connect`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory this store serves
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_path(&self, bucket: &str) -> PathBuf {
        self.root.join(bucket)
    }

    fn entry_path(&self, bucket: &str, key: &str) -> PathBuf {
        let trimmed = key.trim_matches('/');
        if trimmed.is_empty() {
            self.bucket_path(bucket)
        } else {
            self.bucket_path(bucket).join(trimmed)
        }
    }

    async fn file_meta(&self, abs: &Path, rel: &str) -> Result<EntryMeta> {
        let fs_meta = tokio::fs::metadata(abs).await?;
        let data = tokio::fs::read(abs).await?;
        Ok(EntryMeta {
            path: rel.to_string(),
            is_file: true,
            length: Some(fs_meta.len()),
            md5_hex: Some(format!("{:x}", md5::compute(&data))),
            last_modified: to_timestamp(fs_meta.modified().ok()),
        })
    }

    async fn dir_meta(&self, abs: &Path, rel: &str) -> Result<EntryMeta> {
        let fs_meta = tokio::fs::metadata(abs).await?;
        let mut meta = EntryMeta::directory(rel);
        meta.last_modified = to_timestamp(fs_meta.modified().ok());
        Ok(meta)
    }

    async fn list_one_level(&self, base: &Path, base_rel: &str) -> Result<Vec<EntryMeta>> {
        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(base).await?;
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            let rel = if base_rel.is_empty() {
                name
            } else {
                format!("{base_rel}/{name}")
            };
            let abs = entry.path();
            if entry.file_type().await?.is_dir() {
                entries.push(self.dir_meta(&abs, &rel).await?);
            } else {
                entries.push(self.file_meta(&abs, &rel).await?);
            }
        }
        // read_dir order is OS-dependent; keep listings deterministic
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

fn to_timestamp(time: Option<std::time::SystemTime>) -> Option<Timestamp> {
    time.and_then(|t| Timestamp::try_from(t).ok())
}

/// Chunked reader over a local file, surfaced as a byte stream
struct FileByteStream {
    reader: BufReader<std::fs::File>,
}

impl FileByteStream {
    fn new(file: std::fs::File) -> Self {
        Self {
            reader: BufReader::with_capacity(READ_CHUNK, file),
        }
    }
}

impl Stream for FileByteStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.reader.fill_buf() {
            Ok(buf) => {
                let consumed = buf.len();
                if consumed == 0 {
                    return Poll::Ready(None);
                }
                let chunk = Bytes::copy_from_slice(buf);
                this.reader.consume(consumed);
                Poll::Ready(Some(Ok(chunk)))
            }
            Err(e) => Poll::Ready(Some(Err(e))),
        }
    }
}

#[async_trait]
impl TreeStore for FsStore {
    async fn connect(&self, _credentials: Option<&Credentials>) -> Result<()> {
        // A local store needs no credentials; connecting validates the root.
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(Error::ConnectionFailed(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            Err(e) => Err(Error::ConnectionFailed(format!(
                "{}: {e}",
                self.root.display()
            ))),
        }
    }

    async fn file_exists(&self, bucket: &str, key: &str) -> Result<bool> {
        match tokio::fs::metadata(self.entry_path(bucket, key)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn directory_exists(&self, bucket: &str, key: &str) -> Result<bool> {
        match tokio::fs::metadata(self.entry_path(bucket, key)).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn metadata(&self, bucket: &str, key: &str) -> Result<EntryMeta> {
        let abs = self.entry_path(bucket, key);
        let rel = key.trim_matches('/');
        match tokio::fs::metadata(&abs).await {
            Ok(meta) if meta.is_file() => self.file_meta(&abs, rel).await,
            Ok(_) => self.dir_meta(&abs, rel).await,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(EntryMeta {
                path: rel.to_string(),
                is_file: !key.ends_with('/'),
                ..Default::default()
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn open_read(&self, bucket: &str, key: &str) -> Result<ByteStream> {
        let abs = self.entry_path(bucket, key);
        match tokio::fs::metadata(&abs).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(Error::NotFound(format!("{bucket}/{key} is not a file")));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(format!("{bucket}/{key}")));
            }
            Err(e) => return Err(e.into()),
        }
        let file = std::fs::File::open(&abs)?;
        Ok(FileByteStream::new(file).boxed())
    }

    async fn upload_stream(
        &self,
        mut data: ByteStream,
        bucket: &str,
        parent: &str,
        name: &str,
        length: u64,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(Error::UploadFailed("empty object name".into()));
        }
        let bucket_dir = self.bucket_path(bucket);
        if !bucket_dir.is_dir() {
            return Err(Error::UploadFailed(format!(
                "bucket '{bucket}' does not exist"
            )));
        }

        let parent = parent.trim_matches('/');
        let dir = if parent.is_empty() {
            bucket_dir
        } else {
            bucket_dir.join(parent)
        };
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::UploadFailed(e.to_string()))?;

        let dst = dir.join(name);
        let mut file = tokio::fs::File::create(&dst)
            .await
            .map_err(|e| Error::UploadFailed(e.to_string()))?;

        let mut written = 0u64;
        while let Some(chunk) = data.next().await {
            let chunk = chunk.map_err(|e| Error::UploadFailed(format!("source stream: {e}")))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| Error::UploadFailed(e.to_string()))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| Error::UploadFailed(e.to_string()))?;

        if written != length {
            tracing::debug!(declared = length, written, "upload length mismatch");
        }
        Ok(())
    }

    async fn upload_file(&self, local: &Path, bucket: &str, parent: &str) -> Result<()> {
        let meta = tokio::fs::metadata(local)
            .await
            .map_err(|_| Error::SourceMissing(local.display().to_string()))?;
        if !meta.is_file() {
            return Err(Error::SourceMissing(local.display().to_string()));
        }
        let name = local
            .file_name()
            .ok_or_else(|| Error::SourceMissing(local.display().to_string()))?
            .to_string_lossy()
            .to_string();

        let bucket_dir = self.bucket_path(bucket);
        if !bucket_dir.is_dir() {
            return Err(Error::UploadFailed(format!(
                "bucket '{bucket}' does not exist"
            )));
        }
        let parent = parent.trim_matches('/');
        let dir = if parent.is_empty() {
            bucket_dir
        } else {
            bucket_dir.join(parent)
        };
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::UploadFailed(e.to_string()))?;

        tokio::fs::copy(local, dir.join(&name))
            .await
            .map_err(|e| Error::UploadFailed(e.to_string()))?;
        Ok(())
    }

    async fn download_to_dir(&self, bucket: &str, key: &str, local_dir: &Path) -> Result<PathBuf> {
        let src = self.entry_path(bucket, key);
        let meta = tokio::fs::metadata(&src)
            .await
            .map_err(|_| Error::SourceMissing(format!("{bucket}/{key}")))?;
        if !meta.is_file() {
            return Err(Error::SourceMissing(format!("{bucket}/{key}")));
        }
        let name = src
            .file_name()
            .ok_or_else(|| Error::SourceMissing(format!("{bucket}/{key}")))?;
        let dst = local_dir.join(name);
        tokio::fs::copy(&src, &dst).await?;
        Ok(dst)
    }

    async fn list_entries(
        &self,
        bucket: &str,
        prefix: &str,
        recursive: bool,
    ) -> Result<Vec<EntryMeta>> {
        if !self.bucket_path(bucket).is_dir() {
            return Err(Error::NotFound(format!("bucket '{bucket}'")));
        }

        let base = self.entry_path(bucket, prefix);
        if !base.is_dir() {
            // nothing under this prefix; an empty listing, not a failure
            return Ok(Vec::new());
        }
        let base_rel = prefix.trim_matches('/').to_string();

        if !recursive {
            return self.list_one_level(&base, &base_rel).await;
        }

        let mut entries = Vec::new();
        let mut pending = vec![(base, base_rel)];
        while let Some((dir, rel)) = pending.pop() {
            for entry in self.list_one_level(&dir, &rel).await? {
                if entry.is_file {
                    entries.push(entry);
                } else {
                    pending.push((self.entry_path(bucket, &entry.path), entry.path.clone()));
                    entries.push(entry);
                }
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    async fn copy_entry(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> Result<()> {
        let src = self.entry_path(src_bucket, src_key);
        let meta = tokio::fs::metadata(&src)
            .await
            .map_err(|_| Error::SourceMissing(format!("{src_bucket}/{src_key}")))?;
        if meta.is_dir() {
            return Err(Error::MethodNotSupported(
                "native copy of directories".into(),
            ));
        }

        if !self.bucket_path(dst_bucket).is_dir() {
            return Err(Error::NotFound(format!("bucket '{dst_bucket}'")));
        }
        let dst = self.entry_path(dst_bucket, dst_key);
        if let Some(parent) = dst.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(&src, &dst).await?;
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str, recursive: bool) -> Result<()> {
        let path = self.entry_path(bucket, key);
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|_| Error::NotFound(format!("{bucket}/{key}")))?;
        if meta.is_dir() {
            if recursive {
                tokio::fs::remove_dir_all(&path).await?;
            } else {
                tokio::fs::remove_dir(&path).await?;
            }
        } else {
            tokio::fs::remove_file(&path).await?;
        }
        Ok(())
    }

    async fn create_container(&self, bucket: &str) -> Result<()> {
        tokio::fs::create_dir(self.bucket_path(bucket)).await?;
        Ok(())
    }

    async fn delete_container(&self, bucket: &str) -> Result<()> {
        let path = self.bucket_path(bucket);
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|_| Error::NotFound(format!("bucket '{bucket}'")))?;
        if !meta.is_dir() {
            return Err(Error::NotFound(format!("bucket '{bucket}'")));
        }
        tokio::fs::remove_dir_all(&path).await?;
        Ok(())
    }

    async fn list_containers(&self) -> Result<Vec<ContainerMeta>> {
        let mut containers = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = dir.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                let created = entry
                    .metadata()
                    .await
                    .ok()
                    .and_then(|m| m.created().ok())
                    .and_then(|t| Timestamp::try_from(t).ok());
                containers.push(ContainerMeta {
                    name: entry.file_name().to_string_lossy().to_string(),
                    created,
                });
            }
        }
        containers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(containers)
    }
}
