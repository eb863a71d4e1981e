use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::record::{FileMetadata, FileRecord, ListOptions};
use super::StorageBackend;
use crate::common::errors::StorageError;

/// A directory tree standing in for a storage service.
///
/// Each bucket is a sub-directory of `root`; object paths are relative to
/// the bucket directory. Listings behave like Supabase: files carry
/// metadata, sub-directories come back as bare folder entries.
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf, StorageError> {
        if bucket.is_empty() || bucket.contains('/') || bucket.starts_with('.') {
            return Err(StorageError::BucketNotFound {
                bucket: bucket.to_string(),
            });
        }
        let dir = self.root.join(bucket);
        if !dir.is_dir() {
            return Err(StorageError::BucketNotFound {
                bucket: bucket.to_string(),
            });
        }
        Ok(dir)
    }
}

/// Join an object path onto a bucket directory, refusing anything that
/// could climb out of it
fn resolve(bucket_dir: &Path, object_path: &str) -> Result<PathBuf, StorageError> {
    let relative = Path::new(object_path.trim_start_matches('/'));
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(StorageError::InvalidPath {
                    path: object_path.to_string(),
                })
            }
        }
    }
    Ok(bucket_dir.join(relative))
}

fn record_for(name: String, meta: &std::fs::Metadata) -> FileRecord {
    if meta.is_dir() {
        return FileRecord::new(name);
    }
    let to_utc = |t: std::io::Result<std::time::SystemTime>| t.ok().map(DateTime::<Utc>::from);
    FileRecord {
        id: Some(name.clone()),
        created_at: to_utc(meta.created()),
        updated_at: to_utc(meta.modified()),
        last_accessed_at: to_utc(meta.accessed()),
        metadata: Some(FileMetadata {
            size: Some(meta.len()),
            content_length: Some(meta.len()),
            ..FileMetadata::default()
        }),
        name,
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        "local"
    }

    async fn list(
        &self,
        bucket: &str,
        path: &str,
        options: &ListOptions,
    ) -> Result<Option<Vec<FileRecord>>, StorageError> {
        let limit = options.count("limit")?;
        let offset = options.count("offset")?.unwrap_or(0);
        let search = options.text("search")?.map(str::to_lowercase);

        let dir = resolve(&self.bucket_dir(bucket)?, path)?;
        if !dir.is_dir() {
            debug!(bucket, path, "no such directory, returning empty listing");
            return Ok(None);
        }

        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| StorageError::io(&dir, e))?;
        let mut records = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(&dir, e))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(ref term) = search {
                if !name.to_lowercase().starts_with(term.as_str()) {
                    continue;
                }
            }
            let meta = entry
                .metadata()
                .await
                .map_err(|e| StorageError::io(entry.path(), e))?;
            records.push(record_for(name, &meta));
        }

        records.sort_by(|a, b| a.name.cmp(&b.name));
        let records = records
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .collect();
        Ok(Some(records))
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        let bucket_dir = self.bucket_dir(bucket)?;

        // Validate every path before touching anything
        let targets = paths
            .iter()
            .map(|p| resolve(&bucket_dir, p))
            .collect::<Result<Vec<_>, _>>()?;

        for target in targets {
            match tokio::fs::metadata(&target).await {
                Ok(meta) if meta.is_file() => {
                    tokio::fs::remove_file(&target)
                        .await
                        .map_err(|e| StorageError::io(&target, e))?;
                    debug!("removed {}", target.display());
                }
                // Only objects are removable; prefixes and missing keys are no-ops
                Ok(_) => debug!("skipping non-object {}", target.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StorageError::io(&target, e)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_escapes() {
        let base = Path::new("/srv/buckets/docs");
        assert!(resolve(base, "../secrets").is_err());
        assert!(resolve(base, "a/../../b").is_err());
        assert_eq!(
            resolve(base, "/nested/file.txt").unwrap(),
            PathBuf::from("/srv/buckets/docs/nested/file.txt")
        );
        assert_eq!(resolve(base, "").unwrap(), PathBuf::from("/srv/buckets/docs"));
    }

    #[test]
    fn test_bucket_names_are_single_segments() {
        let backend = LocalBackend::new("/nonexistent-root");
        assert!(backend.bucket_dir("a/b").is_err());
        assert!(backend.bucket_dir("..").is_err());
        assert!(backend.bucket_dir("").is_err());
    }
}
