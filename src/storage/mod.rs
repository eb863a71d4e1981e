pub mod local;
pub mod memory;
pub mod record;
pub mod supabase;

use async_trait::async_trait;

use crate::common::config::{BackendKind, Config};
use crate::common::errors::StorageError;

pub use local::LocalBackend;
pub use memory::MemoryBackend;
pub use record::{FileMetadata, FileRecord, ListOptions};
pub use supabase::SupabaseBackend;

/// The two storage capabilities the hygiene helpers need.
///
/// `list` returns `Ok(None)` when the service answers without a listing
/// (distinct from an empty one). `remove` deletes every given path in a
/// single request and is treated as all-or-nothing by callers.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short label for logs and output
    fn name(&self) -> &str;

    async fn list(
        &self,
        bucket: &str,
        path: &str,
        options: &ListOptions,
    ) -> Result<Option<Vec<FileRecord>>, StorageError>;

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError>;
}

/// Build the backend selected in config
pub fn from_config(config: &Config) -> Result<Box<dyn StorageBackend>, StorageError> {
    match config.backend {
        BackendKind::Supabase => Ok(Box::new(SupabaseBackend::from_config(config)?)),
        BackendKind::Local => {
            let root = config.local_root.clone().ok_or_else(|| {
                StorageError::Config(
                    "local backend needs a root directory (--root or `config set local_root`)"
                        .to_string(),
                )
            })?;
            Ok(Box::new(LocalBackend::new(root)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_backend_requires_root() {
        let config = Config {
            backend: BackendKind::Local,
            ..Config::default()
        };
        assert!(matches!(from_config(&config), Err(StorageError::Config(_))));
    }

    #[test]
    fn test_local_backend_from_config() {
        let config = Config {
            backend: BackendKind::Local,
            local_root: Some("/srv/buckets".into()),
            ..Config::default()
        };
        let backend = from_config(&config).unwrap();
        assert_eq!(backend.name(), "local");
    }
}
