use tracing::{debug, warn};

use super::filter::filter_system_files;
use crate::common::errors::StorageError;
use crate::storage::{FileRecord, ListOptions, StorageBackend};

/// List a directory with system files filtered out.
///
/// The backend error is handed back untouched. A listing call that
/// succeeds without returning data yields an empty list.
pub async fn list_files(
    backend: &dyn StorageBackend,
    bucket: &str,
    path: &str,
    options: &ListOptions,
) -> Result<Vec<FileRecord>, StorageError> {
    debug!(backend = backend.name(), bucket, path, "listing");

    let files = match backend.list(bucket, path, options).await {
        Ok(Some(files)) => files,
        Ok(None) => return Ok(Vec::new()),
        Err(e) => {
            warn!(bucket, path, "listing failed: {}", e);
            return Err(e);
        }
    };

    let total = files.len();
    let visible = filter_system_files(files);
    debug!(bucket, path, total, hidden = total - visible.len(), "listing filtered");
    Ok(visible)
}
