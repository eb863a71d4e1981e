use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use super::filter::system_file_paths;
use crate::common::errors::StorageError;
use crate::storage::{ListOptions, StorageBackend};

/// Outcome of a system-file cleanup.
///
/// `cleaned_count` is only ever non-zero on success: a failed bulk delete
/// reports zero even if the service removed some objects before failing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeReport {
    pub success: bool,
    pub cleaned_count: usize,
    pub removed_paths: Vec<String>,
    #[serde(serialize_with = "error_as_string")]
    pub error: Option<StorageError>,
}

fn error_as_string<S: Serializer>(
    error: &Option<StorageError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

impl PurgeReport {
    /// Successful report for a directory with nothing to remove
    pub fn nothing_to_clean() -> Self {
        Self {
            success: true,
            cleaned_count: 0,
            removed_paths: Vec::new(),
            error: None,
        }
    }

    fn cleaned(paths: Vec<String>) -> Self {
        Self {
            success: true,
            cleaned_count: paths.len(),
            removed_paths: paths,
            error: None,
        }
    }

    fn failed(error: StorageError) -> Self {
        Self {
            success: false,
            cleaned_count: 0,
            removed_paths: Vec::new(),
            error: Some(error),
        }
    }

    /// Removed paths that are missing from `planned`.
    ///
    /// The cleanup lists the directory again before deleting, so objects
    /// created after a plan was shown can be swept up with it.
    pub fn unplanned_paths<'a>(&'a self, planned: &[String]) -> Vec<&'a str> {
        self.removed_paths
            .iter()
            .filter(|p| !planned.contains(p))
            .map(String::as_str)
            .collect()
    }

    /// Collapse into a `Result` for callers that prefer `?`
    pub fn into_result(self) -> Result<usize, StorageError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.cleaned_count),
        }
    }
}

/// Paths a cleanup of `bucket`/`path` would delete, without deleting anything.
///
/// Uses the raw listing: zero-byte user files are not system files.
pub async fn plan_cleanup(
    backend: &dyn StorageBackend,
    bucket: &str,
    path: &str,
) -> Result<Vec<String>, StorageError> {
    let files = backend
        .list(bucket, path, &ListOptions::default())
        .await?
        .unwrap_or_default();
    Ok(system_file_paths(path, &files))
}

/// Delete every system file directly under `bucket`/`path` in one bulk request.
///
/// Never returns early with an error: failures from either the listing or
/// the delete land in the report. No retries.
pub async fn cleanup_system_files(
    backend: &dyn StorageBackend,
    bucket: &str,
    path: &str,
) -> PurgeReport {
    let targets = match plan_cleanup(backend, bucket, path).await {
        Ok(targets) => targets,
        Err(e) => {
            warn!(bucket, path, "cleanup listing failed: {}", e);
            return PurgeReport::failed(e);
        }
    };

    if targets.is_empty() {
        debug!(bucket, path, "no system files to clean");
        return PurgeReport::nothing_to_clean();
    }

    debug!(bucket, path, count = targets.len(), "removing system files");
    if let Err(e) = backend.remove(bucket, &targets).await {
        warn!(bucket, path, "bulk delete failed: {}", e);
        return PurgeReport::failed(e);
    }

    info!(bucket, path, count = targets.len(), "system files removed");
    PurgeReport::cleaned(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_shape() {
        let report = PurgeReport::failed(StorageError::Api {
            status: 500,
            message: "boom".into(),
        });
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["cleanedCount"], 0);
        assert_eq!(json["error"], "storage API error (500): boom");

        let report = PurgeReport::cleaned(vec!["docs/.x".into()]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["cleanedCount"], 1);
        assert_eq!(json["removedPaths"][0], "docs/.x");
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_unplanned_paths() {
        let report = PurgeReport::cleaned(vec!["docs/.a".into(), "docs/.b".into()]);
        assert!(report.unplanned_paths(&["docs/.a".into(), "docs/.b".into()]).is_empty());
        assert_eq!(report.unplanned_paths(&["docs/.a".into()]), vec!["docs/.b"]);

        // Planned but already gone is not a surprise
        let report = PurgeReport::cleaned(vec!["docs/.a".into()]);
        assert!(report.unplanned_paths(&["docs/.a".into(), "docs/.z".into()]).is_empty());
        assert!(PurgeReport::nothing_to_clean().unplanned_paths(&[]).is_empty());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(PurgeReport::cleaned(vec!["a".into(), "b".into()]).into_result().unwrap(), 2);
        assert!(PurgeReport::failed(StorageError::Transport("reset".into()))
            .into_result()
            .is_err());
    }
}
