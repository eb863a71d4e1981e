use std::path::PathBuf;

/// Errors raised by storage backends.
/// We use `anyhow` at the top level for CLI error handling,
/// but listing and removal failures stay typed so callers can inspect them.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The storage service answered with a non-success status
    #[error("storage API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded
    #[error("could not decode storage response: {0}")]
    Decode(String),

    /// Bucket does not exist
    #[error("bucket '{bucket}' not found")]
    BucketNotFound { bucket: String },

    /// A list option had a value the backend cannot use
    #[error("invalid list option '{key}': {message}")]
    InvalidOptions { key: String, message: String },

    /// A path would resolve outside of its bucket
    #[error("invalid object path '{path}'")]
    InvalidPath { path: String },

    /// File system operation failed (local backend)
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backend is missing required settings
    #[error("storage configuration error: {0}")]
    Config(String),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StorageError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            StorageError::Api {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            StorageError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = StorageError::Api {
            status: 403,
            message: "permission denied".into(),
        };
        assert_eq!(err.to_string(), "storage API error (403): permission denied");
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = StorageError::io(
            "/tmp/bucket/a.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(err.to_string().contains("/tmp/bucket/a.txt"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
