use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::record::{FileRecord, ListOptions};
use super::StorageBackend;
use crate::common::errors::StorageError;

/// In-memory storage fake.
///
/// Listings are keyed by `(bucket, path)`. Every call is recorded so tests
/// can assert on what reached the "service", and either capability can be
/// primed to fail with an API error.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    listings: HashMap<(String, String), Option<Vec<FileRecord>>>,
    list_failure: Option<(u16, String)>,
    remove_failure: Option<(u16, String)>,
    list_calls: Vec<ListCall>,
    remove_calls: Vec<RemoveCall>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListCall {
    pub bucket: String,
    pub path: String,
    pub options: ListOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveCall {
    pub bucket: String,
    pub paths: Vec<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` for `bucket`/`path`
    pub fn with_listing(self, bucket: &str, path: &str, records: Vec<FileRecord>) -> Self {
        self.lock()
            .listings
            .insert((bucket.to_string(), path.to_string()), Some(records));
        self
    }

    /// Answer `bucket`/`path` with no listing at all
    pub fn with_null_listing(self, bucket: &str, path: &str) -> Self {
        self.lock()
            .listings
            .insert((bucket.to_string(), path.to_string()), None);
        self
    }

    pub fn fail_list(self, status: u16, message: &str) -> Self {
        self.lock().list_failure = Some((status, message.to_string()));
        self
    }

    pub fn fail_remove(self, status: u16, message: &str) -> Self {
        self.lock().remove_failure = Some((status, message.to_string()));
        self
    }

    pub fn list_calls(&self) -> Vec<ListCall> {
        self.lock().list_calls.clone()
    }

    pub fn remove_calls(&self) -> Vec<RemoveCall> {
        self.lock().remove_calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Poisoned: keep serving the recorded state
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(
        &self,
        bucket: &str,
        path: &str,
        options: &ListOptions,
    ) -> Result<Option<Vec<FileRecord>>, StorageError> {
        let mut state = self.lock();
        state.list_calls.push(ListCall {
            bucket: bucket.to_string(),
            path: path.to_string(),
            options: options.clone(),
        });
        if let Some((status, message)) = &state.list_failure {
            return Err(StorageError::Api {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(state
            .listings
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
            .unwrap_or_else(|| Some(Vec::new())))
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        let mut state = self.lock();
        state.remove_calls.push(RemoveCall {
            bucket: bucket.to_string(),
            paths: paths.to_vec(),
        });
        if let Some((status, message)) = &state.remove_failure {
            return Err(StorageError::Api {
                status: *status,
                message: message.clone(),
            });
        }

        for ((b, dir), listing) in state.listings.iter_mut() {
            if b != bucket {
                continue;
            }
            if let Some(records) = listing {
                records.retain(|r| {
                    let full = if dir.is_empty() {
                        r.name.clone()
                    } else {
                        format!("{}/{}", dir, r.name)
                    };
                    !paths.contains(&full)
                });
            }
        }
        Ok(())
    }
}
