use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::errors::StorageError;

// ─── Listing entries ──────────────────────────────────────────────────────────

/// One entry of a storage listing.
///
/// Only `name` and `metadata.size` are interpreted; everything else is
/// carried through for display and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Name relative to the listed path
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed_at: Option<DateTime<Utc>>,

    /// Object metadata; `None` for folder entries
    #[serde(default)]
    pub metadata: Option<FileMetadata>,
}

/// Object metadata as reported by the storage service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status_code: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
}

impl FileRecord {
    /// A bare record with no metadata (how folders come back from a listing)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            created_at: None,
            updated_at: None,
            last_accessed_at: None,
            metadata: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.metadata.get_or_insert_with(FileMetadata::default).size = Some(size);
        self
    }

    /// Byte size, if the listing reported one
    pub fn size(&self) -> Option<u64> {
        self.metadata.as_ref().and_then(|m| m.size)
    }

    /// Folder entries carry neither an id nor metadata
    pub fn is_folder(&self) -> bool {
        self.id.is_none() && self.metadata.is_none()
    }

    /// Whether this record is a placeholder or other system artifact
    pub fn is_system(&self) -> bool {
        crate::hygiene::is_system_file(&self.name)
    }
}

// ─── List options ─────────────────────────────────────────────────────────────

/// Options forwarded verbatim to a backend's `list` call.
///
/// The keys are owned by the storage service, not by this crate. The
/// helpers below cover the ones Supabase understands; anything else can be
/// set with [`ListOptions::set`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListOptions(Map<String, Value>);

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn limit(self, limit: u64) -> Self {
        self.set("limit", limit)
    }

    pub fn offset(self, offset: u64) -> Self {
        self.set("offset", offset)
    }

    pub fn search(self, term: impl Into<String>) -> Self {
        self.set("search", term.into())
    }

    pub fn sort_by(self, column: &str, order: &str) -> Self {
        self.set(
            "sortBy",
            serde_json::json!({ "column": column, "order": order }),
        )
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Read a non-negative integer option, rejecting values of any other shape
    pub fn count(&self, key: &str) -> Result<Option<usize>, StorageError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n.as_u64().map(|v| Some(v as usize)).ok_or_else(|| {
                StorageError::InvalidOptions {
                    key: key.to_string(),
                    message: format!("expected a non-negative integer, got {}", n),
                }
            }),
            Some(other) => Err(StorageError::InvalidOptions {
                key: key.to_string(),
                message: format!("expected a non-negative integer, got {}", other),
            }),
        }
    }

    /// Read a string option
    pub fn text(&self, key: &str) -> Result<Option<&str>, StorageError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(StorageError::InvalidOptions {
                key: key.to_string(),
                message: format!("expected a string, got {}", other),
            }),
        }
    }
}

impl From<Map<String, Value>> for ListOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
