//! Bucket object types shared by the listing and upload paths

use bytes::Bytes;
use serde::Serialize;
use utoipa::ToSchema;

/// MIME type used when an upload does not declare one
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// An object as returned to API clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ObjectDescriptor {
    /// Bucket-relative key, e.g. `images/cat.png`
    pub key: String,
    /// Public URL of the object
    pub url: String,
}

/// One entry of a storage listing page
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: String,
    pub size: Option<i64>,
}

impl StoredObject {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size: None,
        }
    }

    /// Zero-byte `foo/` keys created by consoles to fake empty folders
    pub fn is_directory_placeholder(&self) -> bool {
        self.key.ends_with('/')
    }
}

/// A single file received from a client, fully buffered
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub original_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl UploadRequest {
    pub fn new(original_name: impl Into<String>, mime_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            original_name: original_name.into(),
            mime_type: mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string()),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Key namespaces exposed through the listing endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Images,
    Data,
}

impl Collection {
    pub fn prefix(&self) -> &'static str {
        match self {
            Collection::Images => "images/",
            Collection::Data => "data/",
        }
    }

    /// Message returned to clients when the listing fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Collection::Images => "Failed to list images",
            Collection::Data => "Failed to list data files",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Images => "images",
            Collection::Data => "data",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
