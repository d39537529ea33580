//! Storage module
//!
//! The gateway only needs two things from a bucket: list the keys under a
//! prefix and write one object. `ObjectStore` captures exactly that so the
//! HTTP layer never touches the AWS SDK directly.

mod s3;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::domain::StoredObject;

pub use s3::S3Store;

/// Errors that can occur during bucket operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage not configured: {0}")]
    NotConfigured(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Put failed: {0}")]
    PutFailed(String),
}

/// Narrow capability interface over an object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List objects whose key starts with `prefix`, in backend order
    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<StoredObject>, StorageError>;

    /// Write `bytes` under `key` as a single object
    async fn put_object(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;
}
