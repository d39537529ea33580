//! Listing and upload operations over an [`ObjectStore`]
//!
//! `Gallery` owns the public base URL and the upload key clock; handlers
//! only translate between HTTP and these two calls.

mod key;

use key::{upload_key, KeyClock};

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::domain::{ObjectDescriptor, UploadRequest};
use crate::storage::{ObjectStore, StorageError};

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct Gallery {
    store: Arc<dyn ObjectStore>,
    base_url: String,
    clock: KeyClock,
}

impl Gallery {
    pub fn new(store: Arc<dyn ObjectStore>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: base_url.into(),
            clock: KeyClock::new(),
        }
    }

    /// Public URL for a key, by plain concatenation
    pub fn public_url(&self, key: &str) -> String {
        format!("{}{}", self.base_url, key)
    }

    /// List the objects under `prefix`, skipping directory placeholders
    #[instrument(skip(self))]
    pub async fn list(&self, prefix: &str) -> Result<Vec<ObjectDescriptor>, GalleryError> {
        let objects = self.store.list_by_prefix(prefix).await?;
        let total = objects.len();
        let total_bytes: i64 = objects.iter().filter_map(|o| o.size).sum();

        let descriptors: Vec<ObjectDescriptor> = objects
            .into_iter()
            .filter(|o| !o.is_directory_placeholder())
            .map(|o| ObjectDescriptor {
                url: self.public_url(&o.key),
                key: o.key,
            })
            .collect();

        debug!(
            total,
            total_bytes,
            returned = descriptors.len(),
            "Listed objects"
        );
        Ok(descriptors)
    }

    /// Store one uploaded file under a fresh `{millis}-{name}` key
    #[instrument(skip(self, request), fields(name = %request.original_name, size = request.size()))]
    pub async fn upload(&self, request: UploadRequest) -> Result<ObjectDescriptor, GalleryError> {
        let key = upload_key(self.clock.next_millis(), &request.original_name);

        self.store
            .put_object(&key, request.bytes, &request.mime_type)
            .await?;

        info!(key = %key, content_type = %request.mime_type, "Stored upload");

        Ok(ObjectDescriptor {
            url: self.public_url(&key),
            key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;
    use bytes::Bytes;

    const BASE: &str = "https://photos.s3.us-east-1.amazonaws.com/";

    fn gallery(store: Arc<MemoryStore>) -> Gallery {
        Gallery::new(store, BASE)
    }

    fn split_key(key: &str) -> (&str, &str) {
        key.split_once('-').expect("key has a timestamp prefix")
    }

    #[tokio::test]
    async fn test_list_skips_placeholders_and_builds_urls() {
        let store = Arc::new(MemoryStore::with_keys(&[
            "images/",
            "images/b.png",
            "images/a.png",
            "images/nested/",
            "images/nested/c.jpg",
            "data/report.csv",
        ]));
        let items = gallery(store).list("images/").await.unwrap();

        let keys: Vec<&str> = items.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["images/a.png", "images/b.png", "images/nested/c.jpg"]);

        for item in &items {
            assert!(!item.key.ends_with('/'));
            assert_eq!(item.url, format!("{}{}", BASE, item.key));
        }
    }

    #[tokio::test]
    async fn test_list_does_not_encode_keys() {
        let store = Arc::new(MemoryStore::with_keys(&["data/my report 2024.csv"]));
        let items = gallery(store).list("data/").await.unwrap();
        assert_eq!(items[0].url, format!("{}data/my report 2024.csv", BASE));
    }

    #[tokio::test]
    async fn test_list_empty_prefix() {
        let store = Arc::new(MemoryStore::with_keys(&["data/"]));
        let items = gallery(store).list("data/").await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_list_propagates_storage_failure() {
        let store = Arc::new(MemoryStore::failing());
        let err = gallery(store.clone()).list("images/").await.unwrap_err();
        assert!(matches!(err, GalleryError::Storage(StorageError::ListFailed(_))));
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_upload_generates_timestamped_key() {
        let store = Arc::new(MemoryStore::new());
        let request = UploadRequest::new(
            "cat.png",
            Some("image/png".to_string()),
            Bytes::from_static(b"\x89PNG"),
        );

        let stored = gallery(store.clone()).upload(request).await.unwrap();

        let (millis, name) = split_key(&stored.key);
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(name, "cat.png");
        assert_eq!(stored.url, format!("{}{}", BASE, stored.key));

        let object = store.get(&stored.key).unwrap();
        assert_eq!(object.content_type, "image/png");
        assert_eq!(&object.bytes[..], b"\x89PNG");
    }

    #[tokio::test]
    async fn test_sequential_uploads_get_distinct_keys() {
        let store = Arc::new(MemoryStore::new());
        let gallery = gallery(store.clone());

        let first = gallery
            .upload(UploadRequest::new("same.txt", None, Bytes::from_static(b"x")))
            .await
            .unwrap();
        let second = gallery
            .upload(UploadRequest::new("same.txt", None, Bytes::from_static(b"x")))
            .await
            .unwrap();

        assert_ne!(first.key, second.key);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_upload_propagates_storage_failure() {
        let store = Arc::new(MemoryStore::failing());
        let result = gallery(store.clone())
            .upload(UploadRequest::new("a.txt", None, Bytes::from_static(b"a")))
            .await;

        assert!(matches!(
            result,
            Err(GalleryError::Storage(StorageError::PutFailed(_)))
        ));
        assert_eq!(store.put_calls(), 1);
    }
}
