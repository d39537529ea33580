//! Amazon S3 implementation of [`ObjectStore`]
//!
//! Works against AWS itself and, with `endpoint_url` set, against
//! S3-compatible services (MinIO, Cloudflare R2, ...), which need path-style
//! addressing.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    Client as S3Client,
    config::{Builder, Credentials, Region},
    primitives::ByteStream,
    types::Object,
};
use bytes::Bytes;
use tracing::{debug, info, instrument};

use crate::config::StorageSettings;
use crate::domain::StoredObject;
use super::{ObjectStore, StorageError};

/// S3 bucket client shared by all request handlers
#[derive(Clone)]
pub struct S3Store {
    client: S3Client,
    bucket: String,
    max_pages: u32,
}

impl S3Store {
    /// Create a new S3 client from settings
    pub async fn connect(settings: &StorageSettings) -> Result<Self, StorageError> {
        if settings.bucket_name.is_empty() {
            return Err(StorageError::NotConfigured("bucket name is empty".to_string()));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()));

        if settings.has_static_credentials() {
            let credentials = Credentials::new(
                &settings.access_key_id,
                &settings.secret_access_key,
                None, // session token
                None, // expiry
                "gateway-static-credentials",
            );
            loader = loader.credentials_provider(credentials);
        } else {
            debug!("No static credentials configured, using the default provider chain");
        }

        let shared = loader.load().await;
        let mut builder = Builder::from(&shared);

        if let Some(endpoint) = settings.endpoint_url.as_deref() {
            debug!("Using custom S3 endpoint: {}", endpoint);
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        info!(
            bucket = %settings.bucket_name,
            region = %settings.region,
            "S3 client initialized"
        );

        Ok(Self {
            client: S3Client::from_conf(builder.build()),
            bucket: settings.bucket_name.clone(),
            max_pages: settings.max_list_pages.max(1),
        })
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<StoredObject>, StorageError> {
        debug!("Listing S3 objects with prefix: {}", prefix);

        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;
        let mut pages: u32 = 0;

        loop {
            let mut request = self.client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);

            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }

            let result = request
                .send()
                .await
                .map_err(|e| StorageError::ListFailed(format!("{:?}", e)))?;
            pages += 1;

            if let Some(contents) = result.contents {
                objects.extend(contents.into_iter().filter_map(stored_object));
            }

            continuation_token = next_page_token(
                result.is_truncated,
                result.next_continuation_token,
                pages,
                self.max_pages,
            );
            if continuation_token.is_none() {
                break;
            }
        }

        debug!("Listed {} objects with prefix: {} ({} pages)", objects.len(), prefix, pages);
        Ok(objects)
    }

    #[instrument(skip(self, bytes), fields(bucket = %self.bucket, size = bytes.len()))]
    async fn put_object(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::PutFailed(format!("{:?}", e)))?;

        info!("Uploaded to S3: {} ({} bytes)", key, size);
        Ok(())
    }
}

/// Token for the next listing request, or `None` once S3 reports the last
/// page or the page budget is spent
fn next_page_token(
    is_truncated: Option<bool>,
    token: Option<String>,
    pages: u32,
    max_pages: u32,
) -> Option<String> {
    if !is_truncated.unwrap_or(false) || pages >= max_pages {
        return None;
    }
    token
}

/// Convert an SDK listing entry, dropping entries without a key
fn stored_object(object: Object) -> Option<StoredObject> {
    let size = object.size();
    object.key.map(|key| StoredObject { key, size })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_object_conversion() {
        let object = Object::builder()
            .key("images/cat.png")
            .size(1024)
            .build();

        let stored = stored_object(object).unwrap();
        assert_eq!(stored.key, "images/cat.png");
        assert_eq!(stored.size, Some(1024));
    }

    #[test]
    fn test_next_page_token_stops_on_last_page() {
        assert_eq!(next_page_token(Some(false), Some("t".to_string()), 1, 5), None);
        assert_eq!(next_page_token(None, Some("t".to_string()), 1, 5), None);
    }

    #[test]
    fn test_next_page_token_respects_page_budget() {
        // Default budget of one page never follows the token
        assert_eq!(next_page_token(Some(true), Some("t".to_string()), 1, 1), None);
        assert_eq!(
            next_page_token(Some(true), Some("t2".to_string()), 2, 3),
            Some("t2".to_string())
        );
        assert_eq!(next_page_token(Some(true), Some("t3".to_string()), 3, 3), None);
    }

    #[test]
    fn test_next_page_token_needs_a_token() {
        assert_eq!(next_page_token(Some(true), None, 1, 5), None);
    }

    #[test]
    fn test_stored_object_without_key_is_dropped() {
        let object = Object::builder().size(10).build();
        assert!(stored_object(object).is_none());
    }
}
