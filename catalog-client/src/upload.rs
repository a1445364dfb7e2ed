//! Upload gateway - direct-to-bucket asset storage
//!
//! Wraps a single put-object call against one fixed bucket and
//! synthesizes the public URL client-side; the store never returns
//! one. Keys are content-addressed (sha256 of the payload), so two
//! uploads of same-named files cannot overwrite each other.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::{ClientError, ClientResult, StorageConfig};

/// Media types accepted for upload
pub const ALLOWED_MEDIA_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "application/pdf",
    "video/mp4",
    "video/quicktime",
    "audio/mpeg",
    "audio/wav",
];

/// A file picked for upload
#[derive(Debug, Clone)]
pub struct AssetFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AssetFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn media_type_allowed(&self) -> bool {
        ALLOWED_MEDIA_TYPES.contains(&self.content_type.as_str())
    }
}

/// Blob-store seam; [`S3Store`] is the real one
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn put_object(&self, key: &str, content_type: &str, bytes: Vec<u8>)
    -> ClientResult<()>;
}

/// S3-backed store for one fixed bucket
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    /// Build the store from the AWS default provider chain
    /// (environment-supplied credentials) with the configured region.
    pub async fn new(config: &StorageConfig) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;
        Self {
            client: aws_sdk_s3::Client::new(&aws_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl AssetStore for S3Store {
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(bytes.into())
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(key = %key, error = %e, "S3 upload failed");
                ClientError::Upload(e.to_string())
            })?;
        Ok(())
    }
}

/// Upload gateway
#[derive(Clone)]
pub struct UploadGateway {
    store: Arc<dyn AssetStore>,
    config: StorageConfig,
}

impl UploadGateway {
    pub async fn new(config: StorageConfig) -> Self {
        let store = Arc::new(S3Store::new(&config).await);
        Self { store, config }
    }

    /// Build a gateway over any store (tests use an in-memory one)
    pub fn with_store(store: Arc<dyn AssetStore>, config: StorageConfig) -> Self {
        Self { store, config }
    }

    /// Upload one asset and return its public URL
    ///
    /// A payload outside [`ALLOWED_MEDIA_TYPES`] is skipped with a
    /// warning and `Ok(None)`; no error reaches the caller. Upload
    /// failures surface as [`ClientError::Upload`] and are never
    /// retried here.
    pub async fn upload(&self, file: AssetFile) -> ClientResult<Option<String>> {
        if !file.media_type_allowed() {
            tracing::warn!(
                file = %file.file_name,
                content_type = %file.content_type,
                "unsupported media type, upload skipped"
            );
            return Ok(None);
        }

        let key = object_key(&file);
        let content_type = file.content_type.clone();
        self.store.put_object(&key, &content_type, file.bytes).await?;

        let url = format!(
            "{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            key
        );
        tracing::info!(key = %key, "asset uploaded");
        Ok(Some(url))
    }
}

/// Content-addressed object key, original extension preserved
fn object_key(file: &AssetFile) -> String {
    let mut hasher = Sha256::new();
    hasher.update(&file.bytes);
    let hash = hex::encode(hasher.finalize());

    let ext = Path::new(&file.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext {
        Some(ext) if !ext.is_empty() => format!("assets/{hash}.{ext}"),
        _ => format!("assets/{hash}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_accepts_known_types_only() {
        assert!(AssetFile::new("a.png", "image/png", vec![]).media_type_allowed());
        assert!(AssetFile::new("a.pdf", "application/pdf", vec![]).media_type_allowed());
        assert!(AssetFile::new("a.wav", "audio/wav", vec![]).media_type_allowed());
        assert!(!AssetFile::new("a.gif", "image/gif", vec![]).media_type_allowed());
        assert!(!AssetFile::new("a.svg", "image/svg+xml", vec![]).media_type_allowed());
    }

    #[test]
    fn key_is_content_addressed() {
        let a = AssetFile::new("pen.PNG", "image/png", vec![1, 2, 3]);
        let b = AssetFile::new("other-name.png", "image/png", vec![1, 2, 3]);
        let c = AssetFile::new("pen.png", "image/png", vec![4, 5, 6]);

        // Same bytes, same key, regardless of name; case-folded extension.
        assert_eq!(object_key(&a), object_key(&b));
        assert!(object_key(&a).starts_with("assets/"));
        assert!(object_key(&a).ends_with(".png"));
        assert_ne!(object_key(&a), object_key(&c));
    }

    #[test]
    fn key_without_extension() {
        let file = AssetFile::new("README", "application/pdf", vec![9]);
        let key = object_key(&file);
        assert!(key.starts_with("assets/"));
        assert!(!key.contains('.'));
    }
}
