//! Client configuration

/// Configuration for the catalog backend API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "http://localhost:5000")
    pub base_url: String,

    /// Bearer token attached to authenticated requests
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new configuration with defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout: 30,
        }
    }

    /// Read the configuration from the environment
    ///
    /// `CATALOG_API_URL` (default "http://localhost:5000") and
    /// `CATALOG_API_TOKEN` (optional).
    pub fn from_env() -> Self {
        let base_url = std::env::var("CATALOG_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());
        let mut config = Self::new(base_url);
        if let Ok(token) = std::env::var("CATALOG_API_TOKEN") {
            config.token = Some(token);
        }
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}

/// Configuration for the blob store (one fixed bucket)
///
/// Credentials are not held here; they flow through the AWS default
/// provider chain (environment-supplied access key / secret key).
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,

    /// Public endpoint the asset URL is synthesized from; the store
    /// itself never returns a URL
    pub public_base_url: String,
}

impl StorageConfig {
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        let bucket: String = bucket.into();
        let public_base_url = format!("https://{bucket}.s3.amazonaws.com");
        Self {
            bucket,
            region: region.into(),
            public_base_url,
        }
    }

    /// Read the configuration from the environment
    ///
    /// `CATALOG_S3_BUCKET` (default "catalog-console-assets") and
    /// `CATALOG_S3_REGION` (default "us-east-1").
    pub fn from_env() -> Self {
        let bucket = std::env::var("CATALOG_S3_BUCKET")
            .unwrap_or_else(|_| "catalog-console-assets".to_string());
        let region =
            std::env::var("CATALOG_S3_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        Self::new(bucket, region)
    }

    /// Override the public endpoint template
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.public_base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed() {
        let config = ClientConfig::new("http://localhost:5000/");
        assert_eq!(config.base_url, "http://localhost:5000");
    }

    #[test]
    fn storage_url_template_follows_bucket() {
        let config = StorageConfig::new("catalog-console-assets", "us-east-1");
        assert_eq!(
            config.public_base_url,
            "https://catalog-console-assets.s3.amazonaws.com"
        );
    }
}
