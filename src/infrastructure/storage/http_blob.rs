//! HTTP object storage backend
//!
//! Speaks the storage REST dialect used by Supabase-style object stores:
//! uploads go to `/storage/v1/object/{bucket}/{key}` and public objects are
//! served from `/storage/v1/object/public/{bucket}/{key}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::domain::storage::BlobStore;
use crate::domain::DomainError;

/// HTTP blob store configuration
#[derive(Debug, Clone)]
pub struct HttpBlobStoreConfig {
    pub base_url: String,
    pub bucket: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl HttpBlobStoreConfig {
    pub fn new(
        base_url: impl Into<String>,
        bucket: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            bucket: bucket.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    client: Client,
    base_url: String,
    bucket: String,
    api_key: String,
}

impl HttpBlobStore {
    pub fn new(config: HttpBlobStoreConfig) -> Result<Self, DomainError> {
        if config.base_url.trim().is_empty() {
            return Err(DomainError::configuration("Blob store base_url is required"));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bucket: config.bucket,
            api_key: config.api_key,
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key)
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), DomainError> {
        let response = self
            .client
            .post(self.object_url(key))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| DomainError::internal(format!("Upload request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::internal(format!(
                "Upload rejected with HTTP {}: {}",
                status, error_body
            )));
        }

        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        let response = self
            .client
            .head(self.public_url(key))
            .send()
            .await
            .map_err(|e| DomainError::internal(format!("Existence check failed: {}", e)))?;

        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Ok(false),
            s => Err(DomainError::internal(format!(
                "Existence check returned HTTP {}",
                s
            ))),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> HttpBlobStore {
        HttpBlobStore::new(HttpBlobStoreConfig::new(
            format!("{}/", server.uri()),
            "packages",
            "service-key",
        ))
        .unwrap()
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let err = HttpBlobStore::new(HttpBlobStoreConfig::new(" ", "packages", "k")).unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[test]
    fn test_public_url_format() {
        let store = HttpBlobStore::new(HttpBlobStoreConfig::new(
            "https://example.supabase.co/",
            "packages",
            "k",
        ))
        .unwrap();

        assert_eq!(
            store.public_url("RLMazeTrainer_abc.zip"),
            "https://example.supabase.co/storage/v1/object/public/packages/RLMazeTrainer_abc.zip"
        );
    }

    #[tokio::test]
    async fn test_put_uploads_with_upsert() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/storage/v1/object/packages/RLMazeTrainer_abc.zip"))
            .and(header("authorization", "Bearer service-key"))
            .and(header("x-upsert", "true"))
            .and(header("content-type", "application/zip"))
            .and(body_bytes(b"PK\x03\x04".to_vec()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        store(&server)
            .put("RLMazeTrainer_abc.zip", b"PK\x03\x04".to_vec(), "application/zip")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_put_failure_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("bucket policy"))
            .mount(&server)
            .await;

        let err = store(&server)
            .put("k.zip", vec![1, 2, 3], "application/zip")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("bucket policy"));
    }

    #[tokio::test]
    async fn test_exists() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/storage/v1/object/public/packages/present.zip"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/storage/v1/object/public/packages/absent.zip"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/storage/v1/object/public/packages/broken.zip"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let store = store(&server);
        assert!(store.exists("present.zip").await.unwrap());
        assert!(!store.exists("absent.zip").await.unwrap());
        assert!(store.exists("broken.zip").await.is_err());
    }
}
