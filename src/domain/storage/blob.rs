//! Durable blob store port

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Content type used for stored package archives
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Put/get-by-key access to an external object store
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores an object, overwriting any existing object with the same key
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), DomainError>;

    /// Checks whether an object exists
    async fn exists(&self, key: &str) -> Result<bool, DomainError>;

    /// Publicly fetchable URL for a key
    fn public_url(&self, key: &str) -> String;
}
