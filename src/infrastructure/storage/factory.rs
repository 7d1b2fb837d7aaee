//! Blob store factory for runtime backend selection

use std::sync::Arc;
use std::time::Duration;

use crate::domain::storage::BlobStore;
use crate::domain::DomainError;

use super::http_blob::{HttpBlobStore, HttpBlobStoreConfig};

/// Supported durable storage backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobStoreType {
    /// No durable copy; packages are served from the scratch directory only
    None,
    /// HTTP object storage
    Http,
}

impl BlobStoreType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "" | "none" | "disabled" | "local" => Some(Self::None),
            "http" | "supabase" => Some(Self::Http),
            _ => None,
        }
    }
}

/// Settings needed to build a blob store
#[derive(Debug, Clone, Default)]
pub struct BlobStoreSettings {
    pub backend: String,
    pub base_url: String,
    pub bucket: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

/// Factory for creating blob store instances
pub struct BlobStoreFactory;

impl BlobStoreFactory {
    /// Build the configured store, or `None` when durable storage is disabled
    pub fn create(settings: &BlobStoreSettings) -> Result<Option<Arc<dyn BlobStore>>, DomainError> {
        let backend = BlobStoreType::from_str(&settings.backend).ok_or_else(|| {
            DomainError::configuration(format!(
                "Unknown blob store backend '{}'",
                settings.backend
            ))
        })?;

        match backend {
            BlobStoreType::None => Ok(None),
            BlobStoreType::Http => {
                if settings.api_key.is_empty() {
                    return Err(DomainError::configuration(
                        "Blob store api_key is required for the http backend",
                    ));
                }

                let mut config = HttpBlobStoreConfig::new(
                    &settings.base_url,
                    &settings.bucket,
                    &settings.api_key,
                );
                if settings.timeout_secs > 0 {
                    config = config.with_timeout(Duration::from_secs(settings.timeout_secs));
                }

                Ok(Some(Arc::new(HttpBlobStore::new(config)?)))
            }
        }
    }
}
