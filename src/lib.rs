//! Maze Package Gateway
//!
//! Builds personalized copies of a training template as zip packages:
//! - Template tree scanning with excluded directories
//! - Rule-driven customization of text files
//! - Streamed zip archives persisted under a fresh package ID
//! - Optional durable copies in HTTP object storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use api::state::AppState;
use infrastructure::archive::ZipArchiveBuilder;
use infrastructure::services::{GenerationSettings, PackageService};
use infrastructure::storage::{BlobStoreFactory, BlobStoreSettings, PackageStore};
use infrastructure::template::FsTemplateSource;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let package_service = create_package_service(config).await?;

    Ok(AppState::new(Arc::new(package_service), config.environment))
}

/// Wire the template source, archive builder and package store from config
pub async fn create_package_service(config: &AppConfig) -> anyhow::Result<PackageService> {
    let package = &config.package;

    tokio::fs::create_dir_all(&package.scratch_dir)
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to create scratch directory {}: {}",
                package.scratch_dir.display(),
                e
            )
        })?;

    let blob_store = BlobStoreFactory::create(&BlobStoreSettings {
        backend: config.blob_store.backend.clone(),
        base_url: config.blob_store.base_url.clone(),
        bucket: config.blob_store.bucket.clone(),
        api_key: config.blob_store.api_key.clone(),
        timeout_secs: config.blob_store.timeout_secs,
    })?;

    info!(
        template_dir = %package.template_dir.display(),
        scratch_dir = %package.scratch_dir.display(),
        durable = blob_store.is_some(),
        "Package pipeline configured"
    );

    let store = PackageStore::new(&package.scratch_dir, &package.product_prefix)
        .with_optional_blob_store(blob_store)
        .with_keep_local_after_upload(package.keep_local_after_upload);

    let settings = GenerationSettings {
        timeout: Duration::from_secs(package.generation_timeout_secs.max(1)),
        public_base_url: package.public_base_url.clone(),
    };

    let service = PackageService::new(
        Arc::new(FsTemplateSource::new(&package.template_dir)),
        Arc::new(ZipArchiveBuilder::new(&package.scratch_dir)),
        store,
    )
    .with_settings(settings);

    if let Err(e) = service.check_template().await {
        warn!(error = %e, "Template directory is not available yet");
    }

    Ok(service)
}
