//! Package store and delivery resolution
//!
//! Finished archives are committed to `<scratch_dir>/<packageId>.zip`. When a
//! durable store is configured the archive is also uploaded as
//! `<prefix>_<packageId>.zip`. Resolution prefers the local copy and falls
//! back to the durable one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::archive::BuiltArchive;
use crate::domain::package::{
    GeneratedPackage, GenerationStage, PackageConfig, PackageId, StorageLocation, UploadStatus,
};
use crate::domain::storage::{BlobStore, ZIP_CONTENT_TYPE};
use crate::domain::DomainError;

/// Where a requested package can be read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Local {
        path: PathBuf,
        size_bytes: u64,
        filename: String,
    },
    Remote {
        url: String,
        filename: String,
    },
}

impl Resolution {
    pub fn filename(&self) -> &str {
        match self {
            Self::Local { filename, .. } | Self::Remote { filename, .. } => filename,
        }
    }
}

#[derive(Clone)]
pub struct PackageStore {
    scratch_dir: PathBuf,
    product_prefix: String,
    blob_store: Option<Arc<dyn BlobStore>>,
    keep_local_after_upload: bool,
}

impl std::fmt::Debug for PackageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageStore")
            .field("scratch_dir", &self.scratch_dir)
            .field("product_prefix", &self.product_prefix)
            .field("durable", &self.blob_store.is_some())
            .field("keep_local_after_upload", &self.keep_local_after_upload)
            .finish()
    }
}

impl PackageStore {
    pub fn new(scratch_dir: impl Into<PathBuf>, product_prefix: impl Into<String>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            product_prefix: product_prefix.into(),
            blob_store: None,
            keep_local_after_upload: true,
        }
    }

    pub fn with_blob_store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.blob_store = Some(store);
        self
    }

    pub fn with_optional_blob_store(mut self, store: Option<Arc<dyn BlobStore>>) -> Self {
        self.blob_store = store;
        self
    }

    pub fn with_keep_local_after_upload(mut self, keep: bool) -> Self {
        self.keep_local_after_upload = keep;
        self
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    pub fn is_durable(&self) -> bool {
        self.blob_store.is_some()
    }

    pub fn local_path(&self, id: &PackageId) -> PathBuf {
        self.scratch_dir.join(format!("{}.zip", id))
    }

    /// Name used for downloads and for the durable object key
    pub fn download_filename(&self, id: &PackageId) -> String {
        format!("{}_{}.zip", self.product_prefix, id)
    }

    /// Commit a built archive under its identifier and upload it if durable
    /// storage is configured.
    ///
    /// An upload failure leaves the local artifact in place and is reported
    /// as [`DomainError::Upload`].
    pub async fn persist(
        &self,
        id: &PackageId,
        built: BuiltArchive,
        config: PackageConfig,
    ) -> Result<GeneratedPackage, DomainError> {
        let size_bytes = built.size_bytes;
        let file_count = built.file_count;
        let local_path = built.persist(&self.local_path(id))?;

        info!(
            package_id = %id,
            stage = %GenerationStage::Persisted,
            path = %local_path.display(),
            size_bytes,
            "Package persisted locally"
        );

        let mut package = GeneratedPackage {
            package_id: id.clone(),
            size_bytes,
            file_count,
            config,
            storage: StorageLocation::local(local_path.clone()),
            created_at: Utc::now(),
        };

        let Some(blob_store) = &self.blob_store else {
            return Ok(package);
        };

        let key = self.download_filename(id);
        let body = tokio::fs::read(&local_path)
            .await
            .map_err(|e| DomainError::upload(id.as_str(), format!("Failed to read archive: {}", e)))?;

        blob_store
            .put(&key, body, ZIP_CONTENT_TYPE)
            .await
            .map_err(|e| DomainError::upload(id.as_str(), e.to_string()))?;

        package.storage.remote_url = Some(blob_store.public_url(&key));
        package.storage.upload = UploadStatus::Uploaded;

        info!(
            package_id = %id,
            stage = %GenerationStage::Uploaded,
            key = %key,
            "Package uploaded to durable store"
        );

        if !self.keep_local_after_upload {
            package.storage.local_path = None;
            spawn_cleanup(local_path);
        }

        Ok(package)
    }

    /// Drop the local artifact of a generation that will not be reported
    pub fn discard(&self, id: &PackageId) {
        spawn_cleanup(self.local_path(id));
    }

    /// Resolve an identifier to a readable artifact.
    ///
    /// The identifier is validated before any filesystem access and no file
    /// handle is opened here.
    pub async fn resolve(&self, raw_id: &str) -> Result<Resolution, DomainError> {
        let id = PackageId::new(raw_id)?;
        let path = self.local_path(&id);
        let filename = self.download_filename(&id);

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                debug!(package_id = %id, "Resolved package locally");
                return Ok(Resolution::Local {
                    path,
                    size_bytes: meta.len(),
                    filename,
                });
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(DomainError::internal(format!(
                    "Failed to stat package {}: {}",
                    id, e
                )));
            }
        }

        if let Some(blob_store) = &self.blob_store {
            if blob_store.exists(&filename).await? {
                debug!(package_id = %id, "Resolved package in durable store");
                return Ok(Resolution::Remote {
                    url: blob_store.public_url(&filename),
                    filename,
                });
            }
        }

        Err(DomainError::not_found(format!("Package '{}' not found", id)))
    }
}

/// Remove a scratch file without blocking the caller. Errors are only logged.
pub fn spawn_cleanup(path: PathBuf) {
    tokio::spawn(async move {
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "Removed scratch artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove scratch artifact"),
        }
    });
}
