//! Request and response bodies for the package endpoints

use serde::{Deserialize, Serialize};

use crate::domain::{PackageConfig, RawPackageConfig};
use crate::infrastructure::services::GenerationOutcome;

/// POST /api/generate-package body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratePackageRequest {
    #[serde(default)]
    pub config: Option<RawPackageConfig>,
}

/// Successful generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePackageResponse {
    pub success: bool,
    pub package_id: String,
    pub download_url: String,
    pub config: PackageConfig,
    pub size: u64,
    pub size_mb: u64,
    pub file_count: usize,
}

impl From<GenerationOutcome> for GeneratePackageResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        let size_mb = outcome.package.size_mb();
        let package = outcome.package;

        Self {
            success: true,
            package_id: package.package_id.to_string(),
            download_url: outcome.download_url,
            config: package.config,
            size: package.size_bytes,
            size_mb,
            file_count: package.file_count,
        }
    }
}

/// GET /api/download query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadQuery {
    #[serde(rename = "packageId", alias = "packageid", alias = "package_id")]
    pub package_id: Option<String>,
}

/// GET /api/check-template failure body
#[derive(Debug, Clone, Serialize)]
pub struct TemplateMissingResponse {
    pub exists: bool,
    pub error: String,
}
