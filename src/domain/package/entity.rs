//! Package domain entities

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::config::PackageConfig;
use crate::domain::DomainError;

/// Regex pattern for valid package IDs: a lowercase hyphenated UUID
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$").unwrap()
});

/// Validated package identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageId(String);

impl PackageId {
    /// Create a new validated package ID
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        validate_package_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a new random package ID
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PackageId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PackageId> for String {
    fn from(id: PackageId) -> Self {
        id.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PackageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate a package ID string
pub fn validate_package_id(id: &str) -> Result<(), DomainError> {
    if id.is_empty() {
        return Err(DomainError::config_invalid("Package ID cannot be empty"));
    }

    if !ID_PATTERN.is_match(id) {
        return Err(DomainError::not_found(format!(
            "Package '{}' not found",
            id
        )));
    }

    Ok(())
}

/// Outcome of the optional durable upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// No durable store is configured
    Disabled,
    /// Stored durably and publicly fetchable
    Uploaded,
}

/// Where a generated package can be fetched from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocation {
    /// Scratch file, absent once removed after a durable upload
    pub local_path: Option<PathBuf>,
    pub remote_url: Option<String>,
    pub upload: UploadStatus,
}

impl StorageLocation {
    pub fn local(path: PathBuf) -> Self {
        Self {
            local_path: Some(path),
            remote_url: None,
            upload: UploadStatus::Disabled,
        }
    }
}

/// A completed generation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPackage {
    pub package_id: PackageId,
    pub size_bytes: u64,
    pub file_count: usize,
    pub config: PackageConfig,
    pub storage: StorageLocation,
    pub created_at: DateTime<Utc>,
}

impl GeneratedPackage {
    /// Size in whole megabytes, rounded to nearest
    pub fn size_mb(&self) -> u64 {
        (self.size_bytes + 512 * 1024) / (1024 * 1024)
    }
}

/// Stages of a single generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    Init,
    Scanning,
    Customizing,
    Archiving,
    Finalizing,
    Persisted,
    Uploaded,
    Ready,
    Failed,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::Scanning => "scanning",
            Self::Customizing => "customizing",
            Self::Archiving => "archiving",
            Self::Finalizing => "finalizing",
            Self::Persisted => "persisted",
            Self::Uploaded => "uploaded",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
