//! Application state for shared services

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::api::types::ApiError;
use crate::config::Environment;
use crate::domain::{DomainError, RawPackageConfig, TemplateStatus};
use crate::infrastructure::services::{GenerationOutcome, PackageService};
use crate::infrastructure::storage::Resolution;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub package_service: Arc<dyn PackageServiceTrait>,
    pub environment: Environment,
}

/// Trait for package service operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PackageServiceTrait: Send + Sync {
    async fn generate(&self, raw: RawPackageConfig) -> Result<GenerationOutcome, DomainError>;
    async fn resolve(&self, package_id: &str) -> Result<Resolution, DomainError>;
    async fn template_status(&self) -> Result<TemplateStatus, DomainError>;
    async fn check_template(&self) -> Result<(), DomainError>;
}

#[async_trait]
impl PackageServiceTrait for PackageService {
    async fn generate(&self, raw: RawPackageConfig) -> Result<GenerationOutcome, DomainError> {
        PackageService::generate(self, raw).await
    }

    async fn resolve(&self, package_id: &str) -> Result<Resolution, DomainError> {
        PackageService::resolve(self, package_id).await
    }

    async fn template_status(&self) -> Result<TemplateStatus, DomainError> {
        PackageService::template_status(self).await
    }

    async fn check_template(&self) -> Result<(), DomainError> {
        PackageService::check_template(self).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(package_service: Arc<dyn PackageServiceTrait>, environment: Environment) -> Self {
        Self {
            package_service,
            environment,
        }
    }

    /// Convert a domain error, exposing details only in development
    pub fn api_error(&self, err: DomainError) -> ApiError {
        ApiError::from_domain(err, self.environment.is_development())
    }
}
