//! Package service - runs one generation end to end and resolves downloads

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use serde::Serialize;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

use crate::domain::archive::{ArchiveBuilder, BuiltArchive, CancellationFlag};
use crate::domain::customization::{format_generation_date, ContentCustomizer};
use crate::domain::package::{
    GeneratedPackage, GenerationStage, PackageConfig, PackageId, PackageIdGenerator,
    RawPackageConfig, UuidGenerator,
};
use crate::domain::template::{TemplateSource, TemplateStatus};
use crate::domain::{DomainError, SubstitutionRule, DEFAULT_RULES};
use crate::infrastructure::storage::{PackageStore, Resolution};

/// Default upper bound for a single generation
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-service generation settings
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub timeout: Duration,
    /// Prefix for self-hosted download links, e.g. `https://host`. Empty for relative links.
    pub public_base_url: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_GENERATION_TIMEOUT,
            public_base_url: String::new(),
        }
    }
}

/// Result of a successful generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub package: GeneratedPackage,
    pub download_url: String,
}

/// Orchestrates scanning, archiving and persistence
pub struct PackageService {
    source: Arc<dyn TemplateSource>,
    builder: Arc<dyn ArchiveBuilder>,
    store: PackageStore,
    ids: Arc<dyn PackageIdGenerator>,
    rules: Arc<[SubstitutionRule]>,
    settings: GenerationSettings,
}

impl std::fmt::Debug for PackageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageService")
            .field("builder", &self.builder)
            .field("store", &self.store)
            .field("ids", &self.ids)
            .field("rules", &self.rules.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl PackageService {
    pub fn new(
        source: Arc<dyn TemplateSource>,
        builder: Arc<dyn ArchiveBuilder>,
        store: PackageStore,
    ) -> Self {
        Self {
            source,
            builder,
            store,
            ids: Arc::new(UuidGenerator),
            rules: DEFAULT_RULES.clone(),
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn PackageIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn store(&self) -> &PackageStore {
        &self.store
    }

    /// Generate a package for an unvalidated config.
    ///
    /// Validation happens before any I/O and the template is checked before an
    /// identifier is drawn. The timeout covers building, persisting and
    /// uploading; a generation that fails or times out leaves no local archive
    /// behind unless it reports an upload failure.
    pub async fn generate(&self, raw: RawPackageConfig) -> Result<GenerationOutcome, DomainError> {
        let config = raw.validate()?;
        self.check_template().await?;

        let id = self.ids.next_id();
        let span = info_span!("generate_package", package_id = %id);
        let cancel = CancellationFlag::new();

        let run = self.run(&id, config, cancel.clone()).instrument(span);
        let result = match tokio::time::timeout(self.settings.timeout, run).await {
            Ok(result) => result,
            Err(_) => {
                cancel.cancel();
                self.store.discard(&id);
                Err(DomainError::archive(format!(
                    "Generation timed out after {}s",
                    self.settings.timeout.as_secs_f64()
                )))
            }
        };

        match &result {
            Ok(outcome) => info!(
                package_id = %id,
                stage = %GenerationStage::Ready,
                size_bytes = outcome.package.size_bytes,
                file_count = outcome.package.file_count,
                "Package ready"
            ),
            Err(DomainError::Upload { message, .. }) => warn!(
                package_id = %id,
                stage = %GenerationStage::Persisted,
                error = %message,
                "Package generated but not durably stored"
            ),
            Err(e) => error!(
                package_id = %id,
                stage = %GenerationStage::Failed,
                error = %e,
                "Package generation failed"
            ),
        }

        result
    }

    async fn run(
        &self,
        id: &PackageId,
        config: PackageConfig,
        cancel: CancellationFlag,
    ) -> Result<GenerationOutcome, DomainError> {
        info!(stage = %GenerationStage::Init, ?config, "Starting package generation");

        let customizer = ContentCustomizer::with_rules(
            self.rules.clone(),
            config.clone(),
            format_generation_date(&Local::now()),
        );
        let built = self.build_archive(customizer, cancel).await?;

        let package = self
            .store
            .persist(id, built, config)
            .await
            .map_err(|e| e.with_download_url(self.local_download_url(id)))?;

        let download_url = match &package.storage.remote_url {
            Some(url) => url.clone(),
            None => self.local_download_url(id),
        };

        Ok(GenerationOutcome {
            package,
            download_url,
        })
    }

    /// Scan and archive on the blocking pool
    async fn build_archive(
        &self,
        customizer: ContentCustomizer,
        cancel: CancellationFlag,
    ) -> Result<BuiltArchive, DomainError> {
        let source = self.source.clone();
        let builder = self.builder.clone();
        let span = Span::current();

        tokio::task::spawn_blocking(move || {
            span.in_scope(|| -> Result<BuiltArchive, DomainError> {
                info!(stage = %GenerationStage::Scanning, "Scanning template");
                let entries = source.scan()?;

                debug!(
                    stage = %GenerationStage::Customizing,
                    customized = entries
                        .iter()
                        .filter(|e| e.is_text && customizer.has_rules_for(e.file_name()))
                        .count(),
                    "Customization rules selected"
                );
                info!(
                    stage = %GenerationStage::Archiving,
                    entries = entries.len(),
                    "Writing archive"
                );

                let built = builder.build(&entries, &customizer, &cancel)?;

                info!(
                    stage = %GenerationStage::Finalizing,
                    size_bytes = built.size_bytes,
                    file_count = built.file_count,
                    "Archive finalized"
                );
                Ok(built)
            })
        })
        .await
        .map_err(|e| DomainError::archive(format!("Archive task failed: {}", e)))?
    }

    fn local_download_url(&self, id: &PackageId) -> String {
        format!(
            "{}/api/download/{}",
            self.settings.public_base_url.trim_end_matches('/'),
            id
        )
    }

    pub async fn resolve(&self, raw_id: &str) -> Result<Resolution, DomainError> {
        self.store.resolve(raw_id).await
    }

    /// Top-level listing of the template root
    pub async fn template_status(&self) -> Result<TemplateStatus, DomainError> {
        let files = self.with_source(|source| source.list_top_level()).await?;
        Ok(TemplateStatus {
            exists: true,
            count: files.len(),
            files,
        })
    }

    pub async fn check_template(&self) -> Result<(), DomainError> {
        self.with_source(|source| source.check()).await
    }

    /// Run a template filesystem call off the async runtime
    async fn with_source<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&dyn TemplateSource) -> Result<T, DomainError> + Send + 'static,
        T: Send + 'static,
    {
        let source = self.source.clone();
        tokio::task::spawn_blocking(move || f(source.as_ref()))
            .await
            .map_err(|e| DomainError::internal(format!("Template task failed: {}", e)))?
    }
}
