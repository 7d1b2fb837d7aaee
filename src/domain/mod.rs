//! Domain layer - Core pipeline types and ports

pub mod archive;
pub mod customization;
pub mod error;
pub mod package;
pub mod storage;
pub mod template;

pub use archive::{ArchiveBuilder, BuiltArchive, CancellationFlag};
pub use customization::{
    ContentCustomizer, FileSelector, RenderContext, ReplaceMode, Replacement, SubstitutionRule,
    DEFAULT_RULES,
};
pub use error::DomainError;
pub use package::{
    GeneratedPackage, GenerationStage, PackageConfig, PackageId, PackageIdGenerator,
    RawPackageConfig, StorageLocation, UploadStatus, UuidGenerator,
};
pub use storage::BlobStore;
pub use template::{TemplateEntry, TemplateSource, TemplateStatus};
