//! Package domain - configuration, identifiers and generation results

mod config;
mod entity;
pub mod id;

pub use config::{PackageConfig, RawPackageConfig, DEFAULT_ALGORITHM};
pub use entity::{
    validate_package_id, GeneratedPackage, GenerationStage, PackageId, StorageLocation,
    UploadStatus,
};
pub use id::{PackageIdGenerator, UuidGenerator};
