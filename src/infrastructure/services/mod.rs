//! Infrastructure services

mod package_service;

pub use package_service::{
    GenerationOutcome, GenerationSettings, PackageService, DEFAULT_GENERATION_TIMEOUT,
};
