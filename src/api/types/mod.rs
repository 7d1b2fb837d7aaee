//! Wire types for the HTTP API

pub mod error;
pub mod json;
pub mod package;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use package::{
    DownloadQuery, GeneratePackageRequest, GeneratePackageResponse, TemplateMissingResponse,
};
