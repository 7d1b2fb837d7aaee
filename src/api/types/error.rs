//! HTTP error type with `{ error, details? }` body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;

/// Error response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Set when a package was built but could not be stored durably
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: message.into(),
                ..Default::default()
            },
        }
    }

    /// Attach diagnostic details
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.response.details = Some(details.into());
        self
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Map a domain error, exposing server-side detail only when asked to.
    ///
    /// Server errors are always logged in full.
    pub fn from_domain(err: DomainError, expose_details: bool) -> Self {
        let summary = match &err {
            DomainError::ConfigInvalid { message } => return Self::bad_request(message),
            DomainError::NotFound { message } => return Self::not_found(message),
            DomainError::TemplateMissing { .. } => "Template directory not found on server",
            DomainError::Archive { .. } => "Archive error",
            DomainError::Upload { .. } => "Upload failed",
            DomainError::Stream { .. } => "Download failed",
            DomainError::Configuration { .. } | DomainError::Internal { .. } => {
                "Internal server error"
            }
        };

        error!(error = %err, "Request failed");

        let mut api_error = Self::internal(summary);
        if let DomainError::Upload {
            package_id,
            download_url,
            ..
        } = &err
        {
            api_error.response.download_url = Some(
                download_url
                    .clone()
                    .unwrap_or_else(|| format!("/api/download/{}", package_id)),
            );
            api_error.response.package_id = Some(package_id.clone());
        }

        if expose_details {
            api_error.with_details(detail_message(&err))
        } else {
            api_error
        }
    }
}

fn detail_message(err: &DomainError) -> String {
    match err {
        DomainError::Upload {
            package_id,
            message,
            ..
        } => format!("{} (package {} is still available locally)", message, package_id),
        other => other.to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::from_domain(err, false)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.response.error)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Package ID required");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error, "Package ID required");
        assert!(err.response.details.is_none());
    }

    #[test]
    fn test_client_errors_keep_message() {
        let api_err: ApiError = DomainError::config_invalid("trainingSteps is required").into();
        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_err.response.error, "trainingSteps is required");

        let api_err: ApiError = DomainError::not_found("Package 'x' not found").into();
        assert_eq!(api_err.status, StatusCode::NOT_FOUND);
        assert_eq!(api_err.response.error, "Package 'x' not found");
    }

    #[test]
    fn test_server_errors_hide_details_by_default() {
        let api_err: ApiError = DomainError::archive("Failed to read /srv/x: EIO").into();

        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.response.error, "Archive error");
        assert!(api_err.response.details.is_none());
    }

    #[test]
    fn test_server_errors_expose_details_when_asked() {
        let api_err = ApiError::from_domain(DomainError::template_missing("no such dir"), true);

        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.response.error, "Template directory not found on server");
        assert!(api_err.response.details.unwrap().contains("no such dir"));
    }

    #[test]
    fn test_upload_details_name_package() {
        let api_err = ApiError::from_domain(DomainError::upload("abc", "HTTP 503"), true);

        assert_eq!(api_err.response.error, "Upload failed");
        let details = api_err.response.details.unwrap();
        assert!(details.contains("HTTP 503"));
        assert!(details.contains("abc"));
    }

    #[test]
    fn test_upload_failure_always_names_local_copy() {
        let api_err = ApiError::from_domain(
            DomainError::upload("abc", "HTTP 503")
                .with_download_url("https://host/api/download/abc"),
            false,
        );

        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(api_err.response.details.is_none());
        assert_eq!(
            serde_json::to_value(&api_err.response).unwrap(),
            serde_json::json!({
                "error": "Upload failed",
                "packageId": "abc",
                "downloadUrl": "https://host/api/download/abc"
            })
        );

        let api_err: ApiError = DomainError::upload("abc", "HTTP 503").into();
        assert_eq!(
            api_err.response.download_url.as_deref(),
            Some("/api/download/abc")
        );
    }

    #[test]
    fn test_error_serialization() {
        let json = serde_json::to_value(&ApiError::internal("Archive error").response).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Archive error"}));

        let json = serde_json::to_value(
            &ApiError::internal("Archive error")
                .with_details("disk full")
                .response,
        )
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "Archive error", "details": "disk full"})
        );
    }
}
