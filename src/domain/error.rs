use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    #[error("Template missing: {message}")]
    TemplateMissing { message: String },

    #[error("Archive error: {message}")]
    Archive { message: String },

    #[error("Upload failed for package {package_id}: {message}")]
    Upload {
        package_id: String,
        message: String,
        /// Link to the local copy that is still served
        download_url: Option<String>,
    },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Stream error: {message}")]
    Stream { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }

    pub fn template_missing(message: impl Into<String>) -> Self {
        Self::TemplateMissing {
            message: message.into(),
        }
    }

    pub fn archive(message: impl Into<String>) -> Self {
        Self::Archive {
            message: message.into(),
        }
    }

    pub fn upload(package_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upload {
            package_id: package_id.into(),
            message: message.into(),
            download_url: None,
        }
    }

    /// Attach the local download link to an upload failure
    pub fn with_download_url(self, url: impl Into<String>) -> Self {
        match self {
            Self::Upload {
                package_id,
                message,
                ..
            } => Self::Upload {
                package_id,
                message,
                download_url: Some(url.into()),
            },
            other => other,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_invalid_error() {
        let error = DomainError::config_invalid("mazeRooms is required");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: mazeRooms is required"
        );
    }

    #[test]
    fn test_upload_error_carries_package_id() {
        let error = DomainError::upload("abc", "bucket unavailable");
        assert_eq!(
            error.to_string(),
            "Upload failed for package abc: bucket unavailable"
        );
        assert!(matches!(
            error,
            DomainError::Upload {
                download_url: None,
                ..
            }
        ));
    }

    #[test]
    fn test_download_url_only_attaches_to_upload() {
        let error = DomainError::upload("abc", "HTTP 503").with_download_url("/api/download/abc");
        assert!(matches!(
            error,
            DomainError::Upload { download_url: Some(ref url), .. } if url == "/api/download/abc"
        ));

        let archive = DomainError::archive("disk full").with_download_url("/api/download/abc");
        assert!(matches!(archive, DomainError::Archive { .. }));
    }

    #[test]
    fn test_archive_and_upload_are_distinct() {
        let archive = DomainError::archive("disk full");
        let upload = DomainError::upload("abc", "disk full");

        assert!(matches!(archive, DomainError::Archive { .. }));
        assert!(matches!(upload, DomainError::Upload { .. }));
    }

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Package 'x' not found");
        assert_eq!(error.to_string(), "Not found: Package 'x' not found");
    }
}
