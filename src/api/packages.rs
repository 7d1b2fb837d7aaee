//! Package generation and download endpoints

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use futures::TryStreamExt;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info};

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, DownloadQuery, GeneratePackageRequest, GeneratePackageResponse, Json,
    TemplateMissingResponse,
};
use crate::domain::storage::ZIP_CONTENT_TYPE;
use crate::domain::DomainError;
use crate::infrastructure::storage::Resolution;

pub fn create_package_router() -> Router<AppState> {
    Router::new()
        .route(
            "/generate-package",
            post(generate_package).fallback(method_not_allowed),
        )
        .route("/download", get(download_by_query))
        .route("/download/{package_id}", get(download_by_path))
        .route("/check-template", get(check_template))
}

/// POST /api/generate-package
pub async fn generate_package(
    State(state): State<AppState>,
    Json(request): Json<GeneratePackageRequest>,
) -> Result<Json<GeneratePackageResponse>, ApiError> {
    let raw = request
        .config
        .ok_or_else(|| ApiError::bad_request("Invalid configuration"))?;

    let outcome = state
        .package_service
        .generate(raw)
        .await
        .map_err(|e| state.api_error(e))?;

    Ok(Json(GeneratePackageResponse::from(outcome)))
}

/// GET /api/download?packageId=
pub async fn download_by_query(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let package_id = query
        .package_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Package ID required"))?;

    serve_package(&state, &package_id).await
}

/// GET /api/download/{package_id}
pub async fn download_by_path(
    State(state): State<AppState>,
    Path(package_id): Path<String>,
) -> Result<Response, ApiError> {
    serve_package(&state, &package_id).await
}

async fn serve_package(state: &AppState, package_id: &str) -> Result<Response, ApiError> {
    debug!(package_id = %package_id, "Resolving package");

    let resolution = state
        .package_service
        .resolve(package_id)
        .await
        .map_err(|e| state.api_error(e))?;

    match resolution {
        Resolution::Remote { url, .. } => {
            info!(package_id = %package_id, url = %url, "Redirecting to durable copy");
            Ok(Redirect::temporary(&url).into_response())
        }
        Resolution::Local { path, filename, .. } => {
            let file = File::open(&path).await.map_err(|e| {
                let err = match e.kind() {
                    std::io::ErrorKind::NotFound => {
                        DomainError::not_found(format!("Package '{}' not found", package_id))
                    }
                    _ => DomainError::stream(format!("Failed to open {}: {}", path.display(), e)),
                };
                state.api_error(err)
            })?;

            let size = file
                .metadata()
                .await
                .map_err(|e| state.api_error(DomainError::stream(e.to_string())))?
                .len();

            info!(package_id = %package_id, size_bytes = size, "Serving package");

            let id = package_id.to_string();
            let stream = ReaderStream::new(file).inspect_err(move |e| {
                let err = DomainError::stream(e.to_string());
                error!(package_id = %id, error = %err, "Package stream aborted");
            });

            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, ZIP_CONTENT_TYPE.to_string()),
                    (header::CONTENT_LENGTH, size.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                Body::from_stream(stream),
            )
                .into_response())
        }
    }
}

/// GET /api/check-template
pub async fn check_template(State(state): State<AppState>) -> Response {
    match state.package_service.template_status().await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(TemplateMissingResponse {
                exists: false,
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
