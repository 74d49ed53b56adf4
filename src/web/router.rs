//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Json, Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::dto::{DeleteResponse, FileResponse, UploadForm, UploadResponse};
use super::handlers::{self, delete_file, download_file, list_files, upload_file, AppState};
use super::middleware::create_cors_layer;
use crate::config::WebConfig;

/// Room left in the request body limit for multipart boundaries and the
/// small text fields sent next to the file.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

/// OpenAPI document for the file API.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::file::list_files,
        handlers::file::upload_file,
        handlers::file::download_file,
        handlers::file::delete_file
    ),
    components(schemas(FileResponse, UploadResponse, DeleteResponse, UploadForm)),
    tags((name = "files", description = "File upload, download, listing and deletion"))
)]
pub struct ApiDoc;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, web_config: &WebConfig) -> Router {
    let body_limit: usize = app_state
        .max_upload_size()
        .saturating_add(MULTIPART_OVERHEAD)
        .try_into()
        .unwrap_or(usize::MAX);

    let api_routes = Router::new()
        .route("/files", get(list_files))
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/download/:file_id", get(download_file))
        .route("/delete/:file_id", delete(delete_file))
        .route("/openapi.json", get(openapi_json));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&web_config.cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create a router serving static files, if the directory exists.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    if !Path::new(static_path).is_dir() {
        tracing::warn!("Static directory not found: {}", static_path);
        return None;
    }

    Some(Router::new().fallback_service(ServeDir::new(static_path)))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// OpenAPI document handler.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
