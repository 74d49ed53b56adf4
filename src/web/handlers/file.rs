//! File handlers for Web API.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use std::io;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::file::{FileRecord, FileService, UploadRequest};
use crate::web::dto::{DeleteResponse, FileResponse, UploadForm, UploadResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::{FilebinError, Result};

/// Generate a safe Content-Disposition header value for file downloads.
///
/// Control characters are dropped, quotes and backslashes are replaced in
/// the plain `filename` parameter, and non-ASCII names additionally get an
/// RFC 5987 `filename*` parameter.
fn content_disposition_header(filename: &str) -> String {
    let needs_encoding = !filename.is_ascii()
        || filename
            .chars()
            .any(|c| c.is_control() || c == '"' || c == '\\');

    if !needs_encoding {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();
    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// Content-Type for a download: the stored type when it is a valid header
/// value, otherwise a guess from the original name.
fn download_content_type(record: &FileRecord) -> HeaderValue {
    if !record.mime_type.is_empty() {
        if let Ok(value) = HeaderValue::from_str(&record.mime_type) {
            return value;
        }
    }

    let guessed = mime_guess::from_path(&record.name).first_or_octet_stream();
    HeaderValue::from_str(guessed.as_ref())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"))
}

/// Run a blocking file service operation on the blocking thread pool.
async fn run_blocking<T, F>(state: &AppState, op: F) -> Result<T>
where
    F: FnOnce(&FileService) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let files = state.files.clone();
    tokio::task::spawn_blocking(move || op(&files))
        .await
        .map_err(|e| FilebinError::Internal(format!("blocking task failed: {e}")))?
}

fn too_large_message(max_size: u64) -> String {
    format!("File too large (max {}MB)", max_size / 1024 / 1024)
}

fn multipart_error(err: MultipartError, max_size: u64) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(too_large_message(max_size))
    } else {
        tracing::warn!("Failed to read multipart data: {}", err);
        ApiError::bad_request("Invalid multipart data")
    }
}

/// The `file` part of an upload.
struct FilePart {
    filename: String,
    content_type: Option<String>,
    content: Vec<u8>,
}

/// GET /api/files - List all stored files.
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    responses(
        (status = 200, description = "All stored files in upload order", body = Vec<FileResponse>)
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Vec<FileResponse>>, ApiError> {
    let files = run_blocking(&state, |files| files.list())
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to list files"))?;

    Ok(Json(files.into_iter().map(FileResponse::from).collect()))
}

/// POST /api/upload - Upload a file.
///
/// Request body: multipart/form-data with a "file" part and optional
/// "originalName" and "uploader" fields.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "files",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded", body = UploadResponse),
        (status = 400, description = "No file part or malformed form"),
        (status = 413, description = "File too large"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> std::result::Result<Json<UploadResponse>, ApiError> {
    let max_size = state.max_upload_size();

    let mut file_part: Option<FilePart> = None;
    let mut original_name: Option<String> = None;
    let mut uploader: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                // A part without a filename is a plain form value, not a file.
                let filename = match field.file_name() {
                    Some(filename) if !filename.is_empty() => filename.to_string(),
                    _ => continue,
                };

                if file_part.is_some() {
                    return Err(ApiError::bad_request("Only one file can be uploaded"));
                }

                let content_type = field.content_type().map(|s| s.to_string());

                let mut content = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| multipart_error(e, max_size))?
                {
                    if (content.len() + chunk.len()) as u64 > max_size {
                        return Err(ApiError::payload_too_large(too_large_message(max_size)));
                    }
                    content.extend_from_slice(&chunk);
                }

                file_part = Some(FilePart {
                    filename,
                    content_type,
                    content,
                });
            }
            "originalName" => {
                original_name = Some(field.text().await.map_err(|e| multipart_error(e, max_size))?);
            }
            "uploader" => {
                uploader = Some(field.text().await.map_err(|e| multipart_error(e, max_size))?);
            }
            _ => {}
        }
    }

    let part = file_part
        .ok_or_else(|| ApiError::from(FilebinError::BadRequest("No file uploaded".to_string())))?;

    let display_name = original_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(part.filename);

    let mime_type = part
        .content_type
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| {
            mime_guess::from_path(&display_name)
                .first_or_octet_stream()
                .to_string()
        });

    let mut request = UploadRequest::new(display_name, mime_type, part.content);
    if let Some(uploader) = uploader {
        request = request.with_uploader(uploader);
    }

    let stored = run_blocking(&state, move |files| files.upload(request))
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to upload file"))?;

    Ok(Json(UploadResponse::new(stored.into())))
}

/// GET /api/download/:file_id - Download a file.
#[utoipa::path(
    get,
    path = "/api/download/{file_id}",
    tag = "files",
    params(
        ("file_id" = String, Path, description = "File identifier")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "Unknown identifier, or file missing on disk"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> std::result::Result<Response<Body>, ApiError> {
    let download = run_blocking(&state, move |files| files.locate(&file_id))
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to download file"))?;

    let file = tokio::fs::File::open(&download.path).await.map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ApiError::not_found("Stored file not found")
        } else {
            tracing::error!(file_id = %download.id, "Failed to open file: {}", e);
            ApiError::internal("Failed to download file")
        }
    })?;

    let response = Response::builder()
        .header(header::CONTENT_TYPE, download_content_type(&download.record))
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&download.record.name),
        )
        .header(header::CONTENT_LENGTH, download.size)
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to download file")
        })?;

    Ok(response)
}

/// DELETE /api/delete/:file_id - Delete a file.
#[utoipa::path(
    delete,
    path = "/api/delete/{file_id}",
    tag = "files",
    params(
        ("file_id" = String, Path, description = "File identifier")
    ),
    responses(
        (status = 200, description = "File deleted", body = DeleteResponse),
        (status = 404, description = "Unknown identifier"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> std::result::Result<Json<DeleteResponse>, ApiError> {
    run_blocking(&state, move |files| files.delete(&file_id))
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to delete file"))?;

    Ok(Json(DeleteResponse::new()))
}
