//! Response DTOs for Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::file::StoredFile;

/// A stored file as returned by the listing and upload endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileResponse {
    /// Identifier (also the stored filename).
    pub id: String,
    /// Original filename.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Uploader name.
    pub uploader: String,
    /// Display date of the upload.
    pub date: String,
    /// Upload time in epoch milliseconds.
    pub timestamp: i64,
    /// Stored filename.
    pub filename: String,
}

impl From<StoredFile> for FileResponse {
    fn from(file: StoredFile) -> Self {
        let StoredFile { id, record } = file;
        Self {
            id,
            name: record.name,
            size: record.size,
            mime_type: record.mime_type,
            uploader: record.uploader,
            date: record.date,
            timestamp: record.timestamp,
            filename: record.filename,
        }
    }
}

/// Upload response.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
    /// The stored file.
    pub file: FileResponse,
}

impl UploadResponse {
    /// Create a successful upload response.
    pub fn new(file: FileResponse) -> Self {
        Self {
            success: true,
            message: "File uploaded".to_string(),
            file,
        }
    }
}

/// Delete response.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
}

impl DeleteResponse {
    /// Create a successful delete response.
    pub fn new() -> Self {
        Self {
            success: true,
            message: "File deleted".to_string(),
        }
    }
}

impl Default for DeleteResponse {
    fn default() -> Self {
        Self::new()
    }
}
