//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::ToSchema;

/// Multipart form accepted by `POST /api/upload`.
///
/// Describes the form in the OpenAPI document; the handler reads the
/// fields straight from the multipart stream.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadForm {
    /// File content. Exactly one `file` part is expected.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Display name overriding the part's filename.
    #[serde(rename = "originalName")]
    pub original_name: Option<String>,
    /// Uploader name.
    pub uploader: Option<String>,
}
