//! API handlers for the Web API.

pub mod file;

pub use file::*;

use std::sync::Arc;

use crate::file::FileService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// File service (storage + metadata store).
    pub files: Arc<FileService>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(files: FileService) -> Self {
        Self {
            files: Arc::new(files),
        }
    }

    /// Maximum accepted file size in bytes.
    pub fn max_upload_size(&self) -> u64 {
        self.files.max_file_size()
    }
}
