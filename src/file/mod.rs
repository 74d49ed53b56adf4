//! File management module for Filebin.
//!
//! This module provides file upload/download functionality including:
//! - Identifier generation (timestamp + random suffix + extension)
//! - Flat on-disk file storage
//! - JSON-backed metadata store
//! - The upload/download/list/delete service used by the web layer

pub mod id;
mod metadata;
mod service;
mod storage;

pub use id::{generate_id, is_valid_id};
pub use metadata::{FileRecord, MetadataStore, StoredFile};
pub use service::{Download, FileService, UploadRequest};
pub use storage::FileStorage;

/// Default maximum file size (100MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

