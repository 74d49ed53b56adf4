//! File service for Filebin.
//!
//! This module ties the file storage and the metadata store together:
//! - Upload: write bytes, then insert and persist the record
//! - Download: resolve a record and its bytes on disk
//! - Listing and deletion
//!
//! All methods block on disk I/O; async callers run them on the blocking
//! thread pool.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::metadata::{FileRecord, MetadataStore, StoredFile};
use super::storage::FileStorage;
use super::DEFAULT_MAX_FILE_SIZE;
use crate::config::{Config, FilesConfig};
use crate::datetime::format_utc_datetime;
use crate::{FilebinError, Result};

/// Request data for file upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Original filename.
    pub name: String,
    /// MIME type of the content.
    pub mime_type: String,
    /// Uploader name (optional).
    pub uploader: Option<String>,
    /// File content.
    pub content: Vec<u8>,
}

impl UploadRequest {
    /// Create a new upload request.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            uploader: None,
            content,
        }
    }

    /// Set the uploader.
    pub fn with_uploader(mut self, uploader: impl Into<String>) -> Self {
        self.uploader = Some(uploader.into());
        self
    }
}

/// A record resolved for download.
#[derive(Debug, Clone)]
pub struct Download {
    /// Identifier.
    pub id: String,
    /// File record.
    pub record: FileRecord,
    /// Location of the bytes on disk.
    pub path: PathBuf,
    /// Size of the bytes on disk.
    pub size: u64,
}

/// File service managing uploads, downloads, listing and deletion.
#[derive(Debug)]
pub struct FileService {
    storage: FileStorage,
    metadata: Mutex<MetadataStore>,
    files_config: FilesConfig,
    max_file_size: u64,
}

impl FileService {
    /// Create a new FileService over an existing storage and store.
    pub fn new(storage: FileStorage, metadata: MetadataStore) -> Self {
        Self {
            storage,
            metadata: Mutex::new(metadata),
            files_config: FilesConfig::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Create the storage directory, load the metadata document, and apply
    /// the configured limits.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = FileStorage::new(&config.storage.uploads_dir)?;
        let metadata = MetadataStore::load(&config.storage.metadata_file);

        Ok(Self::new(storage, metadata)
            .with_files_config(config.files.clone())
            .with_max_file_size(config.storage.max_upload_size_bytes()))
    }

    /// Set record presentation settings.
    pub fn with_files_config(mut self, files_config: FilesConfig) -> Self {
        self.files_config = files_config;
        self
    }

    /// Set the maximum accepted file size in bytes.
    pub fn with_max_file_size(mut self, max_size: u64) -> Self {
        self.max_file_size = max_size;
        self
    }

    /// Maximum accepted file size in bytes.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Underlying file storage.
    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    /// Number of stored records.
    pub fn record_count(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// List all records in upload order.
    pub fn list(&self) -> Result<Vec<StoredFile>> {
        Ok(self.lock()?.list())
    }

    /// Upload a file.
    ///
    /// The bytes are written first, then the record is inserted and the
    /// metadata document rewritten.
    pub fn upload(&self, request: UploadRequest) -> Result<StoredFile> {
        if request.name.trim().is_empty() {
            return Err(FilebinError::BadRequest("File name is required".to_string()));
        }

        if request.content.len() as u64 > self.max_file_size {
            let max_mb = self.max_file_size / 1024 / 1024;
            return Err(FilebinError::PayloadTooLarge(format!(
                "File too large (max {max_mb}MB)"
            )));
        }

        let id = self.storage.save(&request.content, &request.name)?;

        let now = Utc::now();
        let uploader = request
            .uploader
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| self.files_config.default_uploader.clone());

        let record = FileRecord {
            name: request.name,
            size: request.content.len() as u64,
            mime_type: request.mime_type,
            uploader,
            date: format_utc_datetime(
                &now,
                &self.files_config.timezone,
                &self.files_config.date_format,
            ),
            timestamp: now.timestamp_millis(),
            filename: id.clone(),
        };

        self.lock()?.put(id.clone(), record.clone())?;
        tracing::info!(file_id = %id, size = record.size, "File uploaded");

        Ok(StoredFile { id, record })
    }

    /// Resolve a file for download.
    ///
    /// Fails with `NotFound` when the record is unknown, or when the record
    /// exists but its bytes are missing from disk.
    pub fn locate(&self, id: &str) -> Result<Download> {
        let record = self
            .lock()?
            .get(id)
            .cloned()
            .ok_or_else(|| FilebinError::NotFound("File".to_string()))?;

        if !self.storage.exists(id) {
            tracing::warn!(file_id = %id, "File record exists but bytes are missing on disk");
            return Err(FilebinError::NotFound("Stored file".to_string()));
        }

        let size = self.storage.file_size(id).map_err(|e| match e {
            FilebinError::NotFound(_) => FilebinError::NotFound("Stored file".to_string()),
            e => e,
        })?;

        Ok(Download {
            id: id.to_string(),
            record,
            path: self.storage.path(id)?,
            size,
        })
    }

    /// Delete a file and its record.
    ///
    /// A record whose bytes are already gone is still removed.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut metadata = self.lock()?;

        if !metadata.contains(id) {
            return Err(FilebinError::NotFound("File".to_string()));
        }

        let had_bytes = self.storage.delete(id)?;
        metadata.remove(id)?;
        tracing::info!(file_id = %id, had_bytes, "File deleted");

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MetadataStore>> {
        self.metadata
            .lock()
            .map_err(|_| FilebinError::Internal("metadata store lock poisoned".to_string()))
    }
}
