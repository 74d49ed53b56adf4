//! Filebin - a small self-hosted file sharing service.
//!
//! Files are uploaded over HTTP, stored on disk under generated identifiers,
//! and described by a JSON metadata document that survives restarts.

pub mod config;
pub mod datetime;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use error::{FilebinError, Result};
pub use file::{FileRecord, FileService, FileStorage, MetadataStore, StoredFile, UploadRequest};
pub use web::WebServer;
