//! File storage for Filebin.
//!
//! This module provides physical file storage functionality:
//! - One flat directory, one file per generated identifier
//! - Save, size, existence, and delete operations

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::id::{generate_id, is_valid_id};
use crate::{FilebinError, Result};

/// File storage service for managing physical files.
///
/// Files are stored flat under the base directory:
/// ```text
/// {base_path}/
/// ├── 1718000000000-k3j9x0a2b.pdf
/// ├── 1718000000412-0q8w7e6r5.txt
/// └── ...
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for file storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let storage = Self {
            base_path: base_path.into(),
        };
        storage.ensure_directory()?;
        Ok(storage)
    }

    /// Create the base directory if it is missing.
    pub fn ensure_directory(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        Ok(())
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Save content under a freshly generated identifier.
    ///
    /// # Arguments
    ///
    /// * `content` - The file content to save
    /// * `original_name` - The original filename (used only for its extension)
    ///
    /// # Returns
    ///
    /// The generated identifier, which is also the stored filename.
    pub fn save(&self, content: &[u8], original_name: &str) -> Result<String> {
        let id = generate_id(original_name);
        self.save_with_id(content, &id)?;
        Ok(id)
    }

    /// Save content under a specific identifier.
    pub fn save_with_id(&self, content: &[u8], id: &str) -> Result<()> {
        let file_path = self.path(id)?;
        fs::write(&file_path, content)?;
        Ok(())
    }

    /// Delete a file from storage.
    ///
    /// # Returns
    ///
    /// `true` if the file was deleted, `false` if it didn't exist
    pub fn delete(&self, id: &str) -> Result<bool> {
        let file_path = self.path(id)?;

        match fs::remove_file(&file_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a file exists in storage.
    pub fn exists(&self, id: &str) -> bool {
        self.path(id).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Get the size of a stored file.
    pub fn file_size(&self, id: &str) -> Result<u64> {
        let file_path = self.path(id)?;

        match fs::metadata(&file_path) {
            Ok(m) => Ok(m.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(FilebinError::NotFound(format!("File {id}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get the full file path for an identifier.
    ///
    /// Identifiers that are not a single plain path component are reported
    /// as not found instead of being joined to the base path.
    pub fn path(&self, id: &str) -> Result<PathBuf> {
        if !is_valid_id(id) {
            return Err(FilebinError::NotFound(format!("File {id}")));
        }
        Ok(self.base_path.join(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_storage() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let storage_path = temp_dir.path().join("uploads");

        assert!(!storage_path.exists());

        let storage = FileStorage::new(&storage_path).unwrap();

        assert!(storage_path.is_dir());
        assert_eq!(storage.base_path(), storage_path);
    }

    #[test]
    fn test_ensure_directory_is_idempotent() {
        let (_temp_dir, storage) = setup_storage();
        storage.ensure_directory().unwrap();
        storage.ensure_directory().unwrap();
        assert!(storage.base_path().is_dir());
    }

    #[test]
    fn test_save_writes_flat_file() {
        let (_temp_dir, storage) = setup_storage();
        let content = b"Hello, World!";

        let id = storage.save(content, "greeting.txt").unwrap();

        assert!(id.ends_with(".txt"));
        let on_disk = storage.base_path().join(&id);
        assert_eq!(fs::read(on_disk).unwrap(), content);
    }

    #[test]
    fn test_save_ignores_directories_in_original_name() {
        let (_temp_dir, storage) = setup_storage();

        let id = storage.save(b"data", "../../outside.txt").unwrap();

        assert!(!id.contains('/'));
        assert_eq!(storage.path(&id).unwrap().parent().unwrap(), storage.base_path());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, storage) = setup_storage();

        let id = storage.save(b"to delete", "delete.txt").unwrap();
        assert!(storage.exists(&id));

        assert!(storage.delete(&id).unwrap());
        assert!(!storage.exists(&id));
    }

    #[test]
    fn test_delete_missing_is_not_an_error() {
        let (_temp_dir, storage) = setup_storage();
        assert!(!storage.delete("1718000000000-missing00.txt").unwrap());
    }

    #[test]
    fn test_exists() {
        let (_temp_dir, storage) = setup_storage();

        let id = storage.save(b"data", "test.txt").unwrap();

        assert!(storage.exists(&id));
        assert!(!storage.exists("nonexistent.txt"));
        assert!(!storage.exists(".."));
    }

    #[test]
    fn test_file_size() {
        let (_temp_dir, storage) = setup_storage();
        let content: Vec<u8> = (0..=255).collect();

        let id = storage.save(&content, "binary.bin").unwrap();

        assert_eq!(storage.file_size(&id).unwrap(), 256);
    }

    #[test]
    fn test_file_size_not_found() {
        let (_temp_dir, storage) = setup_storage();

        let result = storage.file_size("nonexistent.txt");
        assert!(matches!(result, Err(FilebinError::NotFound(_))));
    }

    #[test]
    fn test_path_rejects_traversal() {
        let (_temp_dir, storage) = setup_storage();

        assert!(matches!(
            storage.path("../config.toml"),
            Err(FilebinError::NotFound(_))
        ));
        assert!(matches!(storage.path(""), Err(FilebinError::NotFound(_))));
        assert!(matches!(
            storage.delete("../config.toml"),
            Err(FilebinError::NotFound(_))
        ));
    }

    #[test]
    fn test_path_joins_base() {
        let (_temp_dir, storage) = setup_storage();

        let id = "1718000000000-abcdefghi.txt";
        assert_eq!(storage.path(id).unwrap(), storage.base_path().join(id));
    }
}
