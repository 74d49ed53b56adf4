//! File records and the JSON-backed metadata store.
//!
//! The whole mapping lives in memory and is rewritten to a single
//! pretty-printed JSON document after every mutation:
//!
//! ```json
//! {
//!   "1718000000000-k3j9x0a2b.txt": {
//!     "name": "notes.txt",
//!     "size": 5,
//!     "type": "text/plain",
//!     "uploader": "Ali",
//!     "date": "10.06.2024",
//!     "timestamp": 1718000000000,
//!     "filename": "1718000000000-k3j9x0a2b.txt"
//!   }
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Metadata for one stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Original filename, used only for display and as the download name.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME type reported at upload.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Uploader name.
    pub uploader: String,
    /// Localized display date of the upload.
    pub date: String,
    /// Upload time in epoch milliseconds.
    pub timestamp: i64,
    /// Stored filename; always equal to the record's identifier.
    #[serde(default)]
    pub filename: String,
}

/// A file record together with its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Identifier (also the stored filename).
    pub id: String,
    /// Record fields.
    pub record: FileRecord,
}

/// Identifier → record mapping persisted as one JSON document.
///
/// Records keep insertion order, both in memory and in the document, so
/// listing follows upload order even within one millisecond.
#[derive(Debug)]
pub struct MetadataStore {
    path: PathBuf,
    records: IndexMap<String, FileRecord>,
}

impl MetadataStore {
    /// Load the store from `path`.
    ///
    /// A missing document yields an empty store. An unreadable or
    /// malformed document is logged and also yields an empty store; it is
    /// overwritten by the next mutation.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let records = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<IndexMap<String, FileRecord>>(&content) {
                Ok(mut records) => {
                    for (id, record) in records.iter_mut() {
                        if record.filename.is_empty() {
                            record.filename = id.clone();
                        }
                    }
                    records
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to parse metadata document");
                    IndexMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No metadata document yet, starting empty");
                IndexMap::new()
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to read metadata document");
                IndexMap::new()
            }
        };

        Self { path, records }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records with their identifiers, in upload order.
    pub fn list(&self) -> Vec<StoredFile> {
        self.records
            .iter()
            .map(|(id, record)| StoredFile {
                id: id.clone(),
                record: record.clone(),
            })
            .collect()
    }

    /// Get the record for `id`.
    pub fn get(&self, id: &str) -> Option<&FileRecord> {
        self.records.get(id)
    }

    /// Whether a record exists for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Insert or replace the record for `id`, then persist the whole store.
    ///
    /// The in-memory entry stays in place even if persisting fails.
    pub fn put(&mut self, id: impl Into<String>, record: FileRecord) -> Result<()> {
        self.records.insert(id.into(), record);
        self.persist()
    }

    /// Remove the record for `id`, then persist the whole store.
    ///
    /// Callers check existence first; removing an unknown id still
    /// rewrites the document.
    pub fn remove(&mut self, id: &str) -> Result<Option<FileRecord>> {
        let removed = self.records.shift_remove(id);
        self.persist()?;
        Ok(removed)
    }

    /// Write the whole mapping to the backing document.
    ///
    /// The document is written to `<path>.tmp` and renamed over the
    /// target so a crash mid-write leaves the previous version intact.
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.records)?;

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilebinError;
    use tempfile::TempDir;

    fn sample_record(id: &str, name: &str) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            size: 5,
            mime_type: "text/plain".to_string(),
            uploader: "Ali".to_string(),
            date: "10.06.2024".to_string(),
            timestamp: 1_718_000_000_000,
            filename: id.to_string(),
        }
    }

    fn setup_store() -> (TempDir, MetadataStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = MetadataStore::load(temp_dir.path().join("files-metadata.json"));
        (temp_dir, store)
    }

    #[test]
    fn test_load_missing_document() {
        let (_temp_dir, store) = setup_store();
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_put_persists_document() {
        let (_temp_dir, mut store) = setup_store();
        let id = "1718000000000-abcdefghi.txt";

        store.put(id, sample_record(id, "a.txt")).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value[id]["name"], "a.txt");
        assert_eq!(value[id]["type"], "text/plain");
        assert_eq!(value[id]["size"], 5);
        assert_eq!(value[id]["filename"], id);
        // Pretty-printed with two-space indentation
        assert!(content.contains("\n  \""));
    }

    #[test]
    fn test_put_leaves_no_temp_file() {
        let (temp_dir, mut store) = setup_store();
        let id = "1718000000000-abcdefghi.txt";

        store.put(id, sample_record(id, "a.txt")).unwrap();

        assert!(!temp_dir.path().join("files-metadata.json.tmp").exists());
    }

    #[test]
    fn test_get_and_contains() {
        let (_temp_dir, mut store) = setup_store();
        let id = "1718000000000-abcdefghi.txt";
        store.put(id, sample_record(id, "a.txt")).unwrap();

        assert!(store.contains(id));
        assert_eq!(store.get(id).unwrap().name, "a.txt");
        assert!(store.get("unknown").is_none());
    }

    #[test]
    fn test_list_in_insertion_order() {
        let (_temp_dir, mut store) = setup_store();

        let first = "1718000000000-zzzzzzzzz.txt";
        let second = "1718000000000-aaaaaaaaa.txt";
        store.put(first, sample_record(first, "a.txt")).unwrap();
        store.put(second, sample_record(second, "b.txt")).unwrap();

        let names: Vec<String> = store.list().into_iter().map(|f| f.record.name).collect();
        assert_eq!(names, vec!["a.txt".to_string(), "b.txt".to_string()]);
    }

    #[test]
    fn test_reload_keeps_document_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("files-metadata.json");
        fs::write(
            &path,
            r#"{"1718000000900-ccc.txt": {"name": "c.txt", "size": 1, "type": "text/plain",
                "uploader": "Anonim", "date": "10.06.2024", "timestamp": 1718000000900},
               "1718000000100-aaa.txt": {"name": "a.txt", "size": 1, "type": "text/plain",
                "uploader": "Anonim", "date": "10.06.2024", "timestamp": 1718000000100}}"#,
        )
        .unwrap();

        let store = MetadataStore::load(&path);

        let names: Vec<String> = store.list().into_iter().map(|f| f.record.name).collect();
        assert_eq!(names, vec!["c.txt".to_string(), "a.txt".to_string()]);
    }

    #[test]
    fn test_remove_keeps_order_of_remaining() {
        let (_temp_dir, mut store) = setup_store();
        for (id, name) in [
            ("1718000000000-ccccccccc.txt", "1.txt"),
            ("1718000000000-bbbbbbbbb.txt", "2.txt"),
            ("1718000000000-aaaaaaaaa.txt", "3.txt"),
        ] {
            store.put(id, sample_record(id, name)).unwrap();
        }

        store.remove("1718000000000-bbbbbbbbb.txt").unwrap();

        let names: Vec<String> = store.list().into_iter().map(|f| f.record.name).collect();
        assert_eq!(names, vec!["1.txt".to_string(), "3.txt".to_string()]);
    }

    #[test]
    fn test_remove_persists_document() {
        let (_temp_dir, mut store) = setup_store();
        let id = "1718000000000-abcdefghi.txt";
        store.put(id, sample_record(id, "a.txt")).unwrap();

        let removed = store.remove(id).unwrap();

        assert_eq!(removed.unwrap().name, "a.txt");
        assert!(store.is_empty());
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.trim(), "{}");
    }

    #[test]
    fn test_reload_reproduces_list() {
        let (temp_dir, mut store) = setup_store();
        for (id, name) in [
            ("1718000000000-aaaaaaaaa.txt", "a.txt"),
            ("1718000000001-bbbbbbbbb.png", "b.png"),
        ] {
            store.put(id, sample_record(id, name)).unwrap();
        }

        let reloaded = MetadataStore::load(temp_dir.path().join("files-metadata.json"));

        assert_eq!(reloaded.list(), store.list());
    }

    #[test]
    fn test_load_malformed_document_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("files-metadata.json");
        fs::write(&path, "{ this is not json").unwrap();

        let store = MetadataStore::load(&path);

        assert!(store.is_empty());
    }

    #[test]
    fn test_load_fills_missing_filename() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("files-metadata.json");
        fs::write(
            &path,
            r#"{"1700000000000-abc.txt": {"name": "x.txt", "size": 1, "type": "text/plain",
                "uploader": "Anonim", "date": "14.11.2023", "timestamp": 1700000000000}}"#,
        )
        .unwrap();

        let store = MetadataStore::load(&path);

        assert_eq!(
            store.get("1700000000000-abc.txt").unwrap().filename,
            "1700000000000-abc.txt"
        );
    }

    #[test]
    fn test_put_fails_when_document_path_is_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir_path = temp_dir.path().join("files-metadata.json");
        fs::create_dir(&dir_path).unwrap();
        let mut store = MetadataStore::load(&dir_path);
        let id = "1718000000000-abcdefghi.txt";

        let result = store.put(id, sample_record(id, "a.txt"));

        assert!(matches!(result, Err(FilebinError::Io(_))));
        // In-memory entry is kept
        assert!(store.contains(id));
    }
}
