//! Configuration module for Filebin.

use serde::Deserialize;
use std::path::Path;

use chrono_tz::Tz;

use crate::{FilebinError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the uploaded files, one per identifier.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
    /// Path to the JSON metadata document.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}

fn default_metadata_file() -> String {
    "files-metadata.json".to_string()
}

fn default_max_upload_size() -> u64 {
    100
}

/// Largest accepted `max_upload_size_mb` (1 TiB).
pub const MAX_UPLOAD_SIZE_MB: u64 = 1024 * 1024;

impl StorageConfig {
    /// Maximum upload size in bytes.
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            metadata_file: default_metadata_file(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// File record presentation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Uploader name recorded when the upload carries none.
    #[serde(default = "default_uploader")]
    pub default_uploader: String,
    /// Timezone used for the display date (e.g., "Asia/Baku", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// chrono format string for the display date.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_uploader() -> String {
    "Anonim".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_date_format() -> String {
    "%d.%m.%Y".to_string()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            default_uploader: default_uploader(),
            timezone: default_timezone(),
            date_format: default_date_format(),
        }
    }
}

/// Web configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Allowed CORS origins (empty = allow any origin).
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Serve static files from `static_path`.
    #[serde(default = "default_serve_static")]
    pub serve_static: bool,
    /// Path to the static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_serve_static() -> bool {
    true
}

fn default_static_path() -> String {
    "public".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            serve_static: default_serve_static(),
            static_path: default_static_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file (empty = console only).
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// File record presentation settings.
    #[serde(default)]
    pub files: FilesConfig,
    /// Web configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FilebinError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FilebinError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILEBIN_PORT`: Override the listen port
    /// - `FILEBIN_UPLOADS_DIR`: Override the uploads directory
    /// - `FILEBIN_METADATA_FILE`: Override the metadata document path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("FILEBIN_PORT") {
            if let Ok(port) = port.trim().parse() {
                self.server.port = port;
            }
        }
        if let Ok(dir) = std::env::var("FILEBIN_UPLOADS_DIR") {
            if !dir.is_empty() {
                self.storage.uploads_dir = dir;
            }
        }
        if let Ok(file) = std::env::var("FILEBIN_METADATA_FILE") {
            if !file.is_empty() {
                self.storage.metadata_file = file;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.storage.max_upload_size_mb == 0 {
            return Err(FilebinError::Validation(
                "storage.max_upload_size_mb must be greater than 0".to_string(),
            ));
        }
        if self.storage.max_upload_size_mb > MAX_UPLOAD_SIZE_MB {
            return Err(FilebinError::Validation(format!(
                "storage.max_upload_size_mb must be at most {MAX_UPLOAD_SIZE_MB}"
            )));
        }
        if self.storage.uploads_dir.is_empty() {
            return Err(FilebinError::Validation(
                "storage.uploads_dir must not be empty".to_string(),
            ));
        }
        if self.storage.metadata_file.is_empty() {
            return Err(FilebinError::Validation(
                "storage.metadata_file must not be empty".to_string(),
            ));
        }
        if self.files.timezone.parse::<Tz>().is_err() {
            return Err(FilebinError::Validation(format!(
                "unknown timezone: {}",
                self.files.timezone
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);

        assert_eq!(config.storage.uploads_dir, "uploads");
        assert_eq!(config.storage.metadata_file, "files-metadata.json");
        assert_eq!(config.storage.max_upload_size_mb, 100);
        assert_eq!(config.storage.max_upload_size_bytes(), 100 * 1024 * 1024);

        assert_eq!(config.files.default_uploader, "Anonim");
        assert_eq!(config.files.timezone, "UTC");
        assert_eq!(config.files.date_format, "%d.%m.%Y");

        assert!(config.web.cors_origins.is_empty());
        assert!(config.web.serve_static);
        assert_eq!(config.web.static_path, "public");

        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080

[storage]
uploads_dir = "data/uploads"
metadata_file = "data/meta.json"
max_upload_size_mb = 20

[files]
default_uploader = "Guest"
timezone = "Asia/Baku"
date_format = "%Y-%m-%d"

[web]
cors_origins = ["http://localhost:5173"]
serve_static = false
static_path = "web/dist"

[logging]
level = "debug"
file = "logs/filebin.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.uploads_dir, "data/uploads");
        assert_eq!(config.storage.metadata_file, "data/meta.json");
        assert_eq!(config.storage.max_upload_size_mb, 20);
        assert_eq!(config.files.default_uploader, "Guest");
        assert_eq!(config.files.timezone, "Asia/Baku");
        assert_eq!(config.files.date_format, "%Y-%m-%d");
        assert_eq!(config.web.cors_origins, vec!["http://localhost:5173"]);
        assert!(!config.web.serve_static);
        assert_eq!(config.web.static_path, "web/dist");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "logs/filebin.log");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 9000
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.max_upload_size_mb, 100);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("[server]\nport = \"not a number\"");
        assert!(matches!(result, Err(FilebinError::Config(_))));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("definitely/not/here/config.toml");
        assert!(matches!(result, Err(FilebinError::Io(_))));
    }

    #[test]
    fn test_validate_zero_upload_size() {
        let mut config = Config::default();
        config.storage.max_upload_size_mb = 0;
        assert!(matches!(
            config.validate(),
            Err(FilebinError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_huge_upload_size() {
        let mut config = Config::default();
        config.storage.max_upload_size_mb = 18_000_000_000_000_000;

        assert!(matches!(
            config.validate(),
            Err(FilebinError::Validation(_))
        ));
        assert_eq!(config.storage.max_upload_size_bytes(), u64::MAX);

        config.storage.max_upload_size_mb = MAX_UPLOAD_SIZE_MB;
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.max_upload_size_bytes(), 1 << 40);
    }

    #[test]
    fn test_validate_unknown_timezone() {
        let mut config = Config::default();
        config.files.timezone = "Mars/Olympus".to_string();
        assert!(matches!(
            config.validate(),
            Err(FilebinError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_empty_paths() {
        let mut config = Config::default();
        config.storage.uploads_dir.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.storage.metadata_file.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_env_overrides() {
        std::env::set_var("FILEBIN_PORT", "4567");
        std::env::set_var("FILEBIN_UPLOADS_DIR", "");
        std::env::set_var("FILEBIN_METADATA_FILE", "env-meta.json");

        let mut config = Config::default();
        config.apply_env_overrides();

        std::env::remove_var("FILEBIN_PORT");
        std::env::remove_var("FILEBIN_UPLOADS_DIR");
        std::env::remove_var("FILEBIN_METADATA_FILE");

        assert_eq!(config.server.port, 4567);
        // Empty value is ignored
        assert_eq!(config.storage.uploads_dir, "uploads");
        assert_eq!(config.storage.metadata_file, "env-meta.json");
    }
}
