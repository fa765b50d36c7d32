use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub album: AlbumConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
    /// Maximum accepted upload body size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            http_port: 8080,
            max_upload_bytes: 15 * 1024 * 1024,
        }
    }
}

/// Object storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// S3-compatible object storage (production)
    #[default]
    S3,
    /// Local filesystem (development)
    Fs,
    /// In-memory (testing only, nothing survives restart)
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// S3 endpoint (e.g., "https://<account>.r2.cloudflarestorage.com")
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub region: Option<String>,
    /// Root directory for the `fs` backend.
    pub fs_root: String,
    /// Public URL prefix prepended to object keys when building photo
    /// references (e.g., a CDN or public bucket domain).
    pub public_url_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            endpoint: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            bucket: String::new(),
            region: Some("auto".to_string()),
            fs_root: "./data".to_string(),
            public_url_prefix: String::new(),
        }
    }
}

/// Album behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumConfig {
    /// Photos allowed per event when its metadata sets no limit.
    pub default_capacity: u32,
    /// Seconds between change-detection ticks on the SSE feed.
    pub feed_tick_seconds: u64,
    /// Ticks per SSE connection before the server closes the channel and
    /// the client reconnects (caps per-connection resource holding).
    pub feed_max_ticks: u32,
    /// Reconnection interval hint sent in the SSE preamble, milliseconds.
    pub retry_millis: u64,
}

impl Default for AlbumConfig {
    fn default() -> Self {
        Self {
            default_capacity: 5,
            feed_tick_seconds: 5,
            feed_max_ticks: 60,
            retry_millis: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // Override with environment variables (SNAPWALL_SERVER_HOST, etc.)
        builder = builder.add_source(
            Environment::with_prefix("SNAPWALL")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Get HTTP bind address
    #[must_use]
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.http_port)
    }

    /// Validate the configuration, collecting every problem found.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.storage.backend == StorageBackend::S3 {
            if self.storage.bucket.is_empty() {
                errors.push("storage.bucket is required for the s3 backend".to_string());
            }
            if self.storage.endpoint.is_empty() {
                errors.push("storage.endpoint is required for the s3 backend".to_string());
            }
        }
        if self.album.default_capacity == 0 {
            errors.push("album.default_capacity must be positive".to_string());
        }
        if self.album.feed_tick_seconds == 0 {
            errors.push("album.feed_tick_seconds must be positive".to_string());
        }
        if self.album.feed_max_ticks == 0 {
            errors.push("album.feed_max_ticks must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
