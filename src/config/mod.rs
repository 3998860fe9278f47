//! Configuration management
//!
//! This module handles loading and parsing configuration for the pressroom console.
//! Configuration can be loaded from:
//! - pressroom.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub backend: BackendConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
    /// Upload configuration
    #[serde(default)]
    pub upload: UploadConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            cache: CacheConfig::default(),
            retry: RetryConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend API, including the path prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token sent with every request (optional)
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            auth_token: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:4000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache driver (memory or disk)
    #[serde(default)]
    pub driver: CacheDriver,
    /// Directory for the disk cache
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
    /// Age in seconds after which a cached entry is considered stale
    #[serde(default = "default_stale_secs")]
    pub stale_secs: u64,
    /// Age in seconds after which a cached entry is dropped entirely
    #[serde(default = "default_retain_secs")]
    pub retain_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            driver: CacheDriver::default(),
            dir: default_cache_dir(),
            stale_secs: default_stale_secs(),
            retain_secs: default_retain_secs(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".pressroom-cache")
}

fn default_stale_secs() -> u64 {
    300
}

fn default_retain_secs() -> u64 {
    600
}

/// Cache driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheDriver {
    /// In-memory cache (default)
    #[default]
    Memory,
    /// Disk cache, survives across runs
    Disk,
}

/// Retry configuration for backend requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Number of retries after the initial attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound on the backoff delay, in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    20_000
}

/// Upload configuration for publication images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum image size in bytes (default: 3MB)
    #[serde(default = "default_max_image_size")]
    pub max_image_size: u64,
    /// Allowed image MIME types
    #[serde(default = "default_allowed_image_types")]
    pub allowed_image_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_image_size: default_max_image_size(),
            allowed_image_types: default_allowed_image_types(),
        }
    }
}

fn default_max_image_size() -> u64 {
    3 * 1024 * 1024 // 3MB
}

fn default_allowed_image_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/webp".to_string(),
        "image/jpg".to_string(),
    ]
}

impl UploadConfig {
    /// Check if a MIME type is allowed
    pub fn is_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_image_types.iter().any(|t| t == mime_type)
    }

    /// Human-readable label for the size limit, e.g. "3 MB"
    pub fn max_size_label(&self) -> String {
        const MIB: u64 = 1024 * 1024;
        if self.max_image_size % MIB == 0 {
            format!("{} MB", self.max_image_size / MIB)
        } else {
            format_file_size(self.max_image_size)
        }
    }
}

/// Format a byte count as a human-readable size
pub fn format_file_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    const KIB: u64 = 1024;
    if bytes == 0 {
        "0 KB".to_string()
    } else if bytes >= MIB {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.2} KB", bytes as f64 / KIB as f64)
    }
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        // If file doesn't exist, return defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        // Read the file content
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        // Handle empty file - return defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        // Parse YAML with detailed error messages
        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - PRESSROOM_BACKEND_BASE_URL
    /// - PRESSROOM_BACKEND_TIMEOUT_SECS
    /// - PRESSROOM_BACKEND_AUTH_TOKEN
    /// - PRESSROOM_CACHE_DRIVER
    /// - PRESSROOM_CACHE_DIR
    /// - PRESSROOM_CACHE_STALE_SECS
    /// - PRESSROOM_CACHE_RETAIN_SECS
    /// - PRESSROOM_RETRY_MAX_RETRIES
    /// - PRESSROOM_RETRY_BASE_DELAY_MS
    /// - PRESSROOM_RETRY_MAX_DELAY_MS
    /// - PRESSROOM_UPLOAD_MAX_IMAGE_SIZE
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        // First load from file (or defaults)
        let mut config = Self::load(path)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        // Backend configuration
        if let Ok(base_url) = std::env::var("PRESSROOM_BACKEND_BASE_URL") {
            self.backend.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("PRESSROOM_BACKEND_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                self.backend.timeout_secs = timeout;
            }
        }
        if let Ok(token) = std::env::var("PRESSROOM_BACKEND_AUTH_TOKEN") {
            self.backend.auth_token = Some(token);
        }

        // Cache configuration
        if let Ok(driver) = std::env::var("PRESSROOM_CACHE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "memory" => self.cache.driver = CacheDriver::Memory,
                "disk" => self.cache.driver = CacheDriver::Disk,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(dir) = std::env::var("PRESSROOM_CACHE_DIR") {
            self.cache.dir = PathBuf::from(dir);
        }
        if let Ok(stale) = std::env::var("PRESSROOM_CACHE_STALE_SECS") {
            if let Ok(stale) = stale.parse::<u64>() {
                self.cache.stale_secs = stale;
            }
        }
        if let Ok(retain) = std::env::var("PRESSROOM_CACHE_RETAIN_SECS") {
            if let Ok(retain) = retain.parse::<u64>() {
                self.cache.retain_secs = retain;
            }
        }

        // Retry configuration
        if let Ok(retries) = std::env::var("PRESSROOM_RETRY_MAX_RETRIES") {
            if let Ok(retries) = retries.parse::<u32>() {
                self.retry.max_retries = retries;
            }
        }
        if let Ok(delay) = std::env::var("PRESSROOM_RETRY_BASE_DELAY_MS") {
            if let Ok(delay) = delay.parse::<u64>() {
                self.retry.base_delay_ms = delay;
            }
        }
        if let Ok(delay) = std::env::var("PRESSROOM_RETRY_MAX_DELAY_MS") {
            if let Ok(delay) = delay.parse::<u64>() {
                self.retry.max_delay_ms = delay;
            }
        }

        // Upload configuration
        if let Ok(size) = std::env::var("PRESSROOM_UPLOAD_MAX_IMAGE_SIZE") {
            if let Ok(size) = size.parse::<u64>() {
                self.upload.max_image_size = size;
            }
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "backend.base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
// Both `tests` and `property_tests` modules use this to prevent race conditions.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
const CONFIG_ENV_VARS: [&str; 11] = [
    "PRESSROOM_BACKEND_BASE_URL",
    "PRESSROOM_BACKEND_TIMEOUT_SECS",
    "PRESSROOM_BACKEND_AUTH_TOKEN",
    "PRESSROOM_CACHE_DRIVER",
    "PRESSROOM_CACHE_DIR",
    "PRESSROOM_CACHE_STALE_SECS",
    "PRESSROOM_CACHE_RETAIN_SECS",
    "PRESSROOM_RETRY_MAX_RETRIES",
    "PRESSROOM_RETRY_BASE_DELAY_MS",
    "PRESSROOM_RETRY_MAX_DELAY_MS",
    "PRESSROOM_UPLOAD_MAX_IMAGE_SIZE",
];
