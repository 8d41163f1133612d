//! Configuration module for galsync.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, environment overrides, validation, defaults, and a
//! builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{RemoteId, SetupError};

/// Environment variable holding the root folder id
pub const ENV_FOLDER_ID: &str = "GOOGLE_DRIVE_FOLDER_ID";

/// Environment variable holding an inline service-account key (JSON)
pub const ENV_CREDENTIALS: &str = "GOOGLE_CREDENTIALS";

/// Environment variable holding a path to a service-account key file
pub const ENV_CREDENTIALS_FILE: &str = "GOOGLE_CREDENTIALS_FILE";

/// Default Drive v3 endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for galsync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub drive: DriveConfig,
    pub content: ContentConfig,
    pub state: StateConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
}

/// Remote store and credential settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Id of the folder whose subfolders are the galleries.
    pub root_folder_id: Option<String>,
    /// Inline service-account key JSON. Never written back out.
    #[serde(skip_serializing)]
    pub credentials_json: Option<String>,
    /// Path to a service-account key file.
    pub credentials_file: Option<PathBuf>,
    /// Base URL of the Drive v3 API.
    pub api_base_url: String,
    /// Overrides the `token_uri` found in the service-account key.
    pub token_url: Option<String>,
}

/// Local output tree settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory rebuilt on every sync.
    pub root: PathBuf,
    /// Title of the top-level listing document.
    pub listing_title: String,
    /// Date used for galleries whose creation time is unknown (`YYYY-MM-DD`).
    pub default_date: String,
}

/// Persisted state settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// File holding the watermark timestamp.
    pub watermark_file: PathBuf,
    /// Also report gallery folders removed since the last save.
    pub detect_deletions: bool,
}

/// Retry settings for remote calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Backoff base in milliseconds; attempt `n` waits `base * 2^n`.
    pub base_delay_ms: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/galsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("galsync")
            .join("config.yaml")
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`. Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(id) = get(ENV_FOLDER_ID) {
            self.drive.root_folder_id = Some(id.trim().to_string());
        }
        if let Some(json) = get(ENV_CREDENTIALS) {
            self.drive.credentials_json = Some(json);
        }
        if let Some(path) = get(ENV_CREDENTIALS_FILE) {
            self.drive.credentials_file = Some(PathBuf::from(path));
        }
    }

    /// The configured root folder id.
    ///
    /// # Errors
    /// [`SetupError::Configuration`] when unset or malformed.
    pub fn root_folder_id(&self) -> Result<RemoteId, SetupError> {
        let raw = self
            .drive
            .root_folder_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                SetupError::Configuration(format!(
                    "drive.root_folder_id is not set (or set {ENV_FOLDER_ID})"
                ))
            })?;
        RemoteId::new(raw.to_string())
            .map_err(|e| SetupError::Configuration(format!("drive.root_folder_id: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            root_folder_id: None,
            credentials_json: None,
            credentials_file: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: None,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("content").join("galleries"),
            listing_title: "Galleries".to_string(),
            default_date: "2026-02-14".to_string(),
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            watermark_file: PathBuf::from("last_sync.txt"),
            detect_deletions: false,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"retry.base_delay_ms"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound on `retry.max_retries`.
const MAX_RETRIES_LIMIT: u32 = 10;

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid. A missing root
    /// folder id is not reported here; commands that need it fail with
    /// [`SetupError::Configuration`] instead.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- drive ---
        if let Some(ref id) = self.drive.root_folder_id {
            if let Err(e) = RemoteId::new(id.clone()) {
                errors.push(ValidationError {
                    field: "drive.root_folder_id".into(),
                    message: e.to_string(),
                });
            }
        }
        if !is_http_url(&self.drive.api_base_url) {
            errors.push(ValidationError {
                field: "drive.api_base_url".into(),
                message: format!("must be an http(s) URL: {}", self.drive.api_base_url),
            });
        }
        if let Some(ref url) = self.drive.token_url {
            if !is_http_url(url) {
                errors.push(ValidationError {
                    field: "drive.token_url".into(),
                    message: format!("must be an http(s) URL: {url}"),
                });
            }
        }

        // --- content ---
        if self.content.root.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "content.root".into(),
                message: "must not be empty".into(),
            });
        }
        if self.content.listing_title.trim().is_empty() {
            errors.push(ValidationError {
                field: "content.listing_title".into(),
                message: "must not be empty".into(),
            });
        }
        if NaiveDate::parse_from_str(&self.content.default_date, "%Y-%m-%d").is_err() {
            errors.push(ValidationError {
                field: "content.default_date".into(),
                message: format!(
                    "must be a YYYY-MM-DD date, got '{}'",
                    self.content.default_date
                ),
            });
        }

        // --- state ---
        if self.state.watermark_file.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "state.watermark_file".into(),
                message: "must not be empty".into(),
            });
        }

        // --- retry ---
        if self.retry.base_delay_ms == 0 {
            errors.push(ValidationError {
                field: "retry.base_delay_ms".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.retry.max_retries > MAX_RETRIES_LIMIT {
            errors.push(ValidationError {
                field: "retry.max_retries".into(),
                message: format!("must not exceed {MAX_RETRIES_LIMIT}"),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}', expected one of: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// ```rust
/// use galsync_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .drive_root_folder_id("1a2B3c")
///     .content_root("public/galleries".into())
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- drive ---

    pub fn drive_root_folder_id(mut self, id: impl Into<String>) -> Self {
        self.config.drive.root_folder_id = Some(id.into());
        self
    }

    pub fn drive_credentials_json(mut self, json: impl Into<String>) -> Self {
        self.config.drive.credentials_json = Some(json.into());
        self
    }

    pub fn drive_credentials_file(mut self, path: PathBuf) -> Self {
        self.config.drive.credentials_file = Some(path);
        self
    }

    pub fn drive_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.drive.api_base_url = url.into();
        self
    }

    pub fn drive_token_url(mut self, url: impl Into<String>) -> Self {
        self.config.drive.token_url = Some(url.into());
        self
    }

    // --- content ---

    pub fn content_root(mut self, root: PathBuf) -> Self {
        self.config.content.root = root;
        self
    }

    pub fn content_listing_title(mut self, title: impl Into<String>) -> Self {
        self.config.content.listing_title = title.into();
        self
    }

    pub fn content_default_date(mut self, date: impl Into<String>) -> Self {
        self.config.content.default_date = date.into();
        self
    }

    // --- state ---

    pub fn state_watermark_file(mut self, path: PathBuf) -> Self {
        self.config.state.watermark_file = path;
        self
    }

    pub fn state_detect_deletions(mut self, enabled: bool) -> Self {
        self.config.state.detect_deletions = enabled;
        self
    }

    // --- retry ---

    pub fn retry_max_retries(mut self, n: u32) -> Self {
        self.config.retry.max_retries = n;
        self
    }

    pub fn retry_base_delay_ms(mut self, ms: u64) -> Self {
        self.config.retry.base_delay_ms = ms;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Consume the builder and return the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Consume the builder, validate, and return the [`Config`] or errors.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let errors = self.config.validate();
        if errors.is_empty() {
            Ok(self.config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
