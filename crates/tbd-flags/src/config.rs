//! Configuration loading and typed config structures for the demo.
//!
//! The configuration lives in `tbd-config.yaml`. Every section and field is
//! optional; an empty file (or no file at all) yields the stock page, which
//! persists to the `featureFlags` key and shows toasts for three seconds.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level demo configuration.
///
/// Mirrors the structure of `tbd-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DemoConfig {
    /// Where the flag record is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Element ids, class names, and header texts of the page.
    #[serde(default)]
    pub page: PageSettings,

    /// Confirmation toast settings.
    #[serde(default)]
    pub toast: ToastConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DemoConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `TBD_STORAGE_PATH` overrides `storage.path`
    /// - `TBD_STORAGE_KEY` overrides `storage.key`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config
            .storage
            .apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Parse configuration from a YAML string without looking at the
    /// environment.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Key under which the flag record is stored.
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// File backing the local key-value store in headless runs.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            path: default_storage_path(),
        }
    }
}

impl StorageConfig {
    /// Override fields from environment-style variables.
    ///
    /// `lookup` returns the value of a variable, or `None` when unset.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("TBD_STORAGE_PATH") {
            self.path = PathBuf::from(val);
        }
        if let Some(val) = lookup("TBD_STORAGE_KEY") {
            self.key = val;
        }
    }
}

/// Stable identifiers and texts the flag effects write to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageSettings {
    /// Class placed on the body while dark mode is enabled.
    #[serde(default = "default_dark_mode_class")]
    pub dark_mode_class: String,

    /// Id of the page title element.
    #[serde(default = "default_title_id")]
    pub title_id: String,

    /// Class placed on the title while the new header is enabled.
    #[serde(default = "default_new_header_class")]
    pub new_header_class: String,

    /// Title text while the new header is enabled.
    #[serde(default = "default_new_header_text")]
    pub new_header_text: String,

    /// Title text while the new header is disabled.
    #[serde(default = "default_classic_header_text")]
    pub classic_header_text: String,

    /// Id of the analytics section.
    #[serde(default = "default_analytics_id")]
    pub analytics_id: String,

    /// Id of the premium features panel.
    #[serde(default = "default_premium_id")]
    pub premium_id: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            dark_mode_class: default_dark_mode_class(),
            title_id: default_title_id(),
            new_header_class: default_new_header_class(),
            new_header_text: default_new_header_text(),
            classic_header_text: default_classic_header_text(),
            analytics_id: default_analytics_id(),
            premium_id: default_premium_id(),
        }
    }
}

/// Toast configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToastConfig {
    /// How long a toast stays visible, in milliseconds.
    #[serde(default = "default_toast_duration_ms")]
    pub duration_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_toast_duration_ms(),
        }
    }
}

impl ToastConfig {
    /// The toast lifetime as a [`Duration`].
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_storage_key() -> String {
    "featureFlags".to_owned()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".tbd-demo/local-storage.json")
}

fn default_dark_mode_class() -> String {
    "dark-mode".to_owned()
}

fn default_title_id() -> String {
    "main-title".to_owned()
}

fn default_new_header_class() -> String {
    "new-header".to_owned()
}

fn default_new_header_text() -> String {
    "🌟 Bem-vindo ao Futuro do Desenvolvimento!".to_owned()
}

fn default_classic_header_text() -> String {
    "Bem-vindo ao Demo TBD".to_owned()
}

fn default_analytics_id() -> String {
    "analytics-section".to_owned()
}

fn default_premium_id() -> String {
    "premium-card".to_owned()
}

const fn default_toast_duration_ms() -> u64 {
    3_000
}

fn default_log_level() -> String {
    "info".to_owned()
}
