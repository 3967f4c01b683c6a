//! Configuration loading for the scripture atlas.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back
//! to sensible defaults so the app can still launch.

use crate::retry::RetrySchedule;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// High-level app configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct AppConfig {
    #[serde(default = "default_volumes_url")]
    pub volumes_url: String,
    #[serde(default = "default_books_url")]
    pub books_url: String,
    #[serde(default = "default_chapter_url")]
    pub chapter_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
    #[serde(default = "default_marker_retry_initial_ms")]
    pub marker_retry_initial_ms: u64,
    #[serde(default = "default_marker_retry_max_ms")]
    pub marker_retry_max_ms: u64,
    #[serde(default = "default_marker_retry_max_attempts")]
    pub marker_retry_max_attempts: u32,
    #[serde(default = "default_cache_chapters")]
    pub cache_chapters: bool,
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            volumes_url: default_volumes_url(),
            books_url: default_books_url(),
            chapter_url: default_chapter_url(),
            request_timeout_secs: default_request_timeout_secs(),
            max_zoom: default_max_zoom(),
            marker_retry_initial_ms: default_marker_retry_initial_ms(),
            marker_retry_max_ms: default_marker_retry_max_ms(),
            marker_retry_max_attempts: default_marker_retry_max_attempts(),
            cache_chapters: default_cache_chapters(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn marker_retry_schedule(&self) -> RetrySchedule {
        RetrySchedule {
            initial_delay: Duration::from_millis(self.marker_retry_initial_ms),
            max_delay: Duration::from_millis(self.marker_retry_max_ms),
            max_attempts: self.marker_retry_max_attempts,
        }
    }
}

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err}");
            AppConfig::default()
        }
    }
}

fn default_volumes_url() -> String {
    "https://scriptures.byu.edu/mapscrip/model/volumes.php".to_string()
}

fn default_books_url() -> String {
    "https://scriptures.byu.edu/mapscrip/model/books.php".to_string()
}

fn default_chapter_url() -> String {
    "https://scriptures.byu.edu/mapscrip/mapgetscrip.php".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_max_zoom() -> u8 {
    15
}

fn default_marker_retry_initial_ms() -> u64 {
    500
}

fn default_marker_retry_max_ms() -> u64 {
    5000
}

fn default_marker_retry_max_attempts() -> u32 {
    8
}

fn default_cache_chapters() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
