//! Configuration settings structures for notify-relay
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::environment::Environment;
use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

/// Pushover message submission endpoint
pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "notify-relay".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_pushover_api_url() -> String {
    PUSHOVER_API_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/notify-relay.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "<unset>" } else { "[REDACTED]" }
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,

    /// Deployment environment, filled in by the loader
    #[serde(default)]
    pub environment: Environment,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
            environment: Environment::default(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest request body read before the request is treated as malformed
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

// ============================================================================
// Relay Configuration
// ============================================================================

/// Shared-secret authentication for inbound notify requests
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Secret every caller must present. Also read from `SECRET_CODE_VALUE`.
    #[serde(default)]
    pub secret: String,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("secret", &redact(&self.secret))
            .finish()
    }
}

// ============================================================================
// Pushover Configuration
// ============================================================================

/// Pushover provider credentials and delivery options
///
/// Only `app_token`, `user_key` and `api_url` shape the default request.
/// The optional fields are sent when set and omitted otherwise.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushoverConfig {
    /// Message submission endpoint
    #[serde(default = "default_pushover_api_url")]
    pub api_url: String,

    /// Application API token. Also read from `PO_APP_ID`.
    #[serde(default)]
    pub app_token: String,

    /// Recipient user or group key. Also read from `PO_USER_ID`.
    #[serde(default)]
    pub user_key: String,

    /// Per-request timeout in seconds; unset leaves the transport default
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub device: Option<String>,

    /// Message priority, -2 (lowest) to 1 (high); emergency is not supported
    #[serde(default)]
    pub priority: Option<i8>,

    #[serde(default)]
    pub sound: Option<String>,
}

impl Default for PushoverConfig {
    fn default() -> Self {
        Self {
            api_url: default_pushover_api_url(),
            app_token: String::new(),
            user_key: String::new(),
            timeout_seconds: None,
            title: None,
            device: None,
            priority: None,
            sound: None,
        }
    }
}

impl std::fmt::Debug for PushoverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushoverConfig")
            .field("api_url", &self.api_url)
            .field("app_token", &redact(&self.app_token))
            .field("user_key", &redact(&self.user_key))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("title", &self.title)
            .field("device", &self.device)
            .field("priority", &self.priority)
            .field("sound", &self.sound)
            .finish()
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output settings
    #[serde(default)]
    pub console: ConsoleSettings,

    /// File output settings
    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level).map_err(|e| {
            ConfigError::ValidationError {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl FileSettings {
    /// Convert FileSettings to FileConfig
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(
            |e| ConfigError::ValidationError {
                field: "logger.file".to_string(),
                message: e.to_string(),
            },
        )
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// Loaded once at startup and then shared read-only with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application information
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Inbound authentication
    #[serde(default)]
    pub relay: RelayConfig,

    /// Outbound provider
    #[serde(default)]
    pub pushover: PushoverConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,
}
