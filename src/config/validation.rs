//! Configuration validation logic
//!
//! Validation runs once after loading and merging, before the server binds.

use reqwest::Url;

use crate::config::environment::Environment;
use crate::config::error::ConfigError;
use crate::config::settings::{
    FileSettings, LoggerSettings, PushoverConfig, RelayConfig, ServerConfig, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Body limit must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.max_body_bytes == 0 {
            return Err(ConfigError::validation(
                "server.max_body_bytes",
                "Maximum body size must be greater than 0 bytes.",
            ));
        }

        Ok(())
    }
}

impl RelayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::validation(
                "relay.secret",
                "Shared secret is required. Set relay.secret, RELAY_RELAY__SECRET or SECRET_CODE_VALUE.",
            ));
        }

        Ok(())
    }
}

impl PushoverConfig {
    /// Validate provider configuration
    ///
    /// # Validation Rules
    /// - Application token and user key must be set
    /// - Endpoint must be an http(s) URL, and https in production
    /// - Priority must be within -2..=1; emergency (2) needs retry/expire
    ///   parameters the relay does not send
    /// - Timeout, when set, must be greater than 0
    pub fn validate(&self, environment: Environment) -> Result<(), ConfigError> {
        if self.app_token.is_empty() {
            return Err(ConfigError::validation(
                "pushover.app_token",
                "Pushover application token is required. Set pushover.app_token or PO_APP_ID.",
            ));
        }

        if self.user_key.is_empty() {
            return Err(ConfigError::validation(
                "pushover.user_key",
                "Pushover user key is required. Set pushover.user_key or PO_USER_ID.",
            ));
        }

        let url = Url::parse(&self.api_url).map_err(|_| ConfigError::ValidationError {
            field: "pushover.api_url".to_string(),
            message: format!("Invalid URL format: '{}'", self.api_url),
        })?;

        match url.scheme() {
            "https" => {}
            "http" if !environment.is_production() => {}
            "http" => {
                return Err(ConfigError::validation(
                    "pushover.api_url",
                    "Provider endpoint must use https in production.",
                ));
            }
            _ => {
                return Err(ConfigError::validation(
                    "pushover.api_url",
                    "Provider endpoint must use http or https protocol.",
                ));
            }
        }

        match self.priority {
            Some(2) => {
                return Err(ConfigError::validation(
                    "pushover.priority",
                    "Emergency priority (2) is not supported: Pushover rejects it without \
                     retry and expire parameters, so every delivery would fail. Use -2 to 1.",
                ));
            }
            Some(priority) if !(-2..=1).contains(&priority) => {
                return Err(ConfigError::ValidationError {
                    field: "pushover.priority".to_string(),
                    message: format!(
                        "Priority {} is out of range. Valid values are -2 to 1.",
                        priority
                    ),
                });
            }
            _ => {}
        }

        if self.timeout_seconds == Some(0) {
            return Err(ConfigError::validation(
                "pushover.timeout_seconds",
                "Timeout must be greater than 0 seconds when set.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - At least one of console or file output must be enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.relay.validate()?;
        self.pushover.validate(self.application.environment)?;
        self.logger.validate()?;
        Ok(())
    }
}
