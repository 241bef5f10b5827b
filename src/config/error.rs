//! Errors raised while loading or validating relay configuration

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file that must exist is missing
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Sources could not be merged into `Settings`
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A merged value is out of range or missing
    #[error("Invalid value for {field}: {message}")]
    ValidationError { field: String, message: String },

    /// `RELAY_APP_ENV` or `--env` names no known environment
    #[error("Unknown environment: {0}")]
    InvalidEnvironment(String),

    /// Two sources that cannot be combined were both given
    #[error("Conflicting configuration sources: {0}")]
    MutualExclusivityError(String),

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn mutual_exclusivity(message: impl Into<String>) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}
