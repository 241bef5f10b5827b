//! Configuration management module for notify-relay
//!
//! This module provides layered configuration loading with support for:
//! - TOML configuration files
//! - `RELAY_*` environment variable overrides
//! - The legacy deployment variables `SECRET_CODE_VALUE`, `PO_APP_ID` and `PO_USER_ID`
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `{environment}.toml` - Environment-specific configuration
//! 3. `local.toml` - Local development overrides (not committed to version control)
//! 4. `RELAY_*` environment variables
//! 5. Legacy secret/credential variables

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

// Re-export public types
pub use environment::Environment;
pub use loader::ConfigLoader;
pub use settings::{PushoverConfig, RelayConfig, Settings};
