//! Configuration loader for notify-relay
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
pub const CONFIG_DIR_ENV: &str = "RELAY_CONFIG_DIR";

/// Environment variable for specific configuration file
pub const CONFIG_FILE_ENV: &str = "RELAY_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "RELAY";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Deployment variables that predate the `RELAY_*` scheme, mapped onto
/// their configuration keys. They win over every other source.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("SECRET_CODE_VALUE", "relay.secret"),
    ("PO_APP_ID", "pushover.app_token"),
    ("PO_USER_ID", "pushover.user_key"),
];

/// Configuration loader that handles layered configuration loading
///
/// The loader supports the following configuration sources (in order of priority):
/// 1. `default.toml` - Base default configuration (optional)
/// 2. `{environment}.toml` - Environment-specific configuration (optional)
/// 3. `local.toml` - Local development overrides (optional)
/// 4. `RELAY_*` environment variables
/// 5. `SECRET_CODE_VALUE`, `PO_APP_ID`, `PO_USER_ID` (highest priority)
///
/// Every file layer is optional because a relay is commonly configured
/// from the environment alone.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Configuration directory path
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    /// Current application environment
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a new configuration loader
    ///
    /// Reads `RELAY_CONFIG_DIR`, `RELAY_CONFIG_FILE` and `RELAY_APP_ENV`.
    ///
    /// # Errors
    ///
    /// Returns an error if both `RELAY_CONFIG_DIR` and `RELAY_CONFIG_FILE` are set,
    /// as they are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir_var = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && config_dir_var.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "RELAY_CONFIG_DIR and RELAY_CONFIG_FILE cannot both be set. \
                 Use RELAY_CONFIG_DIR for layered configuration or \
                 RELAY_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir: config_dir_var
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Use a single configuration file instead of the layered directory
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Override the environment detected from `RELAY_APP_ENV`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Load configuration from all sources without validating it
    ///
    /// Callers validate after applying CLI overrides, so a missing secret
    /// can still be reported against the final merged values.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })
    }

    /// Build the config::Config instance from all sources
    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder()
            .set_override("application.environment", self.environment.as_str())?;

        let builder = if let Some(ref config_file) = self.config_file {
            Self::add_file_source(builder, config_file, true)?
        } else {
            self.build_layered_config(builder)?
        };

        let builder = Self::add_env_source(builder);
        let builder = Self::add_legacy_env_overrides(builder)?;

        builder.build().map_err(ConfigError::from)
    }

    /// Build layered configuration from multiple files
    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, false)?;

        let env_path = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    /// Add a file source to the config builder
    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        let path_str = path.to_str().ok_or_else(|| {
            ConfigError::ParseError(format!(
                "Configuration path is not valid UTF-8: {}",
                path.display()
            ))
        })?;

        Ok(builder.add_source(File::new(path_str, FileFormat::Toml).required(required)))
    }

    /// Add environment variable source to the config builder
    ///
    /// Double underscores (`__`) separate nested keys:
    /// - `RELAY_SERVER__PORT` -> `server.port`
    /// - `RELAY_PUSHOVER__APP_TOKEN` -> `pushover.app_token`
    ///
    /// Values are not type-parsed so secrets such as `007` keep their exact
    /// text; numeric fields are converted during deserialization.
    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true),
        )
    }

    fn add_legacy_env_overrides(
        mut builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        for (var, key) in LEGACY_ENV_KEYS {
            let value = std::env::var(var).ok().filter(|v| !v.is_empty());
            builder = builder.set_override_option(*key, value)?;
        }
        Ok(builder)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
            environment: AppEnvironment::default(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests touching process environment variables run one at a time
    pub(crate) static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const MANAGED_VARS: &[&str] = &[
        CONFIG_DIR_ENV,
        CONFIG_FILE_ENV,
        AppEnvironment::ENV_VAR,
        "RELAY_SERVER__PORT",
        "RELAY_RELAY__SECRET",
        "RELAY_PUSHOVER__APP_TOKEN",
        "SECRET_CODE_VALUE",
        "PO_APP_ID",
        "PO_USER_ID",
    ];

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Restores every managed variable on drop and starts from a clean slate
    pub(crate) struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        pub(crate) fn clean() -> Self {
            let mut guard = Self {
                vars_to_restore: Vec::new(),
            };
            for var in MANAGED_VARS {
                guard.remove(var);
            }
            guard
        }

        pub(crate) fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    const DEFAULT_TOML: &str = r#"
[server]
host = "127.0.0.1"
port = 8787

[relay]
secret = "file-secret"

[pushover]
app_token = "file-app"
user_key = "file-user"
"#;

    #[test]
    fn test_config_loader_new_default() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let _env = EnvGuard::clean();

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir, PathBuf::from("config"));
        assert!(loader.config_file.is_none());
        assert_eq!(loader.environment, AppEnvironment::Development);
    }

    #[test]
    fn test_config_loader_mutual_exclusivity_error() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::clean();
        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains(CONFIG_DIR_ENV));
                assert!(msg.contains(CONFIG_FILE_ENV));
            }
            other => panic!("Expected MutualExclusivityError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_without_any_files() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        let settings = ConfigLoader::new().unwrap().load().expect("Should load");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_default_toml() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        let settings = ConfigLoader::new()
            .unwrap()
            .load()
            .expect("Should load settings");
        assert!(settings.validate().is_ok());
        assert_eq!(settings.relay.secret, "file-secret");
        assert_eq!(settings.pushover.app_token, "file-app");
        assert_eq!(settings.application.environment, AppEnvironment::Development);
    }

    #[test]
    fn test_environment_and_local_layers() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("staging.toml", "[server]\nport = 9000\nhost = \"0.0.0.0\"\n"),
            ("local.toml", "[server]\nport = 9100\n"),
        ]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "staging");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load");
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.application.environment, AppEnvironment::Staging);
    }

    #[test]
    fn test_relay_env_vars_override_files() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set("RELAY_SERVER__PORT", "4000");
        env.set("RELAY_RELAY__SECRET", "007");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load");
        assert_eq!(settings.server.port, 4000);
        assert_eq!(settings.relay.secret, "007");
    }

    #[test]
    fn test_legacy_env_vars_win() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set("RELAY_RELAY__SECRET", "relay-secret");
        env.set("SECRET_CODE_VALUE", "legacy-secret");
        env.set("PO_APP_ID", "legacy-app");
        env.set("PO_USER_ID", "legacy-user");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load");
        assert_eq!(settings.relay.secret, "legacy-secret");
        assert_eq!(settings.pushover.app_token, "legacy-app");
        assert_eq!(settings.pushover.user_key, "legacy-user");
    }

    #[test]
    fn test_single_file_mode() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let _env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("relay.toml", DEFAULT_TOML)]);

        let settings = ConfigLoader::new()
            .unwrap()
            .with_config_file(temp_dir.path().join("relay.toml"))
            .with_environment(AppEnvironment::Production)
            .load()
            .expect("Should load");
        assert_eq!(settings.relay.secret, "file-secret");
        assert_eq!(settings.application.environment, AppEnvironment::Production);
    }

    #[test]
    fn test_single_file_mode_missing_file() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let _env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[]);

        let result = ConfigLoader::new()
            .unwrap()
            .with_config_file(temp_dir.path().join("missing.toml"))
            .load();
        assert!(matches!(result, Err(ConfigError::FileNotFound(msg)) if msg.contains("missing.toml")));
    }
}
