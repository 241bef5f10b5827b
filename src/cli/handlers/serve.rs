//! Serve command handler
//!
//! Runs the relay server, or validates and summarises the configuration
//! for `serve --dry-run`.

use crate::config::Settings;
use crate::error::AppResult;
use crate::server::Server;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the serve command
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Server startup errors (if not dry-run)
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            self.validate_only()
        } else {
            Server::new(self.config).run().await?;
            Ok(())
        }
    }

    /// Validate configuration and print a summary without starting the server
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        for line in self.summary() {
            println!("{}", line);
        }
        println!("Dry run completed successfully - configuration is ready for deployment");

        Ok(())
    }

    /// Human-readable configuration summary; credentials appear only as set/unset
    pub fn summary(&self) -> Vec<String> {
        let config = &self.config;
        let presence = |value: &str| if value.is_empty() { "unset" } else { "set" };

        let mut lines = vec![
            "✓ Configuration is valid".to_string(),
            format!("✓ Environment: {}", config.application.environment),
            format!("✓ Server would bind to: {}", config.server.address()),
            format!("✓ Maximum body size: {} bytes", config.server.max_body_bytes),
            format!("✓ Shared secret: {}", presence(&config.relay.secret)),
            format!("✓ Pushover endpoint: {}", config.pushover.api_url),
            format!("✓ Pushover app token: {}", presence(&config.pushover.app_token)),
            format!("✓ Pushover user key: {}", presence(&config.pushover.user_key)),
        ];

        lines.push(match config.pushover.timeout_seconds {
            Some(seconds) => format!("✓ Delivery timeout: {}s", seconds),
            None => "✓ Delivery timeout: transport default".to_string(),
        });
        lines.push(format!("✓ Log level: {}", config.logger.level));

        lines
    }
}
