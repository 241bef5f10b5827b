//! Application state for Axum web framework.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::AppResult;
use crate::external::build_http_client;
use crate::services::notifications::{PushProvider, PushoverProvider};
use crate::services::relay::RelayService;
use crate::utils::secret::SharedSecret;

/// Application state shared by every request handler.
///
/// Read-only after startup. Cloning is cheap since the relay service
/// holds its parts behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Validates notify requests and forwards accepted ones
    pub relay: RelayService,
    /// Upper bound on the notify body size
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(relay: RelayService, max_body_bytes: usize) -> Self {
        Self {
            relay,
            max_body_bytes,
        }
    }

    /// Build the state for the given settings with an explicit provider
    pub fn with_provider(settings: &Settings, provider: Arc<dyn PushProvider>) -> Self {
        let secret = SharedSecret::new(settings.relay.secret.clone());
        Self::new(
            RelayService::new(secret, provider),
            settings.server.max_body_bytes,
        )
    }

    /// Build the production state: a pooled HTTP client and the Pushover provider
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let client = build_http_client().map_err(anyhow::Error::from)?;
        let provider = PushoverProvider::new(client, settings.pushover.clone());
        Ok(Self::with_provider(settings, Arc::new(provider)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.relay.secret = "s3cr3t".to_string();
        settings.server.max_body_bytes = 1024;

        let state = AppState::from_settings(&settings).unwrap();
        assert_eq!(state.max_body_bytes, 1024);
    }
}
