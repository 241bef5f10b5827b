//! Pushover provider implementation.
//!
//! Submits messages to the Pushover message API as a URL-encoded form.
//!
//! Pushover API Reference: https://pushover.net/api

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use super::provider::{PushMessage, PushProvider, PushResult};
use crate::config::PushoverConfig;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Longest provider reply kept for diagnostics
const MAX_DETAIL_CHARS: usize = 256;

/// Form body of a message submission.
///
/// Field order is the wire order: `token`, `user`, `message`, then any
/// configured extras.
#[derive(Serialize)]
struct PushoverRequest<'a> {
    token: &'a str,
    user: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<i8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<&'a str>,
}

/// Reply body Pushover sends for both accepted and rejected submissions
#[derive(Debug, Deserialize)]
struct PushoverResponse {
    request: Option<String>,
    errors: Option<Vec<String>>,
}

/// Pushover push provider
///
/// Holds the shared HTTP client; cloning the provider shares its
/// connection pool.
#[derive(Clone)]
pub struct PushoverProvider {
    client: reqwest::Client,
    config: PushoverConfig,
}

impl PushoverProvider {
    pub fn new(client: reqwest::Client, config: PushoverConfig) -> Self {
        Self { client, config }
    }

    /// Encodes the form body for one message
    fn build_form(&self, message: &PushMessage) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(PushoverRequest {
            token: &self.config.app_token,
            user: &self.config.user_key,
            message: &message.body,
            title: self.config.title.as_deref(),
            device: self.config.device.as_deref(),
            priority: self.config.priority,
            sound: self.config.sound.as_deref(),
        })
    }
}

/// Condense a provider reply into a log-friendly detail string
fn describe_reply(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<PushoverResponse>(body) {
        Ok(PushoverResponse {
            errors: Some(errors),
            ..
        }) if !errors.is_empty() => Some(errors.join("; ")),
        Ok(reply) => reply.request.map(|id| format!("request {}", id)),
        Err(_) => Some(body.chars().take(MAX_DETAIL_CHARS).collect()),
    }
}

#[async_trait]
impl PushProvider for PushoverProvider {
    /// Sends a message via Pushover
    ///
    /// Success means the endpoint answered with a 2xx status. Any other
    /// status, and any transport failure (connect, DNS, TLS, timeout),
    /// is reported as `success: false`.
    async fn send(&self, message: &PushMessage) -> PushResult {
        let start = Instant::now();

        let form = match self.build_form(message) {
            Ok(form) => form,
            Err(e) => {
                return PushResult {
                    success: false,
                    status_code: None,
                    response: Some(format!("form encoding failed: {}", e)),
                    duration_ms: start.elapsed().as_millis() as u64,
                };
            }
        };

        let mut request = self
            .client
            .post(&self.config.api_url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form);

        if let Some(seconds) = self.config.timeout_seconds {
            request = request.timeout(Duration::from_secs(seconds));
        }

        let response = request.send().await;

        match response {
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();

                PushResult {
                    success: status.is_success(),
                    status_code: Some(status.as_u16()),
                    response: describe_reply(&body),
                    duration_ms: start.elapsed().as_millis() as u64,
                }
            }
            Err(e) => PushResult {
                success: false,
                status_code: None,
                response: Some(e.to_string()),
                duration_ms: start.elapsed().as_millis() as u64,
            },
        }
    }

    fn name(&self) -> &'static str {
        "pushover"
    }
}
