//! Inbound notify request models.
//!
//! Neither type derives a printing `Debug`: both carry the caller's secret.

use serde::Deserialize;

/// Raw notify body as decoded from JSON.
///
/// Both fields are optional here; presence is checked separately so a
/// missing field and an empty one are rejected the same way.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotifyPayload {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl std::fmt::Debug for NotifyPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyPayload")
            .field("has_secret", &self.secret.is_some())
            .field("message_len", &self.message.as_ref().map(String::len))
            .finish()
    }
}

/// A well-formed notify request: both fields present and non-empty
#[derive(Clone, PartialEq, Eq)]
pub struct NotifyRequest {
    pub secret: String,
    pub message: String,
}

impl NotifyRequest {
    /// Promote a payload, returning `None` when either field is missing or empty
    pub fn from_payload(payload: NotifyPayload) -> Option<Self> {
        match (payload.secret, payload.message) {
            (Some(secret), Some(message)) if !secret.is_empty() && !message.is_empty() => {
                Some(Self { secret, message })
            }
            _ => None,
        }
    }
}

impl std::fmt::Debug for NotifyRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyRequest")
            .field("secret", &"[REDACTED]")
            .field("message_len", &self.message.len())
            .finish()
    }
}
