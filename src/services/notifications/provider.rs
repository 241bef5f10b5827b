//! Core push provider trait and types.
//!
//! This module provides the abstraction for push providers so the relay
//! core can be exercised without a real provider behind it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message to be delivered by a push provider
#[derive(Clone, Serialize, Deserialize)]
pub struct PushMessage {
    /// Message text, forwarded verbatim
    pub body: String,
}

impl PushMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl std::fmt::Debug for PushMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushMessage")
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// Result of a push delivery attempt
///
/// Transport failures are reported here as well (`success: false`,
/// no status code) rather than as errors: the relay treats every kind of
/// failure the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushResult {
    /// Whether the provider accepted the message (HTTP 2xx)
    pub success: bool,
    /// HTTP status code, absent when no response arrived
    pub status_code: Option<u16>,
    /// Provider detail or transport error, for diagnostics only
    pub response: Option<String>,
    /// Time taken for the operation in milliseconds
    pub duration_ms: u64,
}

/// Trait for push notification providers
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// All providers must be Send + Sync for use across request tasks.
///
/// # Example Implementation
/// ```ignore
/// use async_trait::async_trait;
///
/// pub struct NtfyProvider {
///     config: NtfyConfig,
/// }
///
/// #[async_trait]
/// impl PushProvider for NtfyProvider {
///     async fn send(&self, message: &PushMessage) -> PushResult {
///         // Implementation here
///     }
///
///     fn name(&self) -> &'static str {
///         "ntfy"
///     }
/// }
/// ```
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Makes exactly one delivery attempt, without retries
    async fn send(&self, message: &PushMessage) -> PushResult;

    /// Returns the provider name for logging
    fn name(&self) -> &'static str;
}
