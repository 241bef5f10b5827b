//! Notify relay core.
//!
//! A request passes through five checks in a fixed order (method, path,
//! body, fields, secret). The first failing check ends the request as a
//! [`Rejection`]; a request that passes all five is forwarded to the push
//! provider exactly once. Both ends are plain values so the HTTP layer can
//! map every outcome onto the same response shape.

use std::sync::Arc;

use axum::http::Method;
use tracing::{debug, error, warn};

use crate::models::{NotifyPayload, NotifyRequest};
use crate::services::notifications::{PushMessage, PushProvider, PushResult};
use crate::utils::secret::SharedSecret;

/// Path the relay listens on; a single trailing slash is also accepted
pub const NOTIFY_PATH: &str = "/notify";

/// Why a request was not forwarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Method,
    Path,
    MalformedBody,
    MissingFields,
    InvalidSecret,
}

impl Rejection {
    /// Diagnostic reason for the operational log, never sent to the caller
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::Method => "method not POST",
            Rejection::Path => "path not /notify",
            Rejection::MalformedBody => "failed to parse JSON body",
            Rejection::MissingFields => "missing secret or message",
            Rejection::InvalidSecret => "invalid secret",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

/// Result of the single delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Failed,
}

impl From<&PushResult> for Delivery {
    fn from(result: &PushResult) -> Self {
        if result.success {
            Delivery::Delivered
        } else {
            Delivery::Failed
        }
    }
}

/// Terminal state of one notify request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Rejected(Rejection),
    Forwarded(Delivery),
}

/// Stepwise request checks, in the order they must run
#[derive(Debug)]
pub struct RequestValidator {
    secret: SharedSecret,
}

impl RequestValidator {
    pub fn new(secret: SharedSecret) -> Self {
        Self { secret }
    }

    /// Only `POST` is accepted; method names are case-sensitive
    pub fn check_method(&self, method: &Method) -> Result<(), Rejection> {
        if method == Method::POST {
            Ok(())
        } else {
            Err(Rejection::Method)
        }
    }

    /// Exact match on the path component, query string excluded
    pub fn check_path(&self, path: &str) -> Result<(), Rejection> {
        match path.strip_prefix(NOTIFY_PATH) {
            Some("") | Some("/") => Ok(()),
            _ => Err(Rejection::Path),
        }
    }

    /// Decode the body as a JSON object.
    ///
    /// Anything that is not an object, or an object whose `secret` or
    /// `message` is neither a string nor null, is malformed.
    pub fn parse_body(&self, body: &[u8]) -> Result<NotifyPayload, Rejection> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|_| Rejection::MalformedBody)?;

        if !value.is_object() {
            return Err(Rejection::MalformedBody);
        }

        serde_json::from_value(value).map_err(|_| Rejection::MalformedBody)
    }

    pub fn check_fields(&self, payload: NotifyPayload) -> Result<NotifyRequest, Rejection> {
        NotifyRequest::from_payload(payload).ok_or(Rejection::MissingFields)
    }

    pub fn check_secret(&self, request: &NotifyRequest) -> Result<(), Rejection> {
        if self.secret.matches(&request.secret) {
            Ok(())
        } else {
            Err(Rejection::InvalidSecret)
        }
    }

    /// Run the body, fields and secret checks
    pub fn validate(&self, body: &[u8]) -> Result<NotifyRequest, Rejection> {
        let payload = self.parse_body(body)?;
        let request = self.check_fields(payload)?;
        self.check_secret(&request)?;
        Ok(request)
    }
}

/// Validates notify requests and forwards accepted ones.
///
/// Cloning is cheap; the validator and provider are shared.
#[derive(Clone)]
pub struct RelayService {
    validator: Arc<RequestValidator>,
    provider: Arc<dyn PushProvider>,
}

impl RelayService {
    pub fn new(secret: SharedSecret, provider: Arc<dyn PushProvider>) -> Self {
        Self {
            validator: Arc::new(RequestValidator::new(secret)),
            provider,
        }
    }

    /// Method and path checks, run before the body is read
    pub fn admit(&self, method: &Method, path: &str) -> Result<(), RelayOutcome> {
        self.validator
            .check_method(method)
            .and_then(|_| self.validator.check_path(path))
            .map_err(|rejection| self.reject(rejection))
    }

    /// Validate an admitted request body and forward it when it passes.
    ///
    /// Each call is its own delivery attempt; identical bodies are sent
    /// again.
    pub async fn relay(&self, body: &[u8]) -> RelayOutcome {
        match self.validator.validate(body) {
            Ok(request) => RelayOutcome::Forwarded(self.forward(request).await),
            Err(rejection) => self.reject(rejection),
        }
    }

    /// Record a rejection and end the request
    pub fn reject(&self, rejection: Rejection) -> RelayOutcome {
        warn!(reason = rejection.reason(), "Notify request rejected");
        RelayOutcome::Rejected(rejection)
    }

    async fn forward(&self, request: NotifyRequest) -> Delivery {
        let message = PushMessage::new(request.message);
        let result = self.provider.send(&message).await;
        let delivery = Delivery::from(&result);

        match delivery {
            Delivery::Delivered => debug!(
                provider = self.provider.name(),
                status_code = ?result.status_code,
                duration_ms = result.duration_ms,
                "Notification delivered"
            ),
            Delivery::Failed => error!(
                provider = self.provider.name(),
                status_code = ?result.status_code,
                detail = ?result.response,
                duration_ms = result.duration_ms,
                "Notification delivery failed"
            ),
        }

        delivery
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notifications::testing::RecordingProvider;
    use proptest::prelude::*;

    fn validator(secret: &str) -> RequestValidator {
        RequestValidator::new(SharedSecret::new(secret))
    }

    fn service(secret: &str, provider: Arc<RecordingProvider>) -> RelayService {
        RelayService::new(SharedSecret::new(secret), provider)
    }

    #[test]
    fn test_check_method() {
        let v = validator("s3cr3t");
        assert!(v.check_method(&Method::POST).is_ok());
        assert_eq!(v.check_method(&Method::GET), Err(Rejection::Method));
        assert_eq!(v.check_method(&Method::PUT), Err(Rejection::Method));

        let lowercase = Method::from_bytes(b"post").unwrap();
        assert_eq!(v.check_method(&lowercase), Err(Rejection::Method));
    }

    #[test]
    fn test_check_path() {
        let v = validator("s3cr3t");
        assert!(v.check_path("/notify").is_ok());
        assert!(v.check_path("/notify/").is_ok());

        for path in ["/", "", "/Notify", "/notify//", "/notify/x", "/notifyx", "/api/notify"] {
            assert_eq!(v.check_path(path), Err(Rejection::Path), "path {path:?}");
        }
    }

    #[test]
    fn test_parse_body_shapes() {
        let v = validator("s3cr3t");

        let payload = v.parse_body(br#"{"secret":"a","message":"b","extra":[1]}"#).unwrap();
        assert_eq!(payload.secret.as_deref(), Some("a"));
        assert_eq!(payload.message.as_deref(), Some("b"));

        for body in [
            &b""[..],
            b"not json",
            b"{\"secret\":",
            b"null",
            b"42",
            b"\"text\"",
            b"[\"a\",\"b\"]",
            br#"{"secret":5,"message":"b"}"#,
            br#"{"secret":"a","message":{"text":"b"}}"#,
        ] {
            assert_eq!(v.parse_body(body), Err(Rejection::MalformedBody));
        }
    }

    #[test]
    fn test_validate_order() {
        let v = validator("s3cr3t");
        assert_eq!(v.validate(b"{"), Err(Rejection::MalformedBody));
        assert_eq!(v.validate(b"{}"), Err(Rejection::MissingFields));
        assert_eq!(
            v.validate(br#"{"secret":"s3cr3t","message":""}"#),
            Err(Rejection::MissingFields)
        );
        assert_eq!(
            v.validate(br#"{"secret":null,"message":"hi"}"#),
            Err(Rejection::MissingFields)
        );
        assert_eq!(
            v.validate(br#"{"secret":"wrong!","message":"hi"}"#),
            Err(Rejection::InvalidSecret)
        );
        assert_eq!(
            v.validate(br#"{"secret":"s3cr3t","message":"hi"}"#).unwrap().message,
            "hi"
        );
    }

    #[test]
    fn test_rejection_reasons_are_distinct() {
        let all = [
            Rejection::Method,
            Rejection::Path,
            Rejection::MalformedBody,
            Rejection::MissingFields,
            Rejection::InvalidSecret,
        ];
        let mut reasons: Vec<_> = all.iter().map(Rejection::reason).collect();
        reasons.sort();
        reasons.dedup();
        assert_eq!(reasons.len(), all.len());
        assert_eq!(Rejection::InvalidSecret.to_string(), "invalid secret");
    }

    #[test]
    fn test_admit() {
        let provider = Arc::new(RecordingProvider::succeeding());
        let relay = service("s3cr3t", provider.clone());

        assert!(relay.admit(&Method::POST, "/notify/").is_ok());
        assert_eq!(
            relay.admit(&Method::GET, "/notify"),
            Err(RelayOutcome::Rejected(Rejection::Method))
        );
        assert_eq!(
            relay.admit(&Method::POST, "/other"),
            Err(RelayOutcome::Rejected(Rejection::Path))
        );
        assert!(provider.sent().is_empty());
    }

    #[tokio::test]
    async fn test_relay_delivers_with_correct_secret() {
        let provider = Arc::new(RecordingProvider::succeeding());
        let relay = service("s3cr3t", provider.clone());

        let outcome = relay.relay(br#"{"secret":"s3cr3t","message":"hi"}"#).await;

        assert_eq!(outcome, RelayOutcome::Forwarded(Delivery::Delivered));
        assert_eq!(provider.sent(), vec!["hi".to_string()]);
    }

    #[tokio::test]
    async fn test_relay_never_forwards_wrong_secret() {
        let provider = Arc::new(RecordingProvider::succeeding());
        let relay = service("other", provider.clone());

        let outcome = relay.relay(br#"{"secret":"s3cr3t","message":"hi"}"#).await;

        assert_eq!(outcome, RelayOutcome::Rejected(Rejection::InvalidSecret));
        assert!(provider.sent().is_empty());
    }

    #[tokio::test]
    async fn test_relay_reports_failed_delivery() {
        let provider = Arc::new(RecordingProvider::failing());
        let relay = service("s3cr3t", provider.clone());

        let outcome = relay.relay(br#"{"secret":"s3cr3t","message":"hi"}"#).await;

        assert_eq!(outcome, RelayOutcome::Forwarded(Delivery::Failed));
        assert_eq!(provider.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_replay_sends_twice() {
        let provider = Arc::new(RecordingProvider::succeeding());
        let relay = service("s3cr3t", provider.clone());
        let body = br#"{"secret":"s3cr3t","message":"again"}"#;

        relay.relay(body).await;
        relay.relay(body).await;

        assert_eq!(provider.sent(), vec!["again".to_string(), "again".to_string()]);
    }

    proptest! {
        #[test]
        fn prop_wrong_secret_rejected(candidate in "[ -~]{1,32}") {
            prop_assume!(candidate != "s3cr3t");
            let v = validator("s3cr3t");
            let body = serde_json::json!({ "secret": candidate, "message": "hi" }).to_string();
            prop_assert_eq!(v.validate(body.as_bytes()), Err(Rejection::InvalidSecret));
        }

        #[test]
        fn prop_arbitrary_bytes_never_panic(body in proptest::collection::vec(any::<u8>(), 0..256)) {
            let v = validator("s3cr3t");
            prop_assert!(v.validate(&body).is_err());
        }
    }
}
