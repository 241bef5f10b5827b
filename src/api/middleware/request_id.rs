//! Request ID middleware for request tracing.
//!
//! Every request carries an identifier for log correlation. A caller
//! supplied `x-request-id` is reused when it is short printable ASCII;
//! otherwise a fresh UUID is generated.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied ID that is propagated
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID stored in request extensions for downstream access.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

fn incoming_request_id(request: &Request) -> Option<String> {
    let value = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let acceptable = !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|b| b.is_ascii_graphic());
    acceptable.then(|| value.to_string())
}

/// Middleware that ensures every request has a request ID.
///
/// The ID is stored in request extensions and echoed in the response
/// headers.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(id: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/notify");
        if let Some(id) = id {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_incoming_request_id_accepted() {
        assert_eq!(
            incoming_request_id(&request_with(Some("abc-123"))).as_deref(),
            Some("abc-123")
        );
    }

    #[test]
    fn test_incoming_request_id_rejected() {
        assert!(incoming_request_id(&request_with(None)).is_none());
        assert!(incoming_request_id(&request_with(Some(""))).is_none());
        assert!(incoming_request_id(&request_with(Some("has space"))).is_none());

        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        assert!(incoming_request_id(&request_with(Some(&long))).is_none());
    }
}
