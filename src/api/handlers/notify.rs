//! The notify handler.

use axum::{
    Json,
    body::to_bytes,
    extract::{Request, State},
};

use crate::api::dto::NotifyResponse;
use crate::services::relay::Rejection;
use crate::state::AppState;

/// Handle any request the router receives.
///
/// Method and path are checked before the body is touched. The body is
/// read up to `server.max_body_bytes`; a body that cannot be read within
/// that limit is treated as malformed. The response is always `200 OK`
/// with the uniform JSON body.
pub async fn notify(State(state): State<AppState>, request: Request) -> Json<NotifyResponse> {
    let (parts, body) = request.into_parts();

    let outcome = match state.relay.admit(&parts.method, parts.uri.path()) {
        Err(outcome) => outcome,
        Ok(()) => match to_bytes(body, state.max_body_bytes).await {
            Ok(bytes) => state.relay.relay(&bytes).await,
            Err(_) => state.relay.reject(Rejection::MalformedBody),
        },
    };

    Json(NotifyResponse::for_outcome(&outcome))
}
