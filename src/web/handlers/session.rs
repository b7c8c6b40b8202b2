use axum::{
    http::{header::CACHE_CONTROL, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::session::SessionOutcome;

/// Claim map of the current session as JSON, or 401 with the reason.
pub async fn session(outcome: SessionOutcome) -> Response {
    let no_store = [(CACHE_CONTROL, HeaderValue::from_static("no-store"))];
    match outcome {
        SessionOutcome::Authorized(identity) => (no_store, Json(identity)).into_response(),
        SessionOutcome::Unauthorized(reason) => (
            StatusCode::UNAUTHORIZED,
            no_store,
            Json(json!({ "reason": reason })),
        )
            .into_response(),
    }
}
