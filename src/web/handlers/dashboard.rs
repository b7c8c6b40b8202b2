use axum::response::{Html, IntoResponse, Response};
use tracing::debug;

use crate::session::{SessionOutcome, ENTRY_PATH};
use crate::web::{notice::redirect_with_notice, pages};

/// Protected dashboard. Any unauthorized outcome goes back to the entry page.
pub async fn dashboard(outcome: SessionOutcome) -> Response {
    match outcome {
        SessionOutcome::Authorized(identity) => {
            debug!(sub = identity.sub(), "rendering dashboard");
            Html(pages::dashboard(&identity)).into_response()
        }
        SessionOutcome::Unauthorized(reason) => {
            debug!(reason = reason.as_str(), "dashboard access denied");
            redirect_with_notice(ENTRY_PATH, reason.notice())
        }
    }
}
