use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::web::{notice, pages, AppContext};

/// Entry page with the hosted login link.
///
/// A backend failure is logged and the link target is left empty.
pub async fn landing(State(context): State<AppContext>, headers: HeaderMap) -> Response {
    let login_url = match context.backend().login_url().await {
        Ok(url) => url,
        Err(err) => {
            error!("Failed to fetch login URL: {err}");
            String::new()
        }
    };

    let pending = notice::pending(&headers);
    let html = Html(pages::landing(&login_url, pending));

    if pending.is_some() {
        ([(SET_COOKIE, notice::clear_cookie())], html).into_response()
    } else {
        html.into_response()
    }
}
