//! Landing point for the identity provider redirect.
//!
//! Flow Overview: take the `code` query parameter, exchange it once through
//! the backend and relay the backend's `Set-Cookie` headers to the browser.
//! Any failure sends the browser back to the entry page with no cookie set.
//!
//! The request arrives from the identity provider, so it is cross-site. The
//! backend's cookies are `SameSite=Strict` and a redirect from here would
//! still be cross-site, leaving the guard without `id_token`. On success the
//! page renders in place and moves on to the dashboard from our own origin.

use axum::{
    extract::State,
    http::{
        header::{CACHE_CONTROL, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, Uri,
    },
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::{error, info, warn};

use crate::session::ENTRY_PATH;
use crate::web::{pages, AppContext, DASHBOARD_PATH};

pub async fn resolve(State(context): State<AppContext>, uri: Uri, headers: HeaderMap) -> Response {
    let Some(code) = authorization_code(&uri) else {
        warn!("resolve page reached without an authorization code");
        return Redirect::to(ENTRY_PATH).into_response();
    };

    match context
        .backend()
        .exchange_code(&code, headers.get(COOKIE))
        .await
    {
        Ok(exchange) => {
            info!(cookies = exchange.cookies.len(), "sign-in completed");
            let mut response = (
                [(CACHE_CONTROL, HeaderValue::from_static("no-store"))],
                Html(pages::signed_in(DASHBOARD_PATH)),
            )
                .into_response();
            for cookie in exchange.cookies {
                response.headers_mut().append(SET_COOKIE, cookie);
            }
            response
        }
        Err(err) => {
            error!("Failed to exchange authorization code: {err}");
            Redirect::to(ENTRY_PATH).into_response()
        }
    }
}

/// First non-blank `code` parameter of the query string.
fn authorization_code(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
