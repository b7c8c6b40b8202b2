use axum::{
    http::{header::SET_COOKIE, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use crate::session::ENTRY_PATH;

/// Cookies the backend sets on sign-in.
const SESSION_COOKIES: [&str; 3] = ["id_token", "access_token", "refresh_token"];

/// Expire the session cookies and return to the entry page.
pub async fn logout() -> Response {
    let mut response = Redirect::to(ENTRY_PATH).into_response();
    for name in SESSION_COOKIES {
        let cookie = format!("{name}=; Path=/; Max-Age=0; SameSite=Strict");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    info!("session cookies cleared");
    response
}
