//! One-shot notices carried across a redirect in a short-lived cookie.

use axum::{
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};

use crate::session::{cookie_value, Notice};

const NOTICE_COOKIE_NAME: &str = "tasork_notice";
const NOTICE_TTL_SECONDS: u32 = 60;

/// Redirect to `location` and leave `notice` for the next page.
pub(super) fn redirect_with_notice(location: &str, notice: Notice) -> Response {
    let mut response = Redirect::to(location).into_response();
    let cookie = format!(
        "{NOTICE_COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={NOTICE_TTL_SECONDS}",
        notice.code()
    );
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

/// Notice left by a previous redirect, if any.
pub(super) fn pending(headers: &HeaderMap) -> Option<Notice> {
    cookie_value(headers, NOTICE_COOKIE_NAME).and_then(|code| Notice::from_code(&code))
}

pub(super) fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("tasork_notice=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
