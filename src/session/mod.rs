//! Session cookie handling shared by the route guard and the session resolver.
//!
//! The `id_token` cookie is written by the backend during the code exchange.
//! This module only ever reads it. Two layers consume it with different
//! strictness:
//!
//! - [`RouteGuard`] checks presence only and runs before routing.
//! - [`resolve`] decodes the claims and requires `email` and `sub`.
//!
//! Neither verifies the signature or expiry of the token.

mod claims;
mod guard;
mod resolver;

pub use claims::{decode_claims, DecodeError, DecodedIdentity, MissingClaim};
pub use guard::{route_guard, GuardDecision, GuardError, PathMatcher, RouteGuard};
pub use resolver::{resolve, resolve_headers, Notice, SessionOutcome, UnauthorizedReason};

use axum::http::{header::COOKIE, HeaderMap};
use secrecy::SecretString;

/// Cookie holding the identity token issued by the identity provider.
pub const SESSION_COOKIE_NAME: &str = "id_token";

/// Public entry page every failed session check lands on.
pub const ENTRY_PATH: &str = "/";

/// Read the session token from the request cookies.
///
/// An empty value counts as absent.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<SecretString> {
    cookie_value(headers, SESSION_COOKIE_NAME).map(SecretString::from)
}

/// Find a cookie by name across every `Cookie` header of the request.
pub(crate) fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let key = parts.next()?.trim();
            let val = parts.next()?.trim();
            let val = val
                .strip_prefix('"')
                .and_then(|quoted| quoted.strip_suffix('"'))
                .unwrap_or(val);
            (key == name && !val.is_empty()).then(|| val.to_string())
        })
}
