//! Session resolver for protected pages.
//!
//! Flow Overview: read the `id_token` cookie, decode its claims without
//! verification, and require `email` and `sub`. The outcome is returned as a
//! value; the caller decides whether to redirect, render or answer 401.

use axum::http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, warn};

use super::{claims::decode_claims, session_token, DecodedIdentity};

/// Why a request was not given an identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnauthorizedReason {
    /// No session cookie on the request.
    MissingCredential,
    /// Cookie present but not decodable into a claim map.
    MalformedCredential,
    /// Claims decoded but `email` or `sub` is missing.
    IncompleteCredential,
}

impl UnauthorizedReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::MalformedCredential => "malformed_credential",
            Self::IncompleteCredential => "incomplete_credential",
        }
    }

    /// Notice shown on the entry page. Malformed and incomplete share one.
    #[must_use]
    pub const fn notice(self) -> Notice {
        match self {
            Self::MissingCredential => Notice::SessionEnded,
            Self::MalformedCredential | Self::IncompleteCredential => Notice::Unauthorized,
        }
    }
}

/// Transient, user-visible message shown once on the entry page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    SessionEnded,
    Unauthorized,
}

impl Notice {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::SessionEnded => "session_ended",
            Self::Unauthorized => "unauthorized",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "session_ended" => Some(Self::SessionEnded),
            "unauthorized" => Some(Self::Unauthorized),
            _ => None,
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::SessionEnded => "Session ended. Please log in again.",
            Self::Unauthorized => "Unauthorized. Try logging in again.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionOutcome {
    Authorized(DecodedIdentity),
    Unauthorized(UnauthorizedReason),
}

impl SessionOutcome {
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }

    #[must_use]
    pub fn identity(&self) -> Option<&DecodedIdentity> {
        match self {
            Self::Authorized(identity) => Some(identity),
            Self::Unauthorized(_) => None,
        }
    }

    #[must_use]
    pub fn into_identity(self) -> Option<DecodedIdentity> {
        match self {
            Self::Authorized(identity) => Some(identity),
            Self::Unauthorized(_) => None,
        }
    }
}

/// Resolve a session token into an identity.
///
/// Structural validation only: expiry and signature are never checked.
#[must_use]
pub fn resolve(token: Option<&SecretString>) -> SessionOutcome {
    let Some(token) = token else {
        debug!("no session cookie");
        return SessionOutcome::Unauthorized(UnauthorizedReason::MissingCredential);
    };

    let claims = match decode_claims(token.expose_secret()) {
        Ok(claims) => claims,
        Err(err) => {
            warn!(error = %err, "session cookie could not be decoded");
            return SessionOutcome::Unauthorized(UnauthorizedReason::MalformedCredential);
        }
    };

    match DecodedIdentity::from_claims(claims) {
        Ok(identity) => SessionOutcome::Authorized(identity),
        Err(err) => {
            warn!(error = %err, "session cookie is missing required claims");
            SessionOutcome::Unauthorized(UnauthorizedReason::IncompleteCredential)
        }
    }
}

/// Resolve the session from the request cookies.
#[must_use]
pub fn resolve_headers(headers: &HeaderMap) -> SessionOutcome {
    resolve(session_token(headers).as_ref())
}

#[cfg(test)]
mod tests {
    use super::super::claims::test_tokens::unsigned;
    use super::*;
    use axum::http::{header::COOKIE, HeaderValue};
    use base64ct::{Base64UrlUnpadded, Encoding};
    use serde_json::{json, Value};

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn missing_cookie_is_missing_credential() {
        let outcome = resolve(None);
        assert_eq!(
            outcome,
            SessionOutcome::Unauthorized(UnauthorizedReason::MissingCredential)
        );
        assert_eq!(
            UnauthorizedReason::MissingCredential.notice(),
            Notice::SessionEnded
        );
    }

    #[test]
    fn undecodable_cookies_are_malformed() {
        let bad_json = format!("h.{}.s", Base64UrlUnpadded::encode_string(b"nope"));
        for value in ["not-a-jwt", "a.b.c", "a..c", "a.!!!!.c", bad_json.as_str()] {
            let outcome = resolve(Some(&secret(value)));
            assert_eq!(
                outcome,
                SessionOutcome::Unauthorized(UnauthorizedReason::MalformedCredential),
                "cookie {value:?} should be malformed"
            );
            assert!(outcome.identity().is_none());
        }
    }

    #[test]
    fn tokens_without_email_or_sub_are_incomplete() {
        let cases = [
            json!({"sub": "abc"}),
            json!({"email": "a@b.com"}),
            json!({}),
            json!({"custom:tenantId": "t1", "name": "Ada", "email_verified": true}),
        ];
        for claims in cases {
            let outcome = resolve(Some(&secret(&unsigned(&claims))));
            assert_eq!(
                outcome,
                SessionOutcome::Unauthorized(UnauthorizedReason::IncompleteCredential),
                "claims {claims} should be rejected"
            );
        }
        assert_eq!(
            UnauthorizedReason::IncompleteCredential.notice(),
            UnauthorizedReason::MalformedCredential.notice()
        );
    }

    #[test]
    fn complete_token_yields_full_claim_map() {
        let claims = json!({"email": "a@b.com", "sub": "abc"});
        let outcome = resolve(Some(&secret(&unsigned(&claims))));
        assert!(outcome.is_authorized());
        let identity = outcome.into_identity();
        assert_eq!(
            identity.and_then(|i| serde_json::to_value(i).ok()),
            Some(claims)
        );
    }

    #[test]
    fn resolver_is_not_a_security_boundary() {
        // Expired token with a bogus signature is still accepted.
        let claims = json!({"email": "a@b.com", "sub": "abc", "exp": 1, "iss": "https://evil.example"});
        let token = unsigned(&claims);
        let outcome = resolve(Some(&secret(&token)));
        assert_eq!(
            outcome.identity().map(DecodedIdentity::sub),
            Some("abc"),
            "resolver must only check structure"
        );
    }

    #[test]
    fn resolve_headers_reads_id_token_cookie() {
        let token = unsigned(&json!({"email": "a@b.com", "sub": "abc"}));
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("other=1; id_token={token}")).unwrap(),
        );
        let outcome = resolve_headers(&headers);
        assert_eq!(outcome.identity().map(DecodedIdentity::email), Some("a@b.com"));

        assert_eq!(
            resolve_headers(&HeaderMap::new()),
            SessionOutcome::Unauthorized(UnauthorizedReason::MissingCredential)
        );
    }

    #[test]
    fn notice_codes_round_trip() {
        for notice in [Notice::SessionEnded, Notice::Unauthorized] {
            assert_eq!(Notice::from_code(notice.code()), Some(notice));
        }
        assert_eq!(Notice::from_code("bogus"), None);
    }

    #[test]
    fn reason_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_value(UnauthorizedReason::MalformedCredential).ok(),
            Some(Value::String("malformed_credential".to_string()))
        );
    }
}
