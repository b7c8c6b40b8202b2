//! Unverified JWT claim decoding.
//!
//! Only the payload segment is read. The header and signature are ignored,
//! so a decoded identity proves nothing about who issued the token.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

const EMAIL_CLAIM: &str = "email";
const SUBJECT_CLAIM: &str = "sub";
const TENANT_ID_CLAIM: &str = "custom:tenantId";
const TENANT_NAME_CLAIM: &str = "custom:tenantName";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid token format: missing payload segment")]
    TokenFormat,
    #[error("invalid base64url encoding")]
    Base64,
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
    #[error("token payload is not a json object")]
    NotAnObject,
}

/// A required claim that was absent, empty or not a string.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("missing required claim: {0}")]
pub struct MissingClaim(pub &'static str);

/// Decode the payload segment of a compact JWT into its claim map.
///
/// # Errors
///
/// Returns an error if the token has no payload segment, the segment is not
/// base64url, or it does not hold a JSON object.
pub fn decode_claims(token: &str) -> Result<Map<String, Value>, DecodeError> {
    let payload = token
        .split('.')
        .nth(1)
        .map(|segment| segment.trim_end_matches('='))
        .filter(|segment| !segment.is_empty())
        .ok_or(DecodeError::TokenFormat)?;

    let bytes = Base64UrlUnpadded::decode_vec(payload).map_err(|_| DecodeError::Base64)?;

    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(claims) => Ok(claims),
        _ => Err(DecodeError::NotAnObject),
    }
}

/// Claims of a session token that carries both `email` and `sub`.
///
/// Serializes back to the full claim map, unknown claims included.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DecodedIdentity {
    claims: Map<String, Value>,
}

impl DecodedIdentity {
    /// Validate the minimal claim set.
    ///
    /// # Errors
    ///
    /// Returns the first of `email` or `sub` that is not a non-empty string.
    pub fn from_claims(claims: Map<String, Value>) -> Result<Self, MissingClaim> {
        for required in [EMAIL_CLAIM, SUBJECT_CLAIM] {
            if string_claim(&claims, required).is_none() {
                return Err(MissingClaim(required));
            }
        }
        Ok(Self { claims })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        string_claim(&self.claims, EMAIL_CLAIM).unwrap_or_default()
    }

    #[must_use]
    pub fn sub(&self) -> &str {
        string_claim(&self.claims, SUBJECT_CLAIM).unwrap_or_default()
    }

    #[must_use]
    pub fn tenant_id(&self) -> Option<&str> {
        string_claim(&self.claims, TENANT_ID_CLAIM)
    }

    #[must_use]
    pub fn tenant_name(&self) -> Option<&str> {
        string_claim(&self.claims, TENANT_NAME_CLAIM)
    }

    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    #[must_use]
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }
}

fn string_claim<'a>(claims: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    claims
        .get(name)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use base64ct::{Base64UrlUnpadded, Encoding};
    use serde_json::Value;

    /// Build a compact token with a throwaway header and signature.
    pub(crate) fn unsigned(claims: &Value) -> String {
        let header = Base64UrlUnpadded::encode_string(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = Base64UrlUnpadded::encode_string(claims.to_string().as_bytes());
        format!("{header}.{payload}.c2lnbmF0dXJl")
    }
}
