//! Page and endpoint handlers.
//!
//! Protected pages take a [`SessionOutcome`] extractor and decide what to do
//! with an unauthorized outcome themselves.

mod dashboard;
mod health;
mod landing;
mod logout;
mod resolve;
mod session;
mod unauthorized;

pub(super) use dashboard::dashboard;
pub(super) use health::health;
pub(super) use landing::landing;
pub(super) use logout::logout;
pub(super) use resolve::resolve;
pub(super) use session::session;
pub(super) use unauthorized::{not_found, unauthorized};

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

use crate::session::{resolve_headers, SessionOutcome};

impl<S> FromRequestParts<S> for SessionOutcome
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(resolve_headers(&parts.headers))
    }
}
