//! # Tasork (web edge)
//!
//! `tasork` serves the browser-facing pages of the tasork task manager and
//! owns the sign-in handoff with the tasork backend API.
//!
//! ## Session flow
//!
//! 1. **Login link:** the landing page asks the backend for the hosted login
//!    URL (`GET /auth/login`) and links to it.
//! 2. **Code exchange:** the identity provider sends the browser back to
//!    `/auth/resolve?code=...`; the code is exchanged through
//!    `GET /auth/token` and the backend's `Set-Cookie` headers (including
//!    `id_token`) are relayed to the browser.
//! 3. **Route guard:** every request to a protected path without an
//!    `id_token` cookie is redirected to `/` before any handler runs.
//! 4. **Session resolver:** protected pages decode the `id_token` claims and
//!    require `email` and `sub`; anything else sends the user back to `/`.
//!
//! Neither layer verifies the token signature or expiry. They exist for UX
//! only; the backend must authorize every API call on its own.

pub mod backend;
pub mod cli;
pub mod session;
pub mod web;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
