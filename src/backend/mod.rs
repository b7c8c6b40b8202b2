//! HTTP client for the tasork backend API.
//!
//! Only the two sign-in endpoints are used here: the hosted login URL and the
//! authorization-code exchange. Calls share one timeout policy and surface
//! sanitized error bodies. Nothing is retried.

mod error;

pub use error::BackendError;

use reqwest::{
    header::{HeaderValue, COOKIE, SET_COOKIE},
    Client, Response,
};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Default timeout applied to every backend call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters kept for logging.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Deserialize)]
struct LoginResponse {
    login_url: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Result of a successful authorization-code exchange.
#[derive(Debug, Default)]
pub struct CodeExchange {
    /// `Set-Cookie` headers to relay to the browser unchanged.
    pub cookies: Vec<HeaderValue>,
    /// JSON body, if the backend sent one. Not consumed by the sign-in flow.
    pub body: Option<Value>,
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Build a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not http(s) or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(base_url)
            .map_err(|err| BackendError::Config(format!("{base_url}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BackendError::Config(format!(
                "{base_url}: scheme must be http or https"
            )));
        }

        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|err| BackendError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim().trim_start_matches('/'))
    }

    /// Fetch the hosted login URL from `GET /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success status or an unexpected body.
    #[instrument(skip(self))]
    pub async fn login_url(&self) -> Result<String, BackendError> {
        let response = self.client.get(self.endpoint("/auth/login")).send().await?;
        let response = ensure_success(response).await?;
        let body: LoginResponse = response
            .json()
            .await
            .map_err(|err| BackendError::Parse(err.to_string()))?;
        Ok(body.login_url)
    }

    /// Exchange an authorization code through `GET /auth/token?code=...`.
    ///
    /// The browser's cookies are forwarded so the call behaves like a
    /// credentialed browser request. The code itself is never logged.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a non-success status.
    #[instrument(skip_all)]
    pub async fn exchange_code(
        &self,
        code: &str,
        cookies: Option<&HeaderValue>,
    ) -> Result<CodeExchange, BackendError> {
        let mut request = self
            .client
            .get(self.endpoint("/auth/token"))
            .query(&[("code", code)]);
        if let Some(cookies) = cookies {
            request = request.header(COOKIE, cookies.clone());
        }

        let response = ensure_success(request.send().await?).await?;
        let cookies: Vec<HeaderValue> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .cloned()
            .collect();
        let bytes = response.bytes().await?;

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(err) => {
                    debug!(error = %err, "ignoring non-json token response body");
                    None
                }
            }
        };

        debug!(cookies = cookies.len(), "authorization code exchanged");
        Ok(CodeExchange { cookies, body })
    }
}

/// Turn non-success responses into [`BackendError::Http`].
async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Http {
        status,
        message: error_message(&body),
    })
}

/// Prefer the `error` field of a JSON error body, otherwise the raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => sanitize_body(&parsed.error),
        Err(_) => sanitize_body(body),
    }
}

fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Unknown error".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
