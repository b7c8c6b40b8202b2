use crate::backend::DEFAULT_TIMEOUT;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_PROTECTED_PATH: &str = "/dashboard";

#[derive(Clone, Debug)]
pub struct AppConfig {
    api_base_url: String,
    protected_paths: Vec<String>,
    request_timeout: Duration,
}

impl AppConfig {
    #[must_use]
    pub fn new(api_base_url: String) -> Self {
        let api_base_url = normalize(&api_base_url).unwrap_or(DEFAULT_API_BASE_URL);

        Self {
            api_base_url: api_base_url.to_string(),
            protected_paths: vec![DEFAULT_PROTECTED_PATH.to_string()],
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace the protected paths. Blank entries are dropped; an empty set
    /// keeps [`DEFAULT_PROTECTED_PATH`] so the guard is never disabled.
    #[must_use]
    pub fn with_protected_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths: Vec<String> = paths
            .into_iter()
            .filter_map(|path| normalize(path.as_ref()).map(ToString::to_string))
            .collect();

        self.protected_paths = if paths.is_empty() {
            warn!("no protected paths configured, using {DEFAULT_PROTECTED_PATH}");
            vec![DEFAULT_PROTECTED_PATH.to_string()]
        } else {
            paths
        };
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    #[must_use]
    pub fn protected_paths(&self) -> &[String] {
        &self.protected_paths
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

fn normalize(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
