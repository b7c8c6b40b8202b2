use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid backend configuration: {0}")]
    Config(String),
    #[error("unable to reach the backend: {0}")]
    Network(#[source] reqwest::Error),
    #[error("backend request timed out")]
    Timeout,
    #[error("request failed ({status}): {message}")]
    Http { status: StatusCode, message: String },
    #[error("failed to decode response: {0}")]
    Parse(String),
}

impl BackendError {
    /// HTTP status returned by the backend, if it answered at all.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }
}
