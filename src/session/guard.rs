//! Edge route guard.
//!
//! Runs before any page handler: a protected path requested without an
//! `id_token` cookie is redirected to the entry page. Presence of the cookie
//! is enough to pass; the claims are checked later by the resolver.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use regex::Regex;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use super::{cookie_value, ENTRY_PATH, SESSION_COOKIE_NAME};

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("protected path pattern must start with '/': {0}")]
    RelativePattern(String),
    #[error("invalid parameter in protected path pattern: {0}")]
    InvalidParameter(String),
    #[error("failed to compile protected path pattern {pattern}: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled protected-path pattern.
///
/// Literal segments match exactly; `:name` matches one segment, `:name?` an
/// optional one, `:name*` zero or more and `:name+` one or more. A single
/// trailing slash on the request path is tolerated.
#[derive(Clone, Debug)]
pub struct PathMatcher {
    pattern: String,
    regex: Regex,
}

impl PathMatcher {
    /// Compile a pattern such as `/dashboard` or `/tasks/:id*`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is relative or has an empty parameter name.
    pub fn new(pattern: &str) -> Result<Self, GuardError> {
        let pattern = pattern.trim();
        if !pattern.starts_with('/') {
            return Err(GuardError::RelativePattern(pattern.to_string()));
        }

        let mut source = String::from("^");
        for segment in pattern.split('/').filter(|s| !s.is_empty()) {
            source.push_str(&segment_source(pattern, segment)?);
        }
        source.push_str("/?$");

        let regex = Regex::new(&source).map_err(|source| GuardError::Regex {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

fn segment_source(pattern: &str, segment: &str) -> Result<String, GuardError> {
    let Some(param) = segment.strip_prefix(':') else {
        return Ok(format!("/{}", regex::escape(segment)));
    };

    let (name, source) = if let Some(name) = param.strip_suffix('*') {
        (name, "(?:/[^/]+)*")
    } else if let Some(name) = param.strip_suffix('+') {
        (name, "(?:/[^/]+)+")
    } else if let Some(name) = param.strip_suffix('?') {
        (name, "(?:/[^/]+)?")
    } else {
        (param, "/[^/]+")
    };

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(GuardError::InvalidParameter(pattern.to_string()));
    }

    Ok(source.to_string())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Redirect(&'static str),
    PassThrough,
}

/// Presence-only gate over a static set of protected paths.
#[derive(Clone, Debug)]
pub struct RouteGuard {
    matchers: Vec<PathMatcher>,
}

impl RouteGuard {
    /// Compile every protected pattern.
    ///
    /// # Errors
    ///
    /// Returns the first pattern that fails to compile.
    pub fn new<I, S>(patterns: I) -> Result<Self, GuardError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let matchers = patterns
            .into_iter()
            .map(|pattern| PathMatcher::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    #[must_use]
    pub fn matchers(&self) -> &[PathMatcher] {
        &self.matchers
    }

    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        self.matchers.iter().any(|matcher| matcher.matches(path))
    }

    /// Decide whether a request may continue.
    #[must_use]
    pub fn evaluate(&self, path: &str, headers: &HeaderMap) -> GuardDecision {
        if self.is_protected(path) && cookie_value(headers, SESSION_COOKIE_NAME).is_none() {
            GuardDecision::Redirect(ENTRY_PATH)
        } else {
            GuardDecision::PassThrough
        }
    }
}

/// axum middleware applying a [`RouteGuard`] to every request.
pub async fn route_guard(
    State(guard): State<Arc<RouteGuard>>,
    request: Request,
    next: Next,
) -> Response {
    match guard.evaluate(request.uri().path(), request.headers()) {
        GuardDecision::Redirect(location) => {
            debug!(path = request.uri().path(), "no session cookie, redirecting");
            Redirect::temporary(location).into_response()
        }
        GuardDecision::PassThrough => next.run(request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::COOKIE, header::LOCATION, HeaderValue, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn literal_pattern_matches_exact_path() -> Result<(), GuardError> {
        let matcher = PathMatcher::new("/dashboard")?;
        assert!(matcher.matches("/dashboard"));
        assert!(matcher.matches("/dashboard/"));
        assert!(!matcher.matches("/dashboards"));
        assert!(!matcher.matches("/dashboard/tasks"));
        assert!(!matcher.matches("/"));
        assert!(!matcher.matches("/tasks"));
        Ok(())
    }

    #[test]
    fn parameter_patterns() -> Result<(), GuardError> {
        let one = PathMatcher::new("/tasks/:id")?;
        assert!(one.matches("/tasks/42"));
        assert!(!one.matches("/tasks"));
        assert!(!one.matches("/tasks/42/history"));

        let many = PathMatcher::new("/tasks/:path*")?;
        assert!(many.matches("/tasks"));
        assert!(many.matches("/tasks/42/history"));

        let some = PathMatcher::new("/users/:path+")?;
        assert!(!some.matches("/users"));
        assert!(some.matches("/users/invite"));

        let optional = PathMatcher::new("/notifications/:id?")?;
        assert!(optional.matches("/notifications"));
        assert!(optional.matches("/notifications/7"));
        assert!(!optional.matches("/notifications/7/read"));
        Ok(())
    }

    #[test]
    fn literal_segments_are_escaped() -> Result<(), GuardError> {
        let matcher = PathMatcher::new("/a.b")?;
        assert!(matcher.matches("/a.b"));
        assert!(!matcher.matches("/axb"));
        Ok(())
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        assert!(matches!(
            PathMatcher::new("dashboard"),
            Err(GuardError::RelativePattern(_))
        ));
        assert!(matches!(
            PathMatcher::new("/tasks/:"),
            Err(GuardError::InvalidParameter(_))
        ));
        assert!(matches!(
            PathMatcher::new("/tasks/:a-b"),
            Err(GuardError::InvalidParameter(_))
        ));
    }

    #[test]
    fn guard_redirects_protected_path_without_cookie() -> Result<(), GuardError> {
        let guard = RouteGuard::new(["/dashboard"])?;
        assert_eq!(
            guard.evaluate("/dashboard", &HeaderMap::new()),
            GuardDecision::Redirect("/")
        );
        assert_eq!(
            guard.evaluate("/dashboard", &with_cookie("theme=dark")),
            GuardDecision::Redirect("/")
        );
        assert_eq!(
            guard.evaluate("/dashboard", &with_cookie("id_token=")),
            GuardDecision::Redirect("/")
        );
        Ok(())
    }

    #[test]
    fn guard_passes_any_non_empty_cookie() -> Result<(), GuardError> {
        let guard = RouteGuard::new(["/dashboard"])?;
        for value in ["id_token=not-a-jwt", "id_token=x", "a=1; id_token=h.p.s"] {
            assert_eq!(
                guard.evaluate("/dashboard", &with_cookie(value)),
                GuardDecision::PassThrough
            );
        }
        Ok(())
    }

    #[test]
    fn guard_ignores_unprotected_paths() -> Result<(), GuardError> {
        let guard = RouteGuard::new(["/dashboard"])?;
        for path in ["/", "/tasks", "/auth/resolve", "/dashboard/extra", "/health"] {
            assert!(!guard.is_protected(path));
            assert_eq!(
                guard.evaluate(path, &HeaderMap::new()),
                GuardDecision::PassThrough
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn middleware_redirects_before_handler_runs() -> anyhow::Result<()> {
        let guard = Arc::new(RouteGuard::new(["/dashboard"])?);
        let app = Router::new()
            .route("/dashboard", get(|| async { "secret" }))
            .route("/open", get(|| async { "open" }))
            .layer(from_fn_with_state(guard, route_guard));

        let response = app
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/dashboard?tab=tasks")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(LOCATION),
            Some(&HeaderValue::from_static("/"))
        );

        let response = app
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/dashboard")
                    .header(COOKIE, "id_token=not-a-jwt")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/open")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }
}
