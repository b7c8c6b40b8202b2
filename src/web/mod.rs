//! HTTP server for the tasork pages.
//!
//! The router is built around one [`AppContext`] per server instance. It
//! carries the backend client and the compiled route guard and is handed to
//! every handler through axum `State`, so there is no process-wide store.

mod config;
mod handlers;
mod notice;
mod pages;

pub use config::{AppConfig, DEFAULT_API_BASE_URL, DEFAULT_PROTECTED_PATH};

use crate::{
    backend::BackendClient,
    session::{route_guard, RouteGuard},
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use ulid::Ulid;

/// Path the resolve page sends the browser to after a successful exchange.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Per-instance state shared by every handler.
#[derive(Clone, Debug)]
pub struct AppContext {
    backend: Arc<BackendClient>,
    guard: Arc<RouteGuard>,
}

impl AppContext {
    /// Build the backend client and compile the protected paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend URL or a protected path pattern is invalid.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let backend = BackendClient::new(config.api_base_url(), config.request_timeout())
            .context("invalid backend configuration")?;
        let guard =
            RouteGuard::new(config.protected_paths()).context("invalid protected path pattern")?;

        Ok(Self {
            backend: Arc::new(backend),
            guard: Arc::new(guard),
        })
    }

    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    #[must_use]
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }
}

/// Build the page router with the route guard in front of every route.
#[must_use]
pub fn router(context: AppContext) -> Router {
    let guard = context.guard.clone();

    Router::new()
        .route("/", get(handlers::landing))
        .route("/auth/resolve", get(handlers::resolve))
        .route("/auth/session", get(handlers::session))
        .route("/auth/logout", get(handlers::logout).post(handlers::logout))
        .route(DASHBOARD_PATH, get(handlers::dashboard))
        .route("/unauthorized", get(handlers::unauthorized))
        .route("/health", get(handlers::health).options(handlers::health))
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(guard, route_guard))
        .with_state(context)
}

/// Serve the pages on `port` until ctrl-c or SIGTERM.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn new(port: u16, context: AppContext) -> Result<()> {
    let app = router(context).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span)),
    );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

// Cookies are left out of the span: they carry the session token.
fn make_span(request: &Request<Body>) -> Span {
    let method = request.method().as_str();
    let path = request.uri().path();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", method, path, request_id)
}
