use crate::{
    cli::telemetry,
    session::PathMatcher,
    web::{self, AppConfig, AppContext},
};
use anyhow::Result;
use std::time::Duration;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub api_url: String,
    pub protected_paths: Vec<String>,
    pub request_timeout_seconds: u64,
}

impl Args {
    fn config(&self) -> AppConfig {
        AppConfig::new(self.api_url.clone())
            .with_protected_paths(&self.protected_paths)
            .with_request_timeout(Duration::from_secs(self.request_timeout_seconds))
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = args.config();
    let context = AppContext::new(&config)?;
    log_startup(args.port, &config, &context);

    let result = web::new(args.port, context).await;

    telemetry::shutdown_tracer();

    result
}

/// Compiled protected patterns, as the guard will apply them.
fn protected_patterns(context: &AppContext) -> String {
    context
        .guard()
        .matchers()
        .iter()
        .map(PathMatcher::pattern)
        .collect::<Vec<_>>()
        .join(", ")
}

fn log_startup(port: u16, config: &AppConfig, context: &AppContext) {
    let short_hash = crate::GIT_COMMIT_HASH.get(0..7).unwrap_or_default();
    info!(
        "tasork {} {short_hash}\n  listen: tcp:{port}\n  api_url: {}\n  protected_paths: {}\n  request_timeout: {}s",
        env!("CARGO_PKG_VERSION"),
        config.api_base_url(),
        protected_patterns(context),
        config.request_timeout().as_secs()
    );
}
