use crate::cli::actions::{server::Args, Action};
use anyhow::{Context, Result};

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(3000);
    let api_url = matches
        .get_one::<String>("api-url")
        .cloned()
        .context("missing required argument: --api-url")?;
    let protected_paths = matches
        .get_many::<String>("protected-path")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let request_timeout_seconds = matches
        .get_one::<u64>("request-timeout")
        .copied()
        .unwrap_or(10);

    Ok(Action::Server(Args {
        port,
        api_url,
        protected_paths,
        request_timeout_seconds,
    }))
}
