mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("tasork")
        .about("tasork web edge: sign-in handoff and protected pages")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("3000")
                .env("TASORK_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the tasork backend API")
                .default_value(crate::web::DEFAULT_API_BASE_URL)
                .env("TASORK_API_URL"),
        )
        .arg(
            Arg::new("protected-path")
                .long("protected-path")
                .help("Path pattern that requires a session cookie, e.g. /dashboard or /tasks/:id*")
                .default_value(crate::web::DEFAULT_PROTECTED_PATH)
                .env("TASORK_PROTECTED_PATHS")
                .value_delimiter(',')
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("request-timeout")
                .long("request-timeout")
                .help("Timeout in seconds for backend calls")
                .default_value("10")
                .env("TASORK_REQUEST_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..)),
        );

    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV_VARS: [&str; 5] = [
        "TASORK_PORT",
        "TASORK_API_URL",
        "TASORK_PROTECTED_PATHS",
        "TASORK_REQUEST_TIMEOUT",
        "TASORK_LOG_LEVEL",
    ];

    fn without_env<F: FnOnce()>(f: F) {
        temp_env::with_vars(ENV_VARS.map(|name| (name, None::<String>)), f);
    }

    #[test]
    fn test_new() {
        let command = new();
        assert_eq!(command.get_name(), "tasork");
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        without_env(|| {
            let matches = new().get_matches_from(vec!["tasork"]);
            assert_eq!(matches.get_one::<u16>("port").copied(), Some(3000));
            assert_eq!(
                matches.get_one::<String>("api-url").cloned(),
                Some("http://localhost:8080".to_string())
            );
            let paths: Vec<&String> = matches
                .get_many::<String>("protected-path")
                .map(|values| values.collect())
                .unwrap_or_default();
            assert_eq!(paths, ["/dashboard"]);
            assert_eq!(matches.get_one::<u64>("request-timeout").copied(), Some(10));
        });
    }

    #[test]
    fn test_repeated_protected_paths() {
        without_env(|| {
            let matches = new().get_matches_from(vec![
                "tasork",
                "--protected-path",
                "/dashboard",
                "--protected-path",
                "/tasks/:id*,/settings",
            ]);
            let paths: Vec<&String> = matches
                .get_many::<String>("protected-path")
                .map(|values| values.collect())
                .unwrap_or_default();
            assert_eq!(paths, ["/dashboard", "/tasks/:id*", "/settings"]);
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("TASORK_PORT", Some("443")),
                ("TASORK_API_URL", Some("https://api.tasork.dev")),
                ("TASORK_PROTECTED_PATHS", Some("/dashboard,/reports/:id")),
                ("TASORK_REQUEST_TIMEOUT", Some("4")),
                ("TASORK_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["tasork"]);
                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>("api-url").cloned(),
                    Some("https://api.tasork.dev".to_string())
                );
                let paths: Vec<&String> = matches
                    .get_many::<String>("protected-path")
                    .map(|values| values.collect())
                    .unwrap_or_default();
                assert_eq!(paths, ["/dashboard", "/reports/:id"]);
                assert_eq!(matches.get_one::<u64>("request-timeout").copied(), Some(4));
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        without_env(|| {
            let result = new().try_get_matches_from(vec!["tasork", "--request-timeout", "0"]);
            assert!(result.is_err());
        });
    }
}
