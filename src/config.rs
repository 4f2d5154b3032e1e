use url::Url;

use crate::cli::Cli;
use crate::error::Error;

/// Loads environment variables from the selected `.env` file.
///
/// Runs before clap parsing so the `env = "MAILCOW_*"` fallbacks on the CLI
/// flags can see the file's values; that forces a manual scan of the raw
/// arguments for `-s`/`--select-env`. A missing file is not an error.
pub fn load_env_file() {
    let name = env_file_name(std::env::args().skip(1));
    let _ = dotenvy::from_filename(name);
}

fn env_file_name(mut args: impl Iterator<Item = String>) -> String {
    let mut selected = None;

    while let Some(arg) = args.next() {
        if arg == "-s" || arg == "--select-env" {
            selected = args.next();
        } else if let Some(name) = arg.strip_prefix("--select-env=") {
            selected = Some(name.to_string());
        }
    }

    match selected {
        Some(name) if !name.is_empty() => format!(".env.{name}"),
        _ => ".env".to_string(),
    }
}

/// Resolved connection settings, threaded explicitly into the client and the
/// commands. No code past this point reads the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Server origin without a trailing slash, e.g. `https://mail.example.com`.
    pub api_url: String,
    pub api_key: String,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self, Error> {
        let api_url = cli
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::config("missing Mailcow server URL; pass --api-url or set MAILCOW_API_URL")
            })?;

        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::config("missing API key; pass --api-key or set MAILCOW_API_KEY")
            })?;

        let parsed = Url::parse(api_url)
            .map_err(|e| Error::config(format!("invalid API URL {api_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "API URL must use http or https: {api_url}"
            )));
        }

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Parses a CLI with MAILCOW_* cleared so the developer's shell cannot
    /// leak into the env fallbacks.
    fn with_clean_env<T>(f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap();
        let keys = ["MAILCOW_API_URL", "MAILCOW_API_KEY"];
        let saved: Vec<_> = keys.iter().map(|k| (k, std::env::var(k).ok())).collect();
        for key in keys {
            std::env::remove_var(key);
        }

        let result = f();

        for (key, value) in saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
        result
    }

    fn cli(args: &[&str]) -> Cli {
        // A subcommand is mandatory; any one works for settings resolution.
        let mut argv = vec!["mailcow"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["transport", "get"]);
        Cli::try_parse_from(argv).expect("parse")
    }

    #[test]
    fn settings_require_url_and_key() {
        with_clean_env(|| {
            let err = Settings::from_cli(&cli(&["--api-key", "k"])).unwrap_err();
            assert!(err.to_string().contains("MAILCOW_API_URL"));

            let err =
                Settings::from_cli(&cli(&["--api-url", "https://mail.example.com"])).unwrap_err();
            assert!(err.to_string().contains("MAILCOW_API_KEY"));
        });
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        with_clean_env(|| {
            let settings = Settings::from_cli(&cli(&[
                "--api-url",
                "https://mail.example.com/",
                "--api-key",
                "k",
            ]))
            .unwrap();
            assert_eq!(settings.api_url, "https://mail.example.com");
        });
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        with_clean_env(|| {
            let err = Settings::from_cli(&cli(&["--api-url", "ftp://mail", "--api-key", "k"]))
                .unwrap_err();
            assert!(matches!(err, Error::Config(_)));
        });
    }

    #[test]
    fn select_env_picks_the_named_file() {
        let args = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert_eq!(env_file_name(args(&[]).into_iter()), ".env");
        assert_eq!(
            env_file_name(args(&["-s", "staging", "jobs", "get"]).into_iter()),
            ".env.staging"
        );
        assert_eq!(
            env_file_name(args(&["--select-env", "prod"]).into_iter()),
            ".env.prod"
        );
        assert_eq!(
            env_file_name(args(&["--select-env=dev"]).into_iter()),
            ".env.dev"
        );
    }
}
