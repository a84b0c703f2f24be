//! Search client configuration loaded via OrthoConfig.
//!
//! Values come from `MOVIES_*` environment variables or a configuration file.
//! Scalars carry OrthoConfig defaults so an empty environment still yields a
//! complete struct; string overrides fall back to built-in values.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

/// Public OMDb endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";
/// Shared demo key accepted by the public endpoint.
pub const DEFAULT_API_KEY: &str = "248f795";

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid base URL {value:?}: {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base URL {value:?} must use http or https")]
    UnsupportedScheme { value: String },
}

/// Configuration values for the search client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MOVIES")]
pub struct MovieSearchSettings {
    /// API endpoint override.
    pub base_url: Option<String>,
    /// API key override.
    pub api_key: Option<String>,
    /// Connect and read timeout in seconds.
    #[ortho_config(default = 30)]
    pub timeout_secs: u64,
    /// Pause after a failed page before pagination resumes, in milliseconds.
    #[ortho_config(default = 2000)]
    pub pagination_cooldown_ms: u64,
}

impl MovieSearchSettings {
    /// Return the configured endpoint, falling back to the public OMDb URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the override is not an http(s) URL.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let url = Url::parse(raw).map_err(|source| SettingsError::InvalidBaseUrl {
            value: raw.to_owned(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(SettingsError::UnsupportedScheme {
                value: raw.to_owned(),
            }),
        }
    }

    /// Return the configured API key, falling back to the demo key.
    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or(DEFAULT_API_KEY)
    }

    /// Return the transport timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Return the pagination failure cooldown.
    pub fn pagination_cooldown(&self) -> Duration {
        Duration::from_millis(self.pagination_cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for search client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 4] = [
        "MOVIES_BASE_URL",
        "MOVIES_API_KEY",
        "MOVIES_TIMEOUT_SECS",
        "MOVIES_PAGINATION_COOLDOWN_MS",
    ];

    fn load_from_empty_args() -> MovieSearchSettings {
        MovieSearchSettings::load_from_iter([OsString::from("movie-search")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.base_url().expect("default url").as_str(),
            DEFAULT_BASE_URL
        );
        assert_eq!(settings.api_key(), DEFAULT_API_KEY);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.pagination_cooldown(), Duration::from_millis(2_000));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("MOVIES_BASE_URL", Some("http://127.0.0.1:8080/".to_owned())),
            ("MOVIES_API_KEY", Some("k3y".to_owned())),
            ("MOVIES_TIMEOUT_SECS", Some("5".to_owned())),
            ("MOVIES_PAGINATION_COOLDOWN_MS", Some("250".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.base_url().expect("override url").as_str(),
            "http://127.0.0.1:8080/"
        );
        assert_eq!(settings.api_key(), "k3y");
        assert_eq!(settings.timeout(), Duration::from_secs(5));
        assert_eq!(settings.pagination_cooldown(), Duration::from_millis(250));
    }

    #[rstest]
    fn string_override_alone_keeps_scalar_defaults() {
        let _guard = lock_env([
            ("MOVIES_BASE_URL", None::<String>),
            ("MOVIES_API_KEY", Some("k3y".to_owned())),
            ("MOVIES_TIMEOUT_SECS", None),
            ("MOVIES_PAGINATION_COOLDOWN_MS", None),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.api_key(), "k3y");
        assert!(settings.base_url.is_none());
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.pagination_cooldown_ms, 2_000);
    }

    #[rstest]
    #[case::not_a_url("not a url")]
    #[case::ftp("ftp://example.com/")]
    fn rejects_unusable_base_urls(#[case] raw: &str) {
        let settings = MovieSearchSettings {
            base_url: Some(raw.to_owned()),
            api_key: None,
            timeout_secs: 30,
            pagination_cooldown_ms: 2_000,
        };

        assert!(settings.base_url().is_err());
    }
}
