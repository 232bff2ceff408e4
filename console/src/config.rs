//! Console configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The configured base URL does not parse.
    #[error("invalid record store URL {value:?}: {message}")]
    InvalidBaseUrl {
        /// Configured text.
        value: String,
        /// Parser detail.
        message: String,
    },
    /// A zero timeout would fail every request.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Record store connection settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FLEET_CONSOLE")]
pub struct ConsoleSettings {
    /// Base URL under which the record collections live.
    pub api_base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

impl ConsoleSettings {
    /// Return the configured base URL text, falling back to the default.
    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// Parse the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBaseUrl`] when the value does not parse.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let value = self.api_base_url();
        Url::parse(value).map_err(|error| SettingsError::InvalidBaseUrl {
            value: value.to_owned(),
            message: error.to_string(),
        })
    }

    /// Return the request timeout, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] when configured as zero.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS) {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for console configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ConsoleSettings {
        ConsoleSettings::load_from_iter([OsString::from("fleet-console")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("FLEET_CONSOLE_API_BASE_URL", None::<String>),
            ("FLEET_CONSOLE_REQUEST_TIMEOUT_SECS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(settings.request_timeout(), Ok(Duration::from_secs(30)));
        assert_eq!(
            settings.base_url().map(String::from),
            Ok("http://localhost:8080/api".to_owned())
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "FLEET_CONSOLE_API_BASE_URL",
                Some("https://fleet.example.com/store".to_owned()),
            ),
            ("FLEET_CONSOLE_REQUEST_TIMEOUT_SECS", Some("5".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.api_base_url(), "https://fleet.example.com/store");
        assert_eq!(settings.request_timeout(), Ok(Duration::from_secs(5)));
    }

    #[rstest]
    fn blank_base_url_falls_back_to_default() {
        let settings = ConsoleSettings {
            api_base_url: Some("   ".to_owned()),
            request_timeout_secs: None,
        };
        assert_eq!(settings.api_base_url(), DEFAULT_API_BASE_URL);
    }

    #[rstest]
    fn invalid_values_are_reported() {
        let settings = ConsoleSettings {
            api_base_url: Some("not a url".to_owned()),
            request_timeout_secs: Some(0),
        };
        assert!(matches!(
            settings.base_url(),
            Err(SettingsError::InvalidBaseUrl { .. })
        ));
        assert_eq!(settings.request_timeout(), Err(SettingsError::ZeroTimeout));
    }
}
