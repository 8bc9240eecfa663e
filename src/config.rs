//! Process-wide client configuration.
//!
//! The base URL and default timeout are resolved once, usually at startup, and
//! injected into the [`Client`](crate::Client) when it is built.

use crate::Result;
use std::time::Duration;
use url::Url;

/// Environment variable holding the backend base URL.
pub const BASE_URL_VAR: &str = "LINEPLANNER_API_BASE_URL";

/// Environment variable holding the default request timeout in milliseconds.
pub const TIMEOUT_MS_VAR: &str = "LINEPLANNER_API_TIMEOUT_MS";

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Base URL and default timeout shared by every request a client makes.
///
/// # Examples
///
/// ```
/// use lineplanner_client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::from_lookup(|key| match key {
///     "LINEPLANNER_API_TIMEOUT_MS" => Some("5000".to_string()),
///     _ => None,
/// });
///
/// assert_eq!(config.base_url().as_str(), "http://localhost:8080/api/v1");
/// assert_eq!(config.timeout(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration from an explicit base URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_REQUEST` error if the URL cannot be parsed.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url.as_ref())?,
            timeout,
        })
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to the defaults for
    /// missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR)
            .and_then(|raw| match Url::parse(raw.trim()) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(
                        var = BASE_URL_VAR,
                        value = %raw,
                        error = %e,
                        "Ignoring invalid base URL"
                    );
                    None
                }
            })
            .unwrap_or_else(default_base_url);

        let timeout = lookup(TIMEOUT_MS_VAR)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self { base_url, timeout }
    }

    /// The base URL endpoints are appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The timeout applied to requests that do not override it.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Joins an endpoint path onto the base URL.
    ///
    /// The join is a concatenation, so a path prefix on the base URL such as
    /// `/api/v1` is kept.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let separator = if endpoint.starts_with('/') { "" } else { "/" };
        Ok(Url::parse(&format!("{}{}{}", base, separator, endpoint))?)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = ClientConfig::from_lookup(|_| None);

        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_millis(30_000));
    }

    #[test]
    fn test_values_from_lookup() {
        let config = ClientConfig::from_lookup(|key| match key {
            BASE_URL_VAR => Some("https://planner.example.org/api/v2".to_string()),
            TIMEOUT_MS_VAR => Some(" 1500 ".to_string()),
            _ => None,
        });

        assert_eq!(
            config.base_url().as_str(),
            "https://planner.example.org/api/v2"
        );
        assert_eq!(config.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ClientConfig::from_lookup(|key| match key {
            BASE_URL_VAR => Some("not a url".to_string()),
            TIMEOUT_MS_VAR => Some("soon".to_string()),
            _ => None,
        });

        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let config = ClientConfig::default();

        assert_eq!(
            config.endpoint_url("/station-info").unwrap().as_str(),
            "http://localhost:8080/api/v1/station-info"
        );
        assert_eq!(
            config.endpoint_url("layers").unwrap().as_str(),
            "http://localhost:8080/api/v1/layers"
        );
    }

    #[test]
    fn test_endpoint_url_trailing_slash_base() {
        let config = ClientConfig::new("http://127.0.0.1:9000/", DEFAULT_TIMEOUT).unwrap();

        assert_eq!(
            config.endpoint_url("/health").unwrap().as_str(),
            "http://127.0.0.1:9000/health"
        );
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let err = ClientConfig::new("::nope", DEFAULT_TIMEOUT).unwrap_err();
        assert_eq!(err.code(), crate::error::INVALID_REQUEST);
    }
}
