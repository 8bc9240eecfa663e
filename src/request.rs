//! Per-call request options and the outbound request they resolve to.

use crate::{config::ClientConfig, ApiError, Result};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Caller-supplied options for a single call.
///
/// Everything is optional: the method defaults to `GET`, headers and timeout
/// fall back to the client defaults.
///
/// # Examples
///
/// ```
/// use lineplanner_client::RequestOptions;
/// use http::Method;
/// use std::time::Duration;
///
/// # fn example() -> lineplanner_client::Result<()> {
/// let options = RequestOptions::new(Method::POST)
///     .json(&serde_json::json!({ "stations": [] }))?
///     .with_header("x-request-id", "42")?
///     .with_timeout(Duration::from_secs(5));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// The HTTP method.
    pub method: Method,

    /// Serialized JSON body, if any.
    pub body: Option<String>,

    /// Headers that override the defaults.
    pub headers: HeaderMap,

    /// Timeout override for this call.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Creates options for the given method with no body or overrides.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    /// Serializes `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_REQUEST` error if the body cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let json = serde_json::to_string(body).map_err(|e| {
            ApiError::invalid_request(format!("Failed to serialize request: {}", e))
        })?;
        self.body = Some(json);
        Ok(self)
    }

    /// Adds a header override.
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_REQUEST` error if the header name or value is invalid.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| ApiError::invalid_request(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ApiError::invalid_request(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Overrides the client's default timeout for this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A fully resolved outbound request. Built fresh for every call.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub url: Url,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl RequestDescriptor {
    /// Resolves `options` for `endpoint` against the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_REQUEST` error if the endpoint is empty or does not form
    /// a valid URL with the base URL.
    pub fn build(config: &ClientConfig, endpoint: &str, options: RequestOptions) -> Result<Self> {
        if endpoint.trim().is_empty() {
            return Err(ApiError::invalid_request("Endpoint must not be empty"));
        }

        Ok(Self {
            url: config.endpoint_url(endpoint)?,
            method: options.method,
            headers: merge_headers(default_headers(), options.headers),
            body: options.body,
            timeout: options.timeout.unwrap_or_else(|| config.timeout()),
        })
    }
}

/// `Content-Type` and `Accept` set to JSON.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let json = HeaderValue::from_static("application/json");
    headers.insert(CONTENT_TYPE, json.clone());
    headers.insert(ACCEPT, json);
    headers
}

/// Overlays `overrides` onto `defaults`; an override replaces every default value
/// stored under the same (case-insensitive) name.
pub fn merge_headers(mut defaults: HeaderMap, overrides: HeaderMap) -> HeaderMap {
    let mut current: Option<HeaderName> = None;
    for (name, value) in overrides {
        // `None` names continue the previous header's values.
        match name {
            Some(name) => {
                defaults.insert(name.clone(), value);
                current = Some(name);
            }
            None => {
                if let Some(name) = &current {
                    defaults.append(name.clone(), value);
                }
            }
        }
    }
    defaults
}
