//! HTTP client for the planning backend.
//!
//! The [`Client`] turns a logical endpoint call into exactly one HTTP request and
//! normalizes the outcome into a decoded payload or an [`ApiError`]. Use
//! [`ClientBuilder`] to configure and create clients.

use crate::{
    config::ClientConfig,
    error::DECODE_ERROR,
    request::{RequestDescriptor, RequestOptions},
    ApiError, Response, Result,
};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A client for the planning backend.
///
/// Cheap to clone; clones share the connection pool and configuration.
///
/// # Examples
///
/// ```no_run
/// use lineplanner_client::{Client, ClientConfig};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Health {
///     status: String,
/// }
///
/// # async fn example() -> lineplanner_client::Result<()> {
/// let client = Client::builder()
///     .config(ClientConfig::from_env())
///     .build()?;
///
/// let health: Health = client.get("/health").await?;
/// println!("backend is {}", health.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    config: ClientConfig,
}

impl Client {
    /// Creates a new `ClientBuilder` with the default configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client from an explicit configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        ClientBuilder::new().config(config).build()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Calls `endpoint` and decodes the payload.
    ///
    /// Issues exactly one request; wrap the call in [`retry`](crate::retry::retry)
    /// for resilience. On failure the error is:
    ///
    /// * status `0`, code `NETWORK_ERROR` if no response was received,
    /// * the response status with the server's code (or `UNKNOWN_ERROR`) for non-2xx
    ///   responses,
    /// * the response status with code `DECODE_ERROR` if a 2xx body does not decode
    ///   into `T`.
    ///
    /// JSON responses are decoded as JSON. Any other content type is treated as
    /// text, which decodes into `String` or `serde_json::Value`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lineplanner_client::{Client, RequestOptions};
    /// use http::Method;
    ///
    /// # async fn example() -> lineplanner_client::Result<()> {
    /// let client = Client::builder().build()?;
    ///
    /// let options = RequestOptions::new(Method::POST)
    ///     .json(&serde_json::json!({ "stations": [] }))?;
    /// let coverage: serde_json::Value = client.call("/coverage-info/osm", options).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<T>(&self, endpoint: &str, options: RequestOptions) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send(endpoint, options).await.map(Response::into_data)
    }

    /// Like [`Client::call`], but keeps the status, headers, raw body and latency.
    pub async fn send<T>(&self, endpoint: &str, options: RequestOptions) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        let request = RequestDescriptor::build(&self.inner.config, endpoint, options)?;
        let start_time = Instant::now();
        let response = self.execute(request).await?;
        self.parse_response(response, start_time).await
    }

    /// Dispatches a resolved request.
    async fn execute(&self, request: RequestDescriptor) -> Result<reqwest::Response> {
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            timeout_ms = request.timeout.as_millis(),
            "Executing HTTP request"
        );

        let method = request.method.clone();
        let url = request.url.clone();

        let mut builder = self
            .inner
            .http_client
            .request(request.method, request.url)
            .headers(request.headers)
            .timeout(request.timeout);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        builder.send().await.map_err(|e| {
            tracing::warn!(
                error = %e,
                method = %method,
                url = %url,
                timeout = e.is_timeout(),
                "No response received"
            );
            ApiError::from(e)
        })
    }

    /// Normalizes a received response into a payload or an error.
    async fn parse_response<T>(
        &self,
        response: reqwest::Response,
        start_time: Instant,
    ) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            // An unreadable body is treated like an undecodable one.
            let raw_response = response.text().await.unwrap_or_default();
            let latency = start_time.elapsed();

            if status.is_server_error() {
                tracing::warn!(
                    status = status.as_u16(),
                    latency_ms = latency.as_millis(),
                    response = %raw_response,
                    "Server error (5xx)"
                );
            } else {
                tracing::error!(
                    status = status.as_u16(),
                    latency_ms = latency.as_millis(),
                    response = %raw_response,
                    "Request rejected"
                );
            }

            return Err(ApiError::from_error_body(status.as_u16(), &raw_response));
        }

        let raw_body = response.text().await.map_err(|e| {
            tracing::warn!(error = %e, status = status.as_u16(), "Failed to read response body");
            ApiError::network(e.to_string())
        })?;
        let latency = start_time.elapsed();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );

        match decode_body::<T>(&headers, &raw_body) {
            Ok(data) => Ok(Response::new(data, raw_body, status, headers, latency)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %raw_body,
                    "Failed to decode response"
                );

                Err(ApiError::new(
                    format!("Failed to decode response: {}", e),
                    status.as_u16(),
                    DECODE_ERROR,
                )
                .with_details(serde_json::json!({ "raw_response": raw_body })))
            }
        }
    }

    /// Makes a GET request to `endpoint`.
    pub async fn get<T>(&self, endpoint: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.call(endpoint, RequestOptions::new(Method::GET)).await
    }

    /// Makes a POST request to `endpoint` with `body` as JSON.
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::new(Method::POST).json(body)?;
        self.call(endpoint, options).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Decodes a 2xx body according to its declared content type.
fn decode_body<T>(headers: &HeaderMap, raw_body: &str) -> serde_json::Result<T>
where
    T: DeserializeOwned,
{
    if is_json(headers) {
        serde_json::from_str(raw_body)
    } else {
        serde_json::from_value(serde_json::Value::String(raw_body.to_owned()))
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use lineplanner_client::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> lineplanner_client::Result<()> {
/// let client = ClientBuilder::new()
///     .base_url("https://planner.example.org/api/v1")?
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the base URL.
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_REQUEST` error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        url::Url::parse(url.as_ref())?;
        self.base_url = Some(url.as_ref().to_string());
        Ok(self)
    }

    /// Sets the default request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_REQUEST` error if the HTTP client cannot be created.
    pub fn build(self) -> Result<Client> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| self.config.base_url().to_string());
        let timeout = self.timeout.unwrap_or_else(|| self.config.timeout());
        let config = ClientConfig::new(base_url, timeout)?;

        let http_client = reqwest::Client::builder().build().map_err(|e| {
            ApiError::invalid_request(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                config,
            }),
        })
    }
}
