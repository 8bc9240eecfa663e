//! Decoded payload together with the details of the HTTP exchange.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A successful response from the planning backend.
///
/// [`Client::call`](crate::Client::call) hands back only [`Response::data`];
/// [`Client::send`](crate::Client::send) returns the whole value for callers that
/// need the status, headers, or timing.
///
/// # Examples
///
/// ```no_run
/// use lineplanner_client::{Client, RequestOptions};
///
/// # async fn example() -> lineplanner_client::Result<()> {
/// let client = Client::builder().build()?;
///
/// let layers = client
///     .send::<serde_json::Value>("/layers", RequestOptions::default())
///     .await?;
///
/// println!("{} layers in {:?}", layers.as_array().map_or(0, Vec::len), layers.latency);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded payload.
    pub data: T,

    /// The raw response body.
    pub raw_body: String,

    /// The HTTP status code.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from dispatch until the body was read.
    pub latency: Duration,
}

impl<T> Response<T> {
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
        }
    }

    /// Maps the payload, keeping the exchange details.
    ///
    /// ```
    /// # use lineplanner_client::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     serde_json::json!({ "status": "healthy" }),
    ///     r#"{"status":"healthy"}"#.to_string(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(12),
    /// );
    ///
    /// let status = response.map(|v| v["status"].as_str().unwrap_or_default().to_string());
    /// assert_eq!(status.data, "healthy");
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
        }
    }

    /// Consumes the response, returning the payload.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Returns a header value by name, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
