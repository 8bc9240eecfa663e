//! # lineplanner-client - HTTP client for the transit line planning backend
//!
//! A typed async client for the planning backend (station coverage, optimal
//! station search, population layers, health probes), plus the resilience
//! helpers the planner front-end wraps around it.
//!
//! Every call issues exactly one HTTP request and ends in exactly one of two
//! outcomes: the decoded payload, or an [`ApiError`] carrying the HTTP status
//! (`0` when no response arrived), a machine-readable code, and any structured
//! details the server sent.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lineplanner_client::types::{Station, StationInfoRequest};
//! use lineplanner_client::{retry::retry, Client, ClientConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lineplanner_client::ApiError> {
//!     // LINEPLANNER_API_BASE_URL / LINEPLANNER_API_TIMEOUT_MS, or the defaults
//!     let client = Client::new(ClientConfig::from_env())?;
//!
//!     let request = StationInfoRequest {
//!         stations: vec![Station {
//!             id: "hbf".to_string(),
//!             lat: 48.140,
//!             lng: 11.558,
//!             name: Some("Hauptbahnhof".to_string()),
//!         }],
//!         separation_distance: Some(300),
//!         method: None,
//!         routing: None,
//!     };
//!
//!     // station-info is a pure query, so it is safe to retry
//!     let info = retry(|| client.station_info(&request), 3, Duration::from_millis(200)).await?;
//!     println!("{}", info);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```no_run
//! use lineplanner_client::{error::NETWORK_ERROR, Client};
//!
//! # async fn example(client: Client) {
//! match client.layers().await {
//!     Ok(layers) => println!("{}", layers),
//!     Err(e) if e.code() == NETWORK_ERROR => eprintln!("backend unreachable: {}", e),
//!     Err(e) => eprintln!("HTTP {} {}: {}", e.status(), e.code(), e.message()),
//! }
//! # }
//! ```
//!
//! ## Retries
//!
//! [`retry::retry`] and [`retry::retry_with`] retry every failure; they do not
//! distinguish a 400 from a 503. Wrap only idempotent calls.

mod client;
pub mod config;
pub mod debounce;
mod endpoints;
pub mod error;
pub mod request;
mod response;
pub mod retry;
pub mod types;

pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use debounce::Debouncer;
pub use error::{ApiError, Result};
pub use request::RequestOptions;
pub use response::Response;
pub use retry::RetryStrategy;
