//! Probes a running planning backend and prints what it reports.
//!
//! This example shows how to:
//! - Build a client from `LINEPLANNER_API_BASE_URL` / `LINEPLANNER_API_TIMEOUT_MS`
//! - Retry an idempotent call with exponential backoff
//! - Branch on `ApiError` status and code
//! - Coalesce rapid requests with a debouncer
//!
//! Run with: `cargo run --example probe_backend`

use lineplanner_client::error::NETWORK_ERROR;
use lineplanner_client::retry::{retry, retry_with};
use lineplanner_client::types::{Station, StationInfoRequest};
use lineplanner_client::{ApiError, Client, ClientConfig, Debouncer, RetryStrategy};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    tracing_subscriber::fmt()
        .with_env_filter("lineplanner_client=debug,probe_backend=info")
        .init();

    let client = Client::new(ClientConfig::from_env())?;
    println!("Backend: {}", client.config().base_url());

    println!("=== Health ===");
    match retry(|| client.health(), 2, Duration::from_millis(250)).await {
        Ok(health) => println!(
            "{} (version {}, at {})",
            health.status, health.version, health.timestamp
        ),
        Err(e) if e.code() == NETWORK_ERROR => {
            eprintln!("Backend unreachable: {}", e);
            return Ok(());
        }
        Err(e) => return Err(e),
    }

    println!("=== Readiness ===");
    match retry_with(&RetryStrategy::default_backoff(), || client.ready()).await {
        Ok(ready) => println!("{} (layers loaded: {})", ready.status, ready.layers_loaded),
        Err(e) => eprintln!("Not ready: HTTP {} {}: {}", e.status(), e.code(), e.message()),
    }

    println!("=== Station info ===");
    let request = StationInfoRequest {
        stations: vec![
            Station {
                id: "marienplatz".to_string(),
                lat: 48.1374,
                lng: 11.5755,
                name: Some("Marienplatz".to_string()),
            },
            Station {
                id: "odeonsplatz".to_string(),
                lat: 48.1429,
                lng: 11.5775,
                name: Some("Odeonsplatz".to_string()),
            },
        ],
        separation_distance: Some(300),
        method: None,
        routing: None,
    };
    match client.station_info(&request).await {
        Ok(info) => println!("{}", info),
        Err(e) => eprintln!("HTTP {} {}: {}", e.status(), e.code(), e.message()),
    }

    println!("=== Debounced layer refresh ===");
    let refresh_client = client.clone();
    let refresh = Debouncer::new(
        move |reason: &'static str| {
            let client = refresh_client.clone();
            tokio::spawn(async move {
                match client.layers().await {
                    Ok(layers) => println!("refreshed after {}: {}", reason, layers),
                    Err(e) => eprintln!("refresh failed: {}", e),
                }
            });
        },
        Duration::from_millis(200),
    );
    for reason in ["pan", "zoom", "pan", "drag"] {
        refresh.call(reason);
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    tokio::time::sleep(Duration::from_secs(2)).await;

    Ok(())
}
