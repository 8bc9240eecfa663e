//! Request and response payloads of the planning backend.
//!
//! Payloads the client does not inspect (coverage maps, layers, OSM data) are
//! left as `serde_json::Value`.

use serde::{Deserialize, Serialize};

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A station on a planned line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body of `POST /station-info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfoRequest {
    pub stations: Vec<Station>,
    /// Minimum distance between stations, in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separation_distance: Option<i32>,
    /// Coverage calculation method, e.g. `"relative"` or `"absolute"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Distance routing, e.g. `"osm"` or `"direct"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
}

/// Body of `POST /find-station`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindStationRequest {
    pub stations: Vec<Station>,
    pub route: Vec<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
}

/// Result of `POST /find-station`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalStationResult {
    pub station: Station,
    pub score: f64,
    pub coverage: f64,
}

/// Result of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    /// RFC 3339 timestamp of the check.
    pub timestamp: String,
    pub version: String,
}

/// Result of `GET /ready`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessStatus {
    pub status: String,
    pub layers_loaded: bool,
}
