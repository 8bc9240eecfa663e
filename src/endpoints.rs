//! Typed bindings for the planning backend's endpoints.

use crate::types::{
    FindStationRequest, HealthStatus, OptimalStationResult, ReadinessStatus, StationInfoRequest,
};
use crate::{ApiError, Client, Result};
use serde::Serialize;
use serde_json::Value;

impl Client {
    /// `POST /station-info`: coverage statistics for a set of stations.
    pub async fn station_info(&self, request: &StationInfoRequest) -> Result<Value> {
        self.post("/station-info", request).await
    }

    /// `POST /find-station`: the best new station position along a route.
    pub async fn find_station(&self, request: &FindStationRequest) -> Result<OptimalStationResult> {
        self.post("/find-station", request).await
    }

    /// `POST /coverage-info/{router}`: coverage computed with the given router.
    pub async fn coverage_info<B>(&self, router: &str, request: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        if router.is_empty() || router.contains('/') {
            return Err(ApiError::invalid_request(format!(
                "Invalid router name: {:?}",
                router
            )));
        }
        self.post(&format!("/coverage-info/{}", router), request)
            .await
    }

    /// `GET /layers`: the loaded population layers.
    pub async fn layers(&self) -> Result<Value> {
        self.get("/layers").await
    }

    /// `GET /osm`: raw OpenStreetMap data.
    pub async fn osm_data(&self) -> Result<Value> {
        self.get("/osm").await
    }

    /// `GET /health`: liveness probe.
    pub async fn health(&self) -> Result<HealthStatus> {
        self.get("/health").await
    }

    /// `GET /ready`: readiness probe. A backend that is still loading answers 503.
    pub async fn ready(&self) -> Result<ReadinessStatus> {
        self.get("/ready").await
    }

    /// Returns `true` if the health probe succeeds.
    pub async fn is_available(&self) -> bool {
        match self.health().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, status = e.status(), "Backend unavailable");
                false
            }
        }
    }
}
