//! Health check handlers
//!
//! Provides health and readiness endpoints for monitoring and orchestration.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Server version from Cargo.toml
    pub version: &'static str,
    /// Service name
    pub service: &'static str,
    /// Outstanding ceremony sessions
    pub outstanding_sessions: usize,
    /// Registered credentials
    pub credentials: usize,
}

/// GET /health - Health check endpoint
///
/// Returns JSON with service status, version, and engine statistics.
/// Used for monitoring and load balancer health checks.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let credentials = state.store.credential_count().await.unwrap_or(0);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "passgate-server",
        outstanding_sessions: state.sessions.outstanding(),
        credentials,
    })
}

/// Readiness response for Kubernetes
#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Whether the service is ready to accept traffic
    pub ready: bool,
}

/// GET /ready - Kubernetes readiness probe
///
/// Returns 200 if the service is ready to accept traffic.
/// Unlike /health, this is a simple yes/no check.
pub async fn ready() -> Json<ReadyResponse> {
    Json(ReadyResponse { ready: true })
}
