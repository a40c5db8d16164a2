//! Health check endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Database reachability.
    pub database: &'static str,
}

/// Health check handler. Reports 503 while the database is unreachable.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status, database) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "healthy", "up"),
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
        }
    };
    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database,
        }),
    )
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
