// Health handler
// Liveness probe backed by a trivial database query

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::routes::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub timestamp: DateTime<Utc>,
}

/// Health check handler
/// GET /api/health
///
/// Runs `SELECT 1` against the database. Every failure path is caught and
/// reported as a 503 with the same response shape, never propagated.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    info!("Health check requested");

    match state.db.health_check().await {
        Ok(1) => {
            info!("Health check passed");
            let response = HealthResponse {
                status: "Healthy".to_string(),
                database: "Connected".to_string(),
                timestamp: Utc::now(),
            };
            (StatusCode::OK, Json(response))
        }
        Ok(_) => {
            warn!("Health check failed: database query did not return expected result");
            let response = HealthResponse {
                status: "Unhealthy".to_string(),
                database: "Query failed".to_string(),
                timestamp: Utc::now(),
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(response))
        }
        Err(e) => {
            warn!("Health check failed: {}", e);
            let response = HealthResponse {
                status: "Unhealthy".to_string(),
                database: format!("Error: {}", e),
                timestamp: Utc::now(),
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(response))
        }
    }
}
