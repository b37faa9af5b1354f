//! Health check endpoints for liveness and readiness checks.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::ApiResponse;
use crate::models::school;
use crate::remote::{head_count, Select};
use crate::AppState;

/// Readiness check detail.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub data_service: String,
}

/// Liveness check: OK whenever the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness check: checks that the data service answers a count query.
pub async fn ready(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let data_service = match head_count(state.client.as_ref(), Select::from(school::TABLE)).await {
        Ok(_) => "connected".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Data service health check failed");
            format!("error: {e}")
        }
    };

    ApiResponse::success(HealthStatus {
        status: "ok".to_string(),
        data_service,
    })
}
