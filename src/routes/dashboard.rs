//! Dashboard routes: aggregated statistics and analytics.
//!
//! Both refresh a shared snapshot. When a refresh fails the last good
//! snapshot is served instead, and the error only surfaces when none exists.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::Operator;
use crate::services::analytics::{self, Analytics};
use crate::services::dashboard::{self, DashboardStats};
use crate::AppState;

/// GET /api/v1/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    _operator: Operator,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let client = Arc::clone(&state.client);
    let stats = state
        .dashboard
        .load_or_prior(async move { dashboard::get_stats(client.as_ref(), Utc::now()).await })
        .await?;
    Ok(ApiResponse::success(stats))
}

/// GET /api/v1/analytics
pub async fn analytics(
    State(state): State<AppState>,
    _operator: Operator,
) -> Result<Json<ApiResponse<Analytics>>, AppError> {
    let client = Arc::clone(&state.client);
    let analytics = state
        .analytics
        .load_or_prior(async move { analytics::get_analytics(client.as_ref(), Utc::now()).await })
        .await?;
    Ok(ApiResponse::success(analytics))
}
