//! Account routes: user and merchant lists, verification decisions, hostel settings.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::Operator;
use crate::models::account::Account;
use crate::models::pagination::{PagedResult, Pagination};
use crate::services::merchants::{self as merchant_service, MerchantFilters, MerchantPage};
use crate::services::users::{self as user_service, UserFilters};
use crate::services::verification::{self as verification_service, HostelMerchantUpdate, VerificationRequest};
use crate::AppState;

/// GET /api/v1/users: students with filters, search and pagination.
pub async fn list_users(
    State(state): State<AppState>,
    _operator: Operator,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<UserFilters>,
) -> Result<Json<ApiResponse<PagedResult<Account>>>, AppError> {
    let result = user_service::list(state.client.as_ref(), &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/v1/merchants: merchants with their products grouped by merchant id.
pub async fn list_merchants(
    State(state): State<AppState>,
    _operator: Operator,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<MerchantFilters>,
) -> Result<Json<ApiResponse<MerchantPage>>, AppError> {
    let result = merchant_service::list(state.client.as_ref(), &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// PATCH /api/v1/accounts/{id}/verification: approve or reject a pending account.
pub async fn update_verification(
    State(state): State<AppState>,
    _operator: Operator,
    Path(id): Path<Uuid>,
    Json(body): Json<VerificationRequest>,
) -> Result<StatusCode, AppError> {
    verification_service::update_verification_status(state.client.as_ref(), id, body.status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/merchants/{id}/hostel: enable or disable hostel-merchant mode.
pub async fn update_hostel(
    State(state): State<AppState>,
    _operator: Operator,
    Path(id): Path<Uuid>,
    Json(body): Json<HostelMerchantUpdate>,
) -> Result<StatusCode, AppError> {
    verification_service::update_hostel_merchant_status(state.client.as_ref(), id, &body).await?;
    Ok(StatusCode::NO_CONTENT)
}
