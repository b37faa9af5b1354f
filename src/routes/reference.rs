//! School and hostel reference data routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::Operator;
use crate::models::hostel::{Hostel, HostelInput};
use crate::models::school::{School, SchoolInput};
use crate::services::hostels::{self as hostel_service, HostelFilters};
use crate::services::schools::{self as school_service, SchoolListParams};
use crate::AppState;

/// GET /api/v1/schools, optionally `?order=name`.
pub async fn list_schools(
    State(state): State<AppState>,
    _operator: Operator,
    Query(params): Query<SchoolListParams>,
) -> Result<Json<ApiResponse<Vec<School>>>, AppError> {
    let schools = school_service::list(state.client.as_ref(), &params).await?;
    Ok(ApiResponse::success(schools))
}

/// POST /api/v1/schools
pub async fn create_school(
    State(state): State<AppState>,
    _operator: Operator,
    Json(body): Json<SchoolInput>,
) -> Result<(StatusCode, Json<ApiResponse<School>>), AppError> {
    let school = school_service::create(state.client.as_ref(), &body).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(school)))
}

/// PUT /api/v1/schools/{id}
pub async fn update_school(
    State(state): State<AppState>,
    _operator: Operator,
    Path(id): Path<Uuid>,
    Json(body): Json<SchoolInput>,
) -> Result<Json<ApiResponse<School>>, AppError> {
    let school = school_service::update(state.client.as_ref(), id, &body).await?;
    Ok(ApiResponse::success(school))
}

/// DELETE /api/v1/schools/{id}
pub async fn delete_school(
    State(state): State<AppState>,
    _operator: Operator,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    school_service::delete(state.client.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/hostels, optionally `?school_id=`.
pub async fn list_hostels(
    State(state): State<AppState>,
    _operator: Operator,
    Query(filters): Query<HostelFilters>,
) -> Result<Json<ApiResponse<Vec<Hostel>>>, AppError> {
    let hostels = hostel_service::list(state.client.as_ref(), &filters).await?;
    Ok(ApiResponse::success(hostels))
}

/// POST /api/v1/hostels
pub async fn create_hostel(
    State(state): State<AppState>,
    _operator: Operator,
    Json(body): Json<HostelInput>,
) -> Result<(StatusCode, Json<ApiResponse<Hostel>>), AppError> {
    let hostel = hostel_service::create(state.client.as_ref(), &body).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(hostel)))
}

/// PUT /api/v1/hostels/{id}
pub async fn update_hostel(
    State(state): State<AppState>,
    _operator: Operator,
    Path(id): Path<Uuid>,
    Json(body): Json<HostelInput>,
) -> Result<Json<ApiResponse<Hostel>>, AppError> {
    let hostel = hostel_service::update(state.client.as_ref(), id, &body).await?;
    Ok(ApiResponse::success(hostel))
}

/// DELETE /api/v1/hostels/{id}
pub async fn delete_hostel(
    State(state): State<AppState>,
    _operator: Operator,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    hostel_service::delete(state.client.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
