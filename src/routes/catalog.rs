//! Read-only catalogue routes: products, invoices and reviews.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::Operator;
use crate::models::invoice::Invoice;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::product::Product;
use crate::models::review::Review;
use crate::services::invoices::{self as invoice_service, InvoiceFilters};
use crate::services::products::{self as product_service, ProductFilters};
use crate::services::reviews::{self as review_service, ReviewFilters, ReviewSummary};
use crate::AppState;

/// GET /api/v1/products
pub async fn list_products(
    State(state): State<AppState>,
    _operator: Operator,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<ProductFilters>,
) -> Result<Json<ApiResponse<PagedResult<Product>>>, AppError> {
    let result = product_service::list(state.client.as_ref(), &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/v1/invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    _operator: Operator,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<InvoiceFilters>,
) -> Result<Json<ApiResponse<PagedResult<Invoice>>>, AppError> {
    let result = invoice_service::list(state.client.as_ref(), &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/v1/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    _operator: Operator,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<ReviewFilters>,
) -> Result<Json<ApiResponse<PagedResult<Review>>>, AppError> {
    let result = review_service::list(state.client.as_ref(), &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/v1/reviews/summary
pub async fn review_summary(
    State(state): State<AppState>,
    _operator: Operator,
) -> Result<Json<ApiResponse<ReviewSummary>>, AppError> {
    let summary = review_service::summary(state.client.as_ref()).await?;
    Ok(ApiResponse::success(summary))
}
