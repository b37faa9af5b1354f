//! Operator authentication extractor for Axum handlers.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::AppState;

/// Proof that the request carried the operator bearer token.
///
/// Use as an Axum extractor in every admin handler:
/// ```ignore
/// async fn handler(_operator: Operator) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Operator;

impl FromRequestParts<AppState> for Operator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        if !constant_time_eq(token.as_bytes(), state.config.admin_api_token.as_bytes()) {
            tracing::warn!("Rejected request with invalid operator token");
            return Err(AppError::Unauthorized);
        }

        Ok(Operator)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
