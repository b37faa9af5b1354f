//! Route definitions for the admin API.

pub mod accounts;
pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod reference;

use axum::{
    http::HeaderValue,
    routing::{get, patch, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router. Every `/api/v1` handler requires the operator token.
pub fn build_router(state: AppState) -> Router {
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(e) => {
            tracing::warn!(error = %e, url = %state.config.frontend_url, "Invalid FRONTEND_URL; CORS disabled");
            CorsLayer::new()
        }
    }
    .allow_methods(Any)
    .allow_headers(Any);

    let account_routes = Router::new()
        .route("/users", get(accounts::list_users))
        .route("/merchants", get(accounts::list_merchants))
        .route("/merchants/{id}/hostel", patch(accounts::update_hostel))
        .route(
            "/accounts/{id}/verification",
            patch(accounts::update_verification),
        );

    let catalog_routes = Router::new()
        .route("/products", get(catalog::list_products))
        .route("/invoices", get(catalog::list_invoices))
        .route("/reviews", get(catalog::list_reviews))
        .route("/reviews/summary", get(catalog::review_summary));

    let reference_routes = Router::new()
        .route(
            "/schools",
            get(reference::list_schools).post(reference::create_school),
        )
        .route(
            "/schools/{id}",
            put(reference::update_school).delete(reference::delete_school),
        )
        .route(
            "/hostels",
            get(reference::list_hostels).post(reference::create_hostel),
        )
        .route(
            "/hostels/{id}",
            put(reference::update_hostel).delete(reference::delete_hostel),
        );

    let dashboard_routes = Router::new()
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/analytics", get(dashboard::analytics));

    let api = Router::new()
        .merge(account_routes)
        .merge(catalog_routes)
        .merge(reference_routes)
        .merge(dashboard_routes);

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AppConfig, DataBackend};
    use crate::remote::MemoryClient;

    fn app() -> Router {
        let config = AppConfig {
            data_backend: DataBackend::Memory,
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            admin_api_token: "token".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            frontend_url: "http://localhost:5173".to_string(),
        };
        build_router(AppState::new(Arc::new(MemoryClient::new()), config))
    }

    #[tokio::test]
    async fn liveness_needs_no_token() {
        let response = app()
            .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn api_rejects_missing_and_malformed_tokens() {
        for auth in [None, Some("token"), Some("Basic token"), Some("Bearer nope")] {
            let mut request = Request::get("/api/v1/schools");
            if let Some(auth) = auth {
                request = request.header(header::AUTHORIZATION, auth);
            }
            let response = app()
                .oneshot(request.body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{auth:?}");
        }
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let response = app()
            .oneshot(
                Request::get("/api/v1/users?page=1&limit=5")
                    .header(header::AUTHORIZATION, "Bearer token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn review_summary_and_rating_validation() {
        let get = |uri: &str| {
            Request::get(uri)
                .header(header::AUTHORIZATION, "Bearer token")
                .body(Body::empty())
                .unwrap()
        };

        let summary = app().oneshot(get("/api/v1/reviews/summary")).await.unwrap();
        assert_eq!(summary.status(), StatusCode::OK);

        let bad = app().oneshot(get("/api/v1/reviews?rating=9")).await.unwrap();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }
}
