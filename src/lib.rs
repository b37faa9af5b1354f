pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod remote;
pub mod resource;
pub mod routes;
pub mod services;

use std::sync::Arc;

use remote::DataClient;
use resource::Resource;
use services::analytics::Analytics;
use services::dashboard::DashboardStats;

/// Shared application state passed to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn DataClient>,
    pub config: config::AppConfig,
    /// Last dashboard snapshot, served again when a refresh fails.
    pub dashboard: Arc<Resource<DashboardStats>>,
    pub analytics: Arc<Resource<Analytics>>,
}

impl AppState {
    pub fn new(client: Arc<dyn DataClient>, config: config::AppConfig) -> Self {
        Self {
            client,
            config,
            dashboard: Arc::new(Resource::keep_prior()),
            analytics: Arc::new(Resource::keep_prior()),
        }
    }
}
