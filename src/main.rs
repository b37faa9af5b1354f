use std::sync::Arc;

use anyhow::Context;
use campus_admin::config::{AppConfig, DataBackend};
use campus_admin::remote::{DataClient, MemoryClient, PostgrestClient};
use campus_admin::routes::build_router;
use campus_admin::AppState;
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_admin=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let client: Arc<dyn DataClient> = match config.data_backend {
        DataBackend::Postgrest => Arc::new(
            PostgrestClient::new(&config.supabase_url, &config.supabase_anon_key)
                .context("Failed to configure data service client")?,
        ),
        DataBackend::Memory => {
            tracing::warn!("Using the in-process data store; nothing is persisted");
            Arc::new(MemoryClient::new())
        }
    };

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(client, config);
    let app = build_router(state);

    tracing::info!(host = %addr, "Starting campus admin API server");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
