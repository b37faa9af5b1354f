//! Remote data service boundary.
//!
//! Every read and write in the crate goes through a [`DataClient`]. The
//! server builds exactly one client in `main` and hands it to the services
//! as `Arc<dyn DataClient>`; tests hand them a [`MemoryClient`] instead.

pub mod memory;
pub mod postgrest;
pub mod query;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use memory::MemoryClient;
pub use postgrest::PostgrestClient;
pub use query::{CompareOp, Filter, Order, Select};

/// Errors from remote data service calls.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with an error body.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        RemoteError::Http(e.to_string())
    }
}

/// Rows returned by a select, plus the exact count when one was requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    pub rows: Vec<Value>,
    pub count: Option<i64>,
}

impl Rows {
    /// Deserialize every row into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Vec<T>, RemoteError> {
        self.rows
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| RemoteError::Decode(e.to_string())))
            .collect()
    }
}

/// Table-scoped reads and writes against the hosted data service.
#[async_trait]
pub trait DataClient: Send + Sync {
    /// Run a read query.
    async fn select(&self, query: &Select) -> Result<Rows, RemoteError>;

    /// Insert rows and return them as stored.
    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, RemoteError>;

    /// Patch every row matching `filters`; returns the updated rows.
    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, RemoteError>;

    /// Delete every row matching `filters`; returns the deleted rows.
    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, RemoteError>;
}

/// Fetch and decode all rows of a query.
pub async fn fetch_all<T: DeserializeOwned>(
    client: &dyn DataClient,
    query: &Select,
) -> Result<Vec<T>, RemoteError> {
    client.select(query).await?.decode()
}

/// Fetch one page of rows together with the exact total count.
pub async fn fetch_page<T: DeserializeOwned>(
    client: &dyn DataClient,
    query: &Select,
) -> Result<(Vec<T>, i64), RemoteError> {
    let rows = client.select(query).await?;
    let total = rows.count.unwrap_or(0);
    Ok((rows.decode()?, total))
}

/// Run a query as a head count; no rows are materialized.
pub async fn head_count(client: &dyn DataClient, query: Select) -> Result<i64, RemoteError> {
    let rows = client.select(&query.head()).await?;
    Ok(rows.count.unwrap_or(0))
}
