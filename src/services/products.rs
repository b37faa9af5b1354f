//! Product catalogue listing.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Deserialize;

use super::filters::{active, flag, matching_any, search_term};
use crate::errors::AppError;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::product::{self, Product};
use crate::remote::{fetch_page, DataClient, Select};
use crate::resource::ListView;

/// Product projection with the owning merchant and its school embedded.
const PRODUCT_COLUMNS: &str = "*, unique_visitors(*, schools(name, short_name))";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductFilters {
    pub merchant_id: Option<String>,
    pub is_available: Option<String>,
    pub is_featured: Option<String>,
    pub search: Option<String>,
}

pub fn query(filters: &ProductFilters, pagination: &Pagination) -> Result<Select, AppError> {
    let mut query = Select::from(product::TABLE).columns(PRODUCT_COLUMNS);

    if let Some(merchant_id) = active(&filters.merchant_id) {
        query = query.eq("merchant_id", merchant_id);
    }
    if let Some(available) = flag("is_available", &filters.is_available)? {
        query = query.eq("is_available", available);
    }
    if let Some(featured) = flag("is_featured", &filters.is_featured)? {
        query = query.eq("is_featured", featured);
    }
    query = matching_any(query, &["product_description"], search_term(&filters.search));

    let (from, to) = pagination.range();
    Ok(query.order_desc("created_at").range(from, to).exact_count())
}

pub async fn list(
    client: &dyn DataClient,
    filters: &ProductFilters,
    pagination: &Pagination,
) -> Result<PagedResult<Product>, AppError> {
    let query = query(filters, pagination)?;
    let (items, total) = fetch_page(client, &query).await?;
    Ok(PagedResult::new(items, total, pagination))
}

pub async fn view(
    client: Arc<dyn DataClient>,
    filters: ProductFilters,
    pagination: Pagination,
) -> ListView<ProductFilters, PagedResult<Product>> {
    ListView::mount(client, fetch, filters, pagination).await
}

fn fetch(
    client: Arc<dyn DataClient>,
    filters: ProductFilters,
    pagination: Pagination,
) -> BoxFuture<'static, Result<PagedResult<Product>, AppError>> {
    async move { list(client.as_ref(), &filters, &pagination).await }.boxed()
}
