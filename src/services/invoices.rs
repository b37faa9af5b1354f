//! Invoice listing. Amount bounds are checked locally since amounts are stored as text.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Deserialize;

use super::filters::{active, created_between, matching_any, search_term};
use crate::errors::AppError;
use crate::models::blank_as_none;
use crate::models::invoice::{self, Invoice};
use crate::models::pagination::{PagedResult, Pagination};
use crate::remote::{fetch_page, DataClient, Select};
use crate::resource::ListView;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InvoiceFilters {
    /// Matched against `invoice_status`.
    pub status: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_amount: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_amount: Option<f64>,
    pub search: Option<String>,
}

const SEARCH_COLUMNS: [&str; 4] = [
    "payment_reference",
    "customer_name",
    "merchant_name",
    "customer_email",
];

impl InvoiceFilters {
    fn admits(&self, invoice: &Invoice) -> bool {
        let amount = invoice.amount();
        self.min_amount.map_or(true, |min| amount >= min)
            && self.max_amount.map_or(true, |max| amount <= max)
    }
}

pub fn query(filters: &InvoiceFilters, pagination: &Pagination) -> Select {
    let mut query = Select::from(invoice::TABLE);

    if let Some(status) = active(&filters.status) {
        query = query.eq("invoice_status", status);
    }
    query = created_between(query, filters.date_from, filters.date_to);
    query = matching_any(query, &SEARCH_COLUMNS, search_term(&filters.search));

    let (from, to) = pagination.range();
    query.order_desc("created_at").range(from, to).exact_count()
}

/// One page of invoices. `total` is the remote count before amount bounds,
/// so a page may hold fewer than `limit` items.
pub async fn list(
    client: &dyn DataClient,
    filters: &InvoiceFilters,
    pagination: &Pagination,
) -> Result<PagedResult<Invoice>, AppError> {
    let (items, total): (Vec<Invoice>, i64) =
        fetch_page(client, &query(filters, pagination)).await?;
    let items = items.into_iter().filter(|i| filters.admits(i)).collect();
    Ok(PagedResult::new(items, total, pagination))
}

pub async fn view(
    client: Arc<dyn DataClient>,
    filters: InvoiceFilters,
    pagination: Pagination,
) -> ListView<InvoiceFilters, PagedResult<Invoice>> {
    ListView::mount(client, fetch, filters, pagination).await
}

fn fetch(
    client: Arc<dyn DataClient>,
    filters: InvoiceFilters,
    pagination: Pagination,
) -> BoxFuture<'static, Result<PagedResult<Invoice>, AppError>> {
    async move { list(client.as_ref(), &filters, &pagination).await }.boxed()
}
