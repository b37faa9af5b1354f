//! Merchant listing with each merchant's products attached.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::filters::{active, created_between};
use super::users::ACCOUNT_COLUMNS;
use crate::errors::AppError;
use crate::models::account::{self, Account, UserType};
use crate::models::blank_as_none;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::product::{self, Product};
use crate::remote::{fetch_all, fetch_page, DataClient, Select};
use crate::resource::ListView;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MerchantFilters {
    pub verification_status: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_to: Option<NaiveDate>,
}

/// One page of merchants and the products of exactly those merchants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantPage {
    #[serde(flatten)]
    pub page: PagedResult<Account>,
    pub products_by_merchant: HashMap<Uuid, Vec<Product>>,
}

pub fn query(filters: &MerchantFilters, pagination: &Pagination) -> Select {
    let mut query = Select::from(account::TABLE)
        .columns(ACCOUNT_COLUMNS)
        .eq("user_type", UserType::Merchant.as_str());

    if let Some(status) = active(&filters.verification_status) {
        query = query.eq("verification_status", status);
    }
    query = created_between(query, filters.date_from, filters.date_to);

    let (from, to) = pagination.range();
    query.order_desc("created_at").range(from, to).exact_count()
}

pub async fn list(
    client: &dyn DataClient,
    filters: &MerchantFilters,
    pagination: &Pagination,
) -> Result<MerchantPage, AppError> {
    let (merchants, total): (Vec<Account>, i64) =
        fetch_page(client, &query(filters, pagination)).await?;

    let products_by_merchant = if merchants.is_empty() {
        HashMap::new()
    } else {
        let ids: Vec<String> = merchants.iter().map(|m| m.id.to_string()).collect();
        let products: Vec<Product> = fetch_all(
            client,
            &Select::from(product::TABLE).in_list("merchant_id", ids),
        )
        .await?;
        group_by_merchant(products)
    };

    tracing::debug!(
        merchants = merchants.len(),
        with_products = products_by_merchant.len(),
        "Loaded merchant page"
    );

    Ok(MerchantPage {
        page: PagedResult::new(merchants, total, pagination),
        products_by_merchant,
    })
}

/// Group products by owner. Products without a merchant are dropped.
pub fn group_by_merchant(products: Vec<Product>) -> HashMap<Uuid, Vec<Product>> {
    let mut grouped: HashMap<Uuid, Vec<Product>> = HashMap::new();
    for product in products {
        if let Some(merchant_id) = product.merchant_id {
            grouped.entry(merchant_id).or_default().push(product);
        }
    }
    grouped
}

pub async fn view(
    client: Arc<dyn DataClient>,
    filters: MerchantFilters,
    pagination: Pagination,
) -> ListView<MerchantFilters, MerchantPage> {
    ListView::mount(client, fetch, filters, pagination).await
}

fn fetch(
    client: Arc<dyn DataClient>,
    filters: MerchantFilters,
    pagination: Pagination,
) -> BoxFuture<'static, Result<MerchantPage, AppError>> {
    async move { list(client.as_ref(), &filters, &pagination).await }.boxed()
}
