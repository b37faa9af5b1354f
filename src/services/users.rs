//! Paginated listing of student (`user_type = user`) accounts.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Deserialize;

use super::filters::{active, created_between, matching_any, search_term};
use crate::errors::AppError;
use crate::models::account::{self, Account, UserType};
use crate::models::blank_as_none;
use crate::models::pagination::{PagedResult, Pagination};
use crate::remote::{fetch_page, DataClient, Select};
use crate::resource::ListView;

/// Account projection with the school embedded.
pub const ACCOUNT_COLUMNS: &str = "*, schools(name, short_name)";

const SEARCH_COLUMNS: [&str; 3] = ["full_name", "email", "user_id"];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserFilters {
    pub verification_status: Option<String>,
    pub school_id: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
}

pub fn query(filters: &UserFilters, pagination: &Pagination) -> Select {
    let mut query = Select::from(account::TABLE)
        .columns(ACCOUNT_COLUMNS)
        .eq("user_type", UserType::User.as_str());

    if let Some(status) = active(&filters.verification_status) {
        query = query.eq("verification_status", status);
    }
    if let Some(school_id) = active(&filters.school_id) {
        query = query.eq("school_id", school_id);
    }
    query = created_between(query, filters.date_from, filters.date_to);
    query = matching_any(query, &SEARCH_COLUMNS, search_term(&filters.search));

    let (from, to) = pagination.range();
    query.order_desc("created_at").range(from, to).exact_count()
}

pub async fn list(
    client: &dyn DataClient,
    filters: &UserFilters,
    pagination: &Pagination,
) -> Result<PagedResult<Account>, AppError> {
    let (items, total) = fetch_page(client, &query(filters, pagination)).await?;
    Ok(PagedResult::new(items, total, pagination))
}

/// Users list that reloads on filter or page changes.
pub async fn view(
    client: Arc<dyn DataClient>,
    filters: UserFilters,
    pagination: Pagination,
) -> ListView<UserFilters, PagedResult<Account>> {
    ListView::mount(client, fetch, filters, pagination).await
}

fn fetch(
    client: Arc<dyn DataClient>,
    filters: UserFilters,
    pagination: Pagination,
) -> BoxFuture<'static, Result<PagedResult<Account>, AppError>> {
    async move { list(client.as_ref(), &filters, &pagination).await }.boxed()
}
