//! Site review listing and the rating summary shown above it.

use std::sync::Arc;

use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use serde::{Deserialize, Serialize};

use super::analytics::round_one_decimal;
use super::filters::{active, flag, matching_any, search_term};
use crate::errors::AppError;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::review::{self, Review};
use crate::remote::{fetch_page, head_count, DataClient, RemoteError, Select};
use crate::resource::ListView;

/// Ratings in display order.
pub const RATINGS: [i32; 5] = [5, 4, 3, 2, 1];

const SEARCH_COLUMNS: [&str; 2] = ["user_name", "review_text"];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReviewFilters {
    /// `All`, `true` or `false`.
    pub featured: Option<String>,
    /// `All` or a star count.
    pub rating: Option<String>,
    pub search: Option<String>,
}

fn rating(value: &Option<String>) -> Result<Option<i32>, AppError> {
    let Some(raw) = active(value) else {
        return Ok(None);
    };
    raw.parse::<i32>()
        .ok()
        .filter(|r| RATINGS.contains(r))
        .map(Some)
        .ok_or_else(|| AppError::Validation(format!("rating must be All or 1 to 5, got {raw:?}")))
}

pub fn query(filters: &ReviewFilters, pagination: &Pagination) -> Result<Select, AppError> {
    let mut query = Select::from(review::TABLE);
    if let Some(featured) = flag("featured", &filters.featured)? {
        query = query.eq("is_featured", featured);
    }
    if let Some(rating) = rating(&filters.rating)? {
        query = query.eq("rating", rating);
    }
    query = matching_any(query, &SEARCH_COLUMNS, search_term(&filters.search));
    let (from, to) = pagination.range();
    Ok(query.order_desc("created_at").range(from, to).exact_count())
}

pub async fn list(
    client: &dyn DataClient,
    filters: &ReviewFilters,
    pagination: &Pagination,
) -> Result<PagedResult<Review>, AppError> {
    let query = query(filters, pagination)?;
    let (items, total) = fetch_page(client, &query).await?;
    Ok(PagedResult::new(items, total, pagination))
}

pub async fn view(
    client: Arc<dyn DataClient>,
    filters: ReviewFilters,
    pagination: Pagination,
) -> ListView<ReviewFilters, PagedResult<Review>> {
    ListView::mount(client, fetch, filters, pagination).await
}

fn fetch(
    client: Arc<dyn DataClient>,
    filters: ReviewFilters,
    pagination: Pagination,
) -> BoxFuture<'static, Result<PagedResult<Review>, AppError>> {
    async move { list(client.as_ref(), &filters, &pagination).await }.boxed()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub total: i64,
    pub average_rating: f64,
    pub featured: i64,
    pub five_star: i64,
    pub distribution: Vec<RatingShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingShare {
    pub rating: i32,
    pub count: i64,
    pub percentage: f64,
}

/// Totals over every review, independent of list filters.
pub async fn summary(client: &dyn DataClient) -> Result<ReviewSummary, AppError> {
    let (total, featured, counts) = tokio::try_join!(
        head_count(client, Select::from(review::TABLE)),
        head_count(client, Select::from(review::TABLE).eq("is_featured", true)),
        try_join_all(RATINGS.iter().map(|&rating| async move {
            let count = head_count(client, Select::from(review::TABLE).eq("rating", rating)).await?;
            Ok::<_, RemoteError>((rating, count))
        })),
    )?;

    Ok(summarize(total, featured, &counts))
}

/// Build the summary from head counts; `counts` is in [`RATINGS`] order.
pub fn summarize(total: i64, featured: i64, counts: &[(i32, i64)]) -> ReviewSummary {
    let rated: i64 = counts.iter().map(|(_, count)| count).sum();
    let weighted: i64 = counts
        .iter()
        .map(|(rating, count)| i64::from(*rating) * count)
        .sum();
    let average_rating = if rated == 0 {
        0.0
    } else {
        round_one_decimal(weighted as f64 / rated as f64)
    };

    let distribution = counts
        .iter()
        .map(|&(rating, count)| RatingShare {
            rating,
            count,
            percentage: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            },
        })
        .collect();
    let five_star = counts
        .iter()
        .find(|(rating, _)| *rating == 5)
        .map_or(0, |(_, count)| *count);

    ReviewSummary {
        total,
        average_rating,
        featured,
        five_star,
        distribution,
    }
}
