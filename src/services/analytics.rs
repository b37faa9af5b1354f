//! Platform-wide analytics.
//!
//! Per-school, per-status and per-month counts are one query each; each
//! group of queries is issued concurrently and fails as a unit.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::amount::total;
use super::calendar::trailing_months;
use crate::errors::AppError;
use crate::models::account::{self, UserType, VerificationStatus};
use crate::models::product::{self, ProductCategories};
use crate::models::request_log::{self, RequestUniversity};
use crate::models::review::{self, ReviewRating};
use crate::models::school;
use crate::remote::{fetch_all, head_count, DataClient, RemoteError, Select};

pub const REVENUE_MONTHS: u32 = 12;
pub const TOP_CATEGORIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub users_by_school: Vec<SchoolCount>,
    pub merchants_by_verification_status: Vec<StatusCount>,
    pub revenue_by_month: Vec<MonthlyRevenue>,
    pub top_categories: Vec<CategoryCount>,
    pub requests_by_university: Vec<UniversityCount>,
    pub average_rating: f64,
    pub total_requests: i64,
    pub total_products: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolCount {
    pub school: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniversityCount {
    pub university: Option<String>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
struct SchoolKey {
    id: Uuid,
    short_name: String,
}

#[derive(Debug, Deserialize)]
struct AmountOnly {
    #[serde(default)]
    invoice_amount: Option<String>,
}

pub async fn get_analytics(
    client: &dyn DataClient,
    now: DateTime<Utc>,
) -> Result<Analytics, AppError> {
    let categories_query = Select::from(product::TABLE).columns("product_categories");
    let universities_query = Select::from(request_log::TABLE).columns("university");
    let ratings_query = Select::from(review::TABLE).columns("rating");

    let (
        users_by_school,
        merchants_by_verification_status,
        revenue_by_month,
        products,
        requests,
        ratings,
        total_requests,
        total_products,
    ) = tokio::try_join!(
        users_by_school(client),
        merchants_by_status(client),
        revenue_by_month(client, now),
        fetch_all::<ProductCategories>(client, &categories_query),
        fetch_all::<RequestUniversity>(client, &universities_query),
        fetch_all::<ReviewRating>(client, &ratings_query),
        head_count(client, Select::from(request_log::TABLE)),
        head_count(client, Select::from(product::TABLE)),
    )?;

    tracing::debug!(
        schools = users_by_school.len(),
        products = products.len(),
        requests = requests.len(),
        "Analytics computed"
    );

    Ok(Analytics {
        users_by_school,
        merchants_by_verification_status,
        revenue_by_month,
        top_categories: top_categories(products.iter().map(|p| p.product_categories.as_slice())),
        requests_by_university: requests_by_university(
            requests.iter().map(|r| r.university.as_deref()),
        ),
        average_rating: average_rating(ratings.iter().map(|r| r.rating)),
        total_requests,
        total_products,
    })
}

/// Accounts per school, labelled by the school's short name.
async fn users_by_school(client: &dyn DataClient) -> Result<Vec<SchoolCount>, RemoteError> {
    let schools: Vec<SchoolKey> =
        fetch_all(client, &Select::from(school::TABLE).columns("short_name, id")).await?;

    try_join_all(schools.into_iter().map(|school| async move {
        let count = head_count(
            client,
            Select::from(account::TABLE).eq("school_id", school.id.to_string()),
        )
        .await?;
        Ok::<_, RemoteError>(SchoolCount {
            school: school.short_name,
            count,
        })
    }))
    .await
}

async fn merchants_by_status(client: &dyn DataClient) -> Result<Vec<StatusCount>, RemoteError> {
    try_join_all(VerificationStatus::ALL.iter().map(|status| async move {
        let count = head_count(
            client,
            Select::from(account::TABLE)
                .eq("user_type", UserType::Merchant.as_str())
                .eq("verification_status", status.as_str()),
        )
        .await?;
        Ok::<_, RemoteError>(StatusCount {
            status: status.label().to_string(),
            count,
        })
    }))
    .await
}

async fn revenue_by_month(
    client: &dyn DataClient,
    now: DateTime<Utc>,
) -> Result<Vec<MonthlyRevenue>, RemoteError> {
    let months = trailing_months(now, REVENUE_MONTHS);
    try_join_all(months.iter().map(|window| async move {
        let (start, end) = window.bounds();
        let invoices: Vec<AmountOnly> = fetch_all(
            client,
            &Select::from(crate::models::invoice::TABLE)
                .columns("invoice_amount")
                .gte("created_at", start)
                .lte("created_at", end),
        )
        .await?;
        Ok::<_, RemoteError>(MonthlyRevenue {
            month: window.label_with_year(),
            revenue: total(invoices.iter().map(|i| i.invoice_amount.as_deref())),
        })
    }))
    .await
}

/// Category frequencies, most frequent first, ties by name, capped at [`TOP_CATEGORIES`].
pub fn top_categories<'a>(lists: impl IntoIterator<Item = &'a [String]>) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for category in lists.into_iter().flatten() {
        *counts.entry(category.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    ranked.truncate(TOP_CATEGORIES);
    ranked
}

/// Requests grouped by exact university text, in first-seen order.
pub fn requests_by_university<'a>(
    universities: impl IntoIterator<Item = Option<&'a str>>,
) -> Vec<UniversityCount> {
    let mut grouped: Vec<UniversityCount> = Vec::new();
    for university in universities {
        match grouped
            .iter_mut()
            .find(|g| g.university.as_deref() == university)
        {
            Some(existing) => existing.count += 1,
            None => grouped.push(UniversityCount {
                university: university.map(str::to_string),
                count: 1,
            }),
        }
    }
    grouped
}

/// Mean rating rounded to one decimal; 0 without reviews.
pub fn average_rating(ratings: impl IntoIterator<Item = i32>) -> f64 {
    let (sum, n) = ratings
        .into_iter()
        .fold((0i64, 0u32), |(sum, n), r| (sum + i64::from(r), n + 1));
    if n == 0 {
        return 0.0;
    }
    round_one_decimal(sum as f64 / f64::from(n))
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
