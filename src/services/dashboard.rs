//! Dashboard statistics aggregation queries.

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;

use super::amount::{format_naira, parse_amount};
use super::calendar::{trailing_months, MonthWindow};
use crate::errors::AppError;
use crate::models::account::{self, Account, UserType, VerificationStatus};
use crate::models::invoice::{self, Invoice, InvoiceAmount};
use crate::remote::{fetch_all, head_count, DataClient, RemoteError, Select};

/// Months shown in the growth and revenue charts.
pub const SERIES_MONTHS: u32 = 7;

/// Entries kept in the activity feed.
pub const ACTIVITY_LIMIT: usize = 6;

/// Aggregated statistics for the overview page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_merchants: i64,
    pub total_revenue: f64,
    pub pending_verifications: i64,
    pub user_growth: Vec<GrowthPoint>,
    pub revenue: Vec<RevenuePoint>,
    pub recent_activity: Vec<RecentActivity>,
}

/// Accounts created in one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPoint {
    pub month: String,
    pub users: i64,
    pub merchants: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenuePoint {
    pub month: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    UserRegistered,
    MerchantRegistered,
    InvoiceCreated,
    VerificationRequest,
}

/// One entry of the activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentActivity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// Fetch all dashboard statistics. Any failed query fails the whole snapshot.
pub async fn get_stats(
    client: &dyn DataClient,
    now: DateTime<Utc>,
) -> Result<DashboardStats, AppError> {
    let months = trailing_months(now, SERIES_MONTHS);

    let (total_users, total_merchants, pending_verifications, invoices, user_growth) = tokio::try_join!(
        count_accounts(client, Select::from(account::TABLE).eq("user_type", UserType::User.as_str())),
        count_accounts(client, Select::from(account::TABLE).eq("user_type", UserType::Merchant.as_str())),
        count_accounts(
            client,
            Select::from(account::TABLE)
                .eq("verification_status", VerificationStatus::Pending.as_str())
        ),
        fetch_invoice_amounts(client),
        fetch_growth(client, &months),
    )?;

    let total_revenue = invoices.iter().map(InvoiceAmount::amount).sum();
    let revenue = bucket_revenue(&months, &invoices);

    let recent_activity = fetch_recent_activity(client).await?;

    tracing::debug!(
        total_users,
        total_merchants,
        pending_verifications,
        invoices = invoices.len(),
        "Dashboard stats computed"
    );

    Ok(DashboardStats {
        total_users,
        total_merchants,
        total_revenue,
        pending_verifications,
        user_growth,
        revenue,
        recent_activity,
    })
}

async fn count_accounts(client: &dyn DataClient, query: Select) -> Result<i64, RemoteError> {
    head_count(client, query).await
}

async fn fetch_invoice_amounts(client: &dyn DataClient) -> Result<Vec<InvoiceAmount>, RemoteError> {
    let query = Select::from(invoice::TABLE)
        .columns("invoice_amount, created_at")
        .order_desc("created_at");
    fetch_all(client, &query).await
}

/// Users and merchants created per month, two head counts per month, all concurrent.
async fn fetch_growth(
    client: &dyn DataClient,
    months: &[MonthWindow],
) -> Result<Vec<GrowthPoint>, RemoteError> {
    try_join_all(months.iter().map(|window| async move {
        let (start, end) = window.bounds();
        let created_in = |user_type: UserType| {
            Select::from(account::TABLE)
                .eq("user_type", user_type.as_str())
                .gte("created_at", start.as_str())
                .lte("created_at", end.as_str())
        };
        let (users, merchants) = tokio::try_join!(
            head_count(client, created_in(UserType::User)),
            head_count(client, created_in(UserType::Merchant)),
        )?;
        Ok::<_, RemoteError>(GrowthPoint {
            month: window.label(),
            users,
            merchants,
        })
    }))
    .await
}

/// Revenue per month window, every window seeded with 0.
///
/// Invoices are placed by their creation year and month; anything outside
/// the windows is left out of the series.
pub fn bucket_revenue(months: &[MonthWindow], invoices: &[InvoiceAmount]) -> Vec<RevenuePoint> {
    let mut totals = vec![0.0; months.len()];
    for invoice in invoices {
        if let Some(index) = months.iter().position(|m| m.contains(invoice.created_at)) {
            totals[index] += invoice.amount();
        }
    }
    months
        .iter()
        .zip(totals)
        .map(|(window, revenue)| RevenuePoint {
            month: window.label(),
            revenue,
        })
        .collect()
}

async fn fetch_recent_activity(client: &dyn DataClient) -> Result<Vec<RecentActivity>, AppError> {
    let newest = |query: Select, n: u64| query.order_desc("created_at").limit(n);
    let users_query = newest(
        Select::from(account::TABLE).eq("user_type", UserType::User.as_str()),
        3,
    );
    let merchants_query = newest(
        Select::from(account::TABLE).eq("user_type", UserType::Merchant.as_str()),
        2,
    );
    let invoices_query = newest(Select::from(invoice::TABLE), 2);
    let pending_query = newest(
        Select::from(account::TABLE)
            .eq("verification_status", VerificationStatus::Pending.as_str()),
        2,
    );

    let (users, merchants, invoices, pending) = tokio::try_join!(
        fetch_all::<Account>(client, &users_query),
        fetch_all::<Account>(client, &merchants_query),
        fetch_all::<Invoice>(client, &invoices_query),
        fetch_all::<Account>(client, &pending_query),
    )?;

    Ok(merge_activity(&users, &merchants, &invoices, &pending))
}

/// Build the feed: newest first, at most [`ACTIVITY_LIMIT`] entries.
///
/// The sort is stable, so entries with equal timestamps keep their source
/// order (users, merchants, invoices, verification requests).
pub fn merge_activity(
    users: &[Account],
    merchants: &[Account],
    invoices: &[Invoice],
    pending: &[Account],
) -> Vec<RecentActivity> {
    let mut activity: Vec<RecentActivity> = users
        .iter()
        .map(|user| RecentActivity {
            id: user.id.to_string(),
            kind: ActivityKind::UserRegistered,
            title: "New user registered".to_string(),
            description: format!(
                "{} just created an account",
                non_empty(user.full_name.as_deref()).unwrap_or("Unknown User")
            ),
            created_at: user.created_at,
            user_name: user.full_name.clone(),
            amount: None,
        })
        .chain(merchants.iter().map(|merchant| {
            let name = merchant.merchant_display_name();
            RecentActivity {
                id: merchant.id.to_string(),
                kind: ActivityKind::MerchantRegistered,
                title: "New merchant added".to_string(),
                description: format!(
                    "{} joined as a merchant",
                    name.unwrap_or("Unknown Merchant")
                ),
                created_at: merchant.created_at,
                user_name: name.map(str::to_string),
                amount: None,
            }
        }))
        .chain(invoices.iter().map(|invoice| RecentActivity {
            id: invoice.id.to_string(),
            kind: ActivityKind::InvoiceCreated,
            title: "New transaction".to_string(),
            description: format!(
                "{} payment from {}",
                format_naira(parse_amount(invoice.invoice_amount.as_deref())),
                non_empty(invoice.customer_name.as_deref()).unwrap_or("Unknown Customer")
            ),
            created_at: invoice.created_at,
            user_name: None,
            amount: invoice.invoice_amount.clone(),
        }))
        .chain(pending.iter().map(|account| {
            let name = account.merchant_display_name();
            RecentActivity {
                id: account.id.to_string(),
                kind: ActivityKind::VerificationRequest,
                title: "Verification request".to_string(),
                description: format!(
                    "{} submitted verification documents",
                    name.unwrap_or("Unknown User")
                ),
                created_at: account.created_at,
                user_name: name.map(str::to_string),
                amount: None,
            }
        }))
        .collect();

    activity.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    activity.truncate(ACTIVITY_LIMIT);
    activity
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryClient;
    use crate::services::fixtures;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn amount(text: &str, created_at: &str) -> InvoiceAmount {
        serde_json::from_value(json!({"invoice_amount": text, "created_at": created_at})).unwrap()
    }

    #[test]
    fn seven_invoices_sum_back_to_total() {
        let months = trailing_months(now(), SERIES_MONTHS);
        let invoices: Vec<InvoiceAmount> = [
            ("₦1,000", "2026-04-02T08:00:00Z"),
            ("₦2,000", "2026-05-31T23:59:59Z"),
            ("₦3,000.25", "2026-06-15T12:00:00Z"),
            ("₦4,000", "2026-07-01T00:00:00Z"),
            ("₦5,000", "2026-08-20T09:30:00Z"),
            ("₦6,000", "2026-09-09T09:09:09Z"),
            ("₦7,000", "2026-10-16T18:00:00Z"),
        ]
        .iter()
        .map(|(text, at)| amount(text, at))
        .collect();

        let series = bucket_revenue(&months, &invoices);
        let total: f64 = invoices.iter().map(InvoiceAmount::amount).sum();
        let series_total: f64 = series.iter().map(|p| p.revenue).sum();

        assert!((series_total - total).abs() < 1e-9);
        let labels: Vec<&str> = series.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(labels, ["Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct"]);
        assert_eq!(series[2].revenue, 3000.25);
    }

    #[test]
    fn invoices_outside_window_are_dropped() {
        let months = trailing_months(now(), SERIES_MONTHS);
        // Same month name as a bucket, one year earlier.
        let invoices = vec![
            amount("₦500", "2025-10-10T10:00:00Z"),
            amount("₦100", "2026-10-01T00:00:00Z"),
        ];
        let series = bucket_revenue(&months, &invoices);
        assert_eq!(series[6].revenue, 100.0);
        assert_eq!(series.iter().map(|p| p.revenue).sum::<f64>(), 100.0);
    }

    #[test]
    fn empty_months_are_zero() {
        let series = bucket_revenue(&trailing_months(now(), SERIES_MONTHS), &[]);
        assert_eq!(series.len(), 7);
        assert!(series.iter().all(|p| p.revenue == 0.0));
    }

    fn accounts(rows: Vec<serde_json::Value>) -> Vec<Account> {
        rows.into_iter()
            .map(|row| serde_json::from_value(row).unwrap())
            .collect()
    }

    #[test]
    fn activity_is_newest_first_and_capped() {
        let users = accounts(vec![
            fixtures::account(1, "user", "verified", "2026-10-01T10:00:00Z"),
            fixtures::account(2, "user", "verified", "2026-10-05T10:00:00Z"),
            fixtures::account(3, "user", "verified", "2026-10-09T10:00:00Z"),
        ]);
        let mut brand = fixtures::account(4, "merchant", "pending", "2026-10-08T10:00:00Z");
        brand["brand_name"] = json!("Tee's Kitchen");
        let merchants = accounts(vec![
            brand.clone(),
            fixtures::account(5, "merchant", "verified", "2026-09-01T10:00:00Z"),
        ]);
        let invoices: Vec<Invoice> = vec![
            serde_json::from_value(fixtures::invoice(6, "₦1,200.50", "2026-10-10T10:00:00Z"))
                .unwrap(),
            serde_json::from_value(json!({
                "id": fixtures::id(7),
                "created_at": "2026-08-01T10:00:00Z",
                "invoice_amount": "garbage"
            }))
            .unwrap(),
        ];
        let pending = accounts(vec![brand]);

        let feed = merge_activity(&users, &merchants, &invoices, &pending);

        assert_eq!(feed.len(), ACTIVITY_LIMIT);
        assert!(feed.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        assert_eq!(feed[0].kind, ActivityKind::InvoiceCreated);
        assert_eq!(feed[0].description, "₦1,200.5 payment from Customer 6");
        assert_eq!(feed[0].amount.as_deref(), Some("₦1,200.50"));

        assert_eq!(feed[1].kind, ActivityKind::UserRegistered);
        assert_eq!(feed[1].description, "Person 3 just created an account");

        // Same account, same timestamp: merchant entry precedes the verification request.
        assert_eq!(feed[2].kind, ActivityKind::MerchantRegistered);
        assert_eq!(feed[2].description, "Tee's Kitchen joined as a merchant");
        assert_eq!(feed[3].kind, ActivityKind::VerificationRequest);
        assert_eq!(
            feed[3].description,
            "Tee's Kitchen submitted verification documents"
        );
    }

    #[test]
    fn activity_serializes_type_tag() {
        let feed = merge_activity(
            &accounts(vec![json!({
                "id": fixtures::id(1),
                "user_id": "v1",
                "created_at": "2026-10-01T10:00:00Z",
                "user_type": "user",
                "verification_status": "unverified"
            })]),
            &[],
            &[],
            &[],
        );
        let json = serde_json::to_value(&feed[0]).unwrap();
        assert_eq!(json["type"], "user_registered");
        assert_eq!(json["description"], "Unknown User just created an account");
        assert!(json.get("amount").is_none());
    }

    #[tokio::test]
    async fn stats_over_memory_client() {
        let client = MemoryClient::new()
            .with_table(
                account::TABLE,
                vec![
                    fixtures::account(1, "user", "verified", "2026-10-02T10:00:00Z"),
                    fixtures::account(2, "user", "pending", "2026-09-02T10:00:00Z"),
                    fixtures::account(3, "merchant", "pending", "2026-09-03T10:00:00Z"),
                    fixtures::account(4, "merchant", "verified", "2025-01-03T10:00:00Z"),
                ],
            )
            .with_table(
                invoice::TABLE,
                vec![
                    fixtures::invoice(10, "₦1,200.50", "2026-10-03T10:00:00Z"),
                    fixtures::invoice(11, "invalid", "2026-09-03T10:00:00Z"),
                    fixtures::invoice(12, "₦0", "2026-08-03T10:00:00Z"),
                ],
            );

        let stats = get_stats(&client, now()).await.unwrap();

        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_merchants, 2);
        assert_eq!(stats.pending_verifications, 2);
        assert!((stats.total_revenue - 1200.5).abs() < 1e-9);

        assert_eq!(stats.user_growth.len(), 7);
        let sep = &stats.user_growth[5];
        assert_eq!((sep.month.as_str(), sep.users, sep.merchants), ("Sep", 1, 1));
        let oct = &stats.user_growth[6];
        assert_eq!((oct.users, oct.merchants), (1, 0));

        assert_eq!(stats.revenue[6].revenue, 1200.5);
        assert!(stats.recent_activity.len() <= ACTIVITY_LIMIT);
        assert_eq!(stats.recent_activity[0].kind, ActivityKind::InvoiceCreated);
    }

    #[tokio::test]
    async fn one_failed_query_fails_the_snapshot() {
        let client = MemoryClient::new();
        client.fail_table(invoice::TABLE).await;
        let err = get_stats(&client, now()).await.unwrap_err();
        assert!(matches!(err, AppError::Remote(_)));
    }
}
