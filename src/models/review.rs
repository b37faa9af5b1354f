//! Site reviews (`site_reviews`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TABLE: &str = "site_reviews";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    /// 1 to 5.
    pub rating: i32,
    #[serde(default)]
    pub review_text: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReviewRating {
    pub rating: i32,
}
