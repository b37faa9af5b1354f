//! Merchant products (`merchant_products`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::Account;
use super::null_as_empty;

pub const TABLE: &str = "merchant_products";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub merchant_id: Option<Uuid>,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default)]
    pub product_price: Option<String>,
    #[serde(default)]
    pub discount_price: Option<String>,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub search_description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub product_categories: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub product_features: Vec<String>,
    /// Owning merchant, when embedded.
    #[serde(default)]
    pub unique_visitors: Option<Account>,
}

/// Category list only, for analytics.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCategories {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub product_categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_lists_decode_as_empty() {
        let product: Product = serde_json::from_value(json!({
            "id": "6f1d2c3b-4a59-4e8d-9c0b-7a6b5c4d3e2f",
            "created_at": "2026-02-11T08:30:00Z",
            "merchant_id": null,
            "is_available": true,
            "is_featured": false,
            "image_urls": null,
            "product_categories": ["food", "drinks"]
        }))
        .unwrap();

        assert!(product.image_urls.is_empty());
        assert!(product.product_features.is_empty());
        assert_eq!(product.product_categories, vec!["food", "drinks"]);
        assert!(product.unique_visitors.is_none());
    }
}
