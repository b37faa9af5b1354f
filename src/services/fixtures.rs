//! Row builders for service tests.

use serde_json::{json, Value};
use uuid::Uuid;

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn account(n: u128, user_type: &str, status: &str, created_at: &str) -> Value {
    json!({
        "id": id(n),
        "user_id": format!("visitor-{n}"),
        "created_at": created_at,
        "user_type": user_type,
        "verification_status": status,
        "full_name": format!("Person {n}"),
        "email": format!("person{n}@campus.ng"),
    })
}

pub fn product(n: u128, merchant: u128, created_at: &str, categories: &[&str]) -> Value {
    json!({
        "id": id(n),
        "created_at": created_at,
        "merchant_id": id(merchant),
        "product_description": format!("Product {n}"),
        "product_price": "1500",
        "is_available": true,
        "is_featured": false,
        "image_urls": [],
        "product_categories": categories,
    })
}

pub fn invoice(n: u128, amount: &str, created_at: &str) -> Value {
    json!({
        "id": id(n),
        "created_at": created_at,
        "invoice_status": "paid",
        "customer_name": format!("Customer {n}"),
        "invoice_amount": amount,
    })
}

pub fn review(n: u128, rating: i32, featured: bool, created_at: &str) -> Value {
    json!({
        "id": id(n),
        "user_id": format!("visitor-{n}"),
        "user_name": format!("Reviewer {n}"),
        "rating": rating,
        "review_text": "Great service",
        "is_featured": featured,
        "created_at": created_at,
    })
}

pub fn school(n: u128, short_name: &str, created_at: &str) -> Value {
    json!({
        "id": id(n),
        "name": format!("University of {short_name}"),
        "short_name": short_name,
        "is_active": true,
        "created_at": created_at,
    })
}
