//! Invoices (`invoices`). Amounts are stored as display text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::amount::parse_amount;

pub const TABLE: &str = "invoices";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub invoice_status: Option<String>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub merchant_number: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_number: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Free text such as `"₦1,200.50"`.
    #[serde(default)]
    pub invoice_amount: Option<String>,
}

impl Invoice {
    /// Numeric amount; unparseable text counts as 0.
    pub fn amount(&self) -> f64 {
        parse_amount(self.invoice_amount.as_deref())
    }
}

/// Amount and timestamp only, for revenue aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceAmount {
    #[serde(default)]
    pub invoice_amount: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl InvoiceAmount {
    pub fn amount(&self) -> f64 {
        parse_amount(self.invoice_amount.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amount_parses_display_text() {
        let invoice: Invoice = serde_json::from_value(json!({
            "id": "9a8b7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d",
            "created_at": "2026-06-01T12:00:00Z",
            "invoice_amount": "₦12,500.00",
            "customer_name": "Ada Obi"
        }))
        .unwrap();
        assert_eq!(invoice.amount(), 12500.0);
    }

    #[test]
    fn missing_amount_is_zero() {
        let invoice: InvoiceAmount =
            serde_json::from_value(json!({"created_at": "2026-06-01T12:00:00Z"})).unwrap();
        assert_eq!(invoice.amount(), 0.0);
    }
}
