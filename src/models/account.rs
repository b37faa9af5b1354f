//! Marketplace accounts (`unique_visitors`): users and merchants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TABLE: &str = "unique_visitors";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    User,
    Merchant,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::User => "user",
            UserType::Merchant => "merchant",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Unverified,
    Pending,
}

impl VerificationStatus {
    /// Fixed reporting order used by analytics.
    pub const ALL: [VerificationStatus; 3] = [
        VerificationStatus::Verified,
        VerificationStatus::Unverified,
        VerificationStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::Pending => "pending",
        }
    }

    /// Display label, e.g. `Verified`.
    pub fn label(&self) -> &'static str {
        match self {
            VerificationStatus::Verified => "Verified",
            VerificationStatus::Unverified => "Unverified",
            VerificationStatus::Pending => "Pending",
        }
    }
}

/// School fields embedded through the `school_id` relation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchoolRef {
    pub name: String,
    pub short_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub first_visit: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_visit: Option<DateTime<Utc>>,
    #[serde(default)]
    pub visit_count: Option<i64>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub auth_user_id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub user_type: UserType,
    #[serde(default)]
    pub school_id: Option<Uuid>,
    #[serde(default)]
    pub brand_name: Option<String>,
    /// Reference to the uploaded verification evidence.
    #[serde(default)]
    pub verification_id: Option<String>,
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub schools: Option<SchoolRef>,

    // Hostel merchants
    #[serde(default)]
    pub is_hostel_merchant: Option<bool>,
    #[serde(default)]
    pub hostel_id: Option<Uuid>,
    #[serde(default)]
    pub room_number: Option<String>,
}

impl Account {
    /// Name shown for a merchant: brand first, then the person.
    pub fn merchant_display_name(&self) -> Option<&str> {
        self.brand_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.full_name.as_deref().filter(|s| !s.is_empty()))
    }
}
