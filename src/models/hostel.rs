//! Hostels (`hostels`): each belongs to one school.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const TABLE: &str = "hostels";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HostelGender {
    Male,
    Female,
    Mixed,
    #[serde(rename = "Not Selected")]
    NotSelected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hostel {
    pub id: Uuid,
    pub name: String,
    pub school_id: Uuid,
    #[serde(default)]
    pub gender: Option<HostelGender>,
    pub created_at: DateTime<Utc>,
}

/// Create or edit a hostel.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HostelInput {
    #[validate(length(min = 1))]
    pub name: String,
    pub school_id: Uuid,
    #[serde(default)]
    pub gender: Option<HostelGender>,
}
