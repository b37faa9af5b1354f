//! Schools (`schools`) reference data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const TABLE: &str = "schools";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct School {
    pub id: Uuid,
    pub name: String,
    pub short_name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Create or rename a school.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SchoolInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub short_name: String,
}

impl SchoolInput {
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            short_name: self.short_name.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_fail_validation() {
        let input = SchoolInput {
            name: "  ".to_string(),
            short_name: "UNILAG".to_string(),
        };
        let errors = input.trimmed().validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn school_defaults_active() {
        let school: School = serde_json::from_str(
            r#"{"id": "0e8d7c6b-5a4f-4e3d-9c2b-1a0f9e8d7c6b", "name": "University of Lagos", "short_name": "UNILAG", "created_at": "2025-09-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(school.is_active);
    }
}
