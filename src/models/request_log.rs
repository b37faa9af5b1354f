//! Buyer request log (`request_logs`). Only read for analytics.

use serde::Deserialize;

pub const TABLE: &str = "request_logs";

#[derive(Debug, Clone, Deserialize)]
pub struct RequestUniversity {
    #[serde(default)]
    pub university: Option<String>,
}
