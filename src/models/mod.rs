//! Remote records and DTOs for all domain entities.

pub mod account;
pub mod hostel;
pub mod invoice;
pub mod pagination;
pub mod product;
pub mod request_log;
pub mod review;
pub mod school;

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Read a JSON `null` array as empty.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Query-string field where an empty value means "not set".
///
/// Filter forms submit `date_from=` or `min_amount=` when left blank.
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "blank_as_none")]
        date_from: Option<NaiveDate>,
        #[serde(default, deserialize_with = "blank_as_none")]
        min_amount: Option<f64>,
        #[serde(default, deserialize_with = "null_as_empty")]
        tags: Vec<String>,
    }

    #[test]
    fn blank_fields_are_none() {
        let form: Form =
            serde_json::from_str(r#"{"date_from": "", "min_amount": " ", "tags": null}"#).unwrap();
        assert!(form.date_from.is_none());
        assert!(form.min_amount.is_none());
        assert!(form.tags.is_empty());
    }

    #[test]
    fn filled_fields_parse() {
        let form: Form =
            serde_json::from_str(r#"{"date_from": "2026-01-31", "min_amount": "250.5"}"#).unwrap();
        assert_eq!(form.date_from, NaiveDate::from_ymd_opt(2026, 1, 31));
        assert_eq!(form.min_amount, Some(250.5));
    }

    #[test]
    fn malformed_field_is_rejected() {
        let result: Result<Form, _> = serde_json::from_str(r#"{"date_from": "yesterday"}"#);
        assert!(result.is_err());
    }
}
