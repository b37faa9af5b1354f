//! Helpers for turning optional list filters into query predicates.

use chrono::NaiveDate;

use super::calendar::{day_end, day_start};
use crate::errors::AppError;
use crate::remote::query::contains_pattern;
use crate::remote::Select;

/// The value a filter constrains on, or `None` for "no constraint".
///
/// Absent, blank and the `All` sentinel (any case) all mean no predicate.
/// Status values are compared lower-case on the remote side.
pub fn active(value: &Option<String>) -> Option<String> {
    let value = value.as_deref()?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(value.to_lowercase())
    }
}

/// Boolean filter given as `All`, `true` or `false`.
pub fn flag(name: &str, value: &Option<String>) -> Result<Option<bool>, AppError> {
    match active(value).as_deref() {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(AppError::Validation(format!(
            "{name} must be All, true or false, got {other:?}"
        ))),
    }
}

/// Search term, trimmed, with case preserved.
pub fn search_term(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Inclusive `created_at` bounds for a date range.
pub fn created_between(
    query: Select,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
) -> Select {
    let query = match date_from {
        Some(from) => query.gte("created_at", day_start(from)),
        None => query,
    };
    match date_to {
        Some(to) => query.lte("created_at", day_end(to)),
        None => query,
    }
}

/// Case-insensitive substring match on any of `columns`.
pub fn matching_any(query: Select, columns: &[&str], term: Option<&str>) -> Select {
    match term {
        Some(term) if columns.len() == 1 => query.ilike(columns[0], &contains_pattern(term)),
        Some(term) => query.any_ilike(columns, &contains_pattern(term)),
        None => query,
    }
}
