//! In-process `DataClient` over JSON rows.
//!
//! Evaluates the same [`Select`] model as the hosted service: filters,
//! ordering (nulls last ascending, first descending), range pagination and
//! exact counts. Column projection and resource embedding are not evaluated;
//! rows come back as stored, so seed embedded objects directly when needed.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::query::{value_text, CompareOp, Filter, Select};
use super::{DataClient, RemoteError, Rows};

#[derive(Debug, Default)]
pub struct MemoryClient {
    tables: RwLock<HashMap<String, Vec<Value>>>,
    failing: RwLock<HashSet<String>>,
    calls: AtomicUsize,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seeding, for use before the client is shared.
    pub fn with_table(mut self, table: &str, rows: Vec<Value>) -> Self {
        self.tables
            .get_mut()
            .entry(table.to_string())
            .or_default()
            .extend(rows);
        self
    }

    /// Append rows to a table.
    pub async fn seed(&self, table: &str, rows: Vec<Value>) {
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    /// Current contents of a table.
    pub async fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every later call touching `table` fail like an unavailable service.
    pub async fn fail_table(&self, table: &str) {
        self.failing.write().await.insert(table.to_string());
    }

    /// Number of calls received so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    async fn enter(&self, table: &str) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        if self.failing.read().await.contains(table) {
            return Err(RemoteError::Api {
                status: 503,
                message: format!("relation \"{table}\" is unavailable"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DataClient for MemoryClient {
    async fn select(&self, query: &Select) -> Result<Rows, RemoteError> {
        self.enter(&query.table).await?;

        let tables = self.tables.read().await;
        let mut rows: Vec<Value> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(&query.filters, row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(tables);

        let count = query.count.then_some(rows.len() as i64);

        if query.head {
            return Ok(Rows {
                rows: Vec::new(),
                count,
            });
        }

        if !query.order.is_empty() {
            rows.sort_by(|a, b| {
                for key in &query.order {
                    let ord = order_nulls_last(field(a, &key.column), field(b, &key.column));
                    let ord = if key.ascending { ord } else { ord.reverse() };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }

        let rows = match (query.range, query.limit) {
            (Some((from, to)), _) => rows
                .into_iter()
                .skip(from as usize)
                .take((to.saturating_sub(from) + 1) as usize)
                .collect(),
            (None, Some(limit)) => rows.into_iter().take(limit as usize).collect(),
            (None, None) => rows,
        };

        Ok(Rows { rows, count })
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, RemoteError> {
        self.enter(table).await?;

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let Value::Object(mut object) = row else {
                return Err(RemoteError::Api {
                    status: 400,
                    message: "insert expects JSON objects".to_string(),
                });
            };
            object
                .entry("id")
                .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
            object
                .entry("created_at")
                .or_insert_with(|| Value::String(now.clone()));
            stored.push(Value::Object(object));
        }

        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, RemoteError> {
        self.enter(table).await?;

        let Value::Object(patch) = patch else {
            return Err(RemoteError::Api {
                status: 400,
                message: "update expects a JSON object".to_string(),
            });
        };

        let mut tables = self.tables.write().await;
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| matches_all(filters, row)) {
                if let Value::Object(object) = row {
                    merge(object, &patch);
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, RemoteError> {
        self.enter(table).await?;

        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };
        let (removed, kept): (Vec<Value>, Vec<Value>) = rows
            .drain(..)
            .partition(|row| matches_all(filters, row));
        *rows = kept;
        Ok(removed)
    }
}

fn merge(object: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        object.insert(key.clone(), value.clone());
    }
}

fn field<'a>(row: &'a Value, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&Value::Null)
}

fn matches_all(filters: &[Filter], row: &Value) -> bool {
    filters.iter().all(|filter| matches(filter, row))
}

fn matches(filter: &Filter, row: &Value) -> bool {
    match filter {
        Filter::Compare { column, op, value } => compare(field(row, column), *op, value),
        Filter::In { column, values } => {
            let actual = field(row, column);
            values.iter().any(|v| loosely_equal(actual, v))
        }
        Filter::ILike { column, pattern } => ilike(field(row, column), pattern),
        Filter::AnyILike { columns, pattern } => {
            columns.iter().any(|column| ilike(field(row, column), pattern))
        }
    }
}

fn compare(actual: &Value, op: CompareOp, expected: &Value) -> bool {
    match op {
        CompareOp::Eq => loosely_equal(actual, expected),
        // SQL semantics: NULL <> x is not true.
        CompareOp::Neq => !actual.is_null() && !loosely_equal(actual, expected),
        CompareOp::Gt => ordering(actual, expected) == Some(Ordering::Greater),
        CompareOp::Gte => matches!(
            ordering(actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::Lt => ordering(actual, expected) == Some(Ordering::Less),
        CompareOp::Lte => matches!(
            ordering(actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
    }
}

fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        _ => value_text(a) == value_text(b),
    }
}

fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn ordering(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::Number(x), Value::String(y)) => x.as_f64()?.partial_cmp(&y.parse::<f64>().ok()?),
        (Value::String(x), Value::Number(y)) => x.parse::<f64>().ok()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => match (parse_instant(x), parse_instant(y)) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => Some(x.cmp(y)),
        },
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn order_nulls_last(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => ordering(a, b).unwrap_or(Ordering::Equal),
    }
}

fn ilike(actual: &Value, pattern: &str) -> bool {
    if actual.is_null() {
        return false;
    }
    let mut expr = String::from("(?is)^");
    for c in pattern.chars() {
        match c {
            '%' => expr.push_str(".*"),
            '_' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');
    Regex::new(&expr)
        .map(|re| re.is_match(&value_text(actual)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{fetch_all, head_count};
    use serde_json::json;

    fn visitors() -> MemoryClient {
        MemoryClient::new().with_table(
            "unique_visitors",
            vec![
                json!({"id": "1", "full_name": "Ada Obi", "user_type": "user", "verification_status": "pending", "created_at": "2026-03-01T10:00:00Z"}),
                json!({"id": "2", "full_name": "Tunde Bello", "user_type": "merchant", "verification_status": "verified", "created_at": "2026-05-01T10:00:00Z"}),
                json!({"id": "3", "full_name": null, "user_type": "user", "verification_status": "unverified", "created_at": "2026-04-01T10:00:00Z"}),
            ],
        )
    }

    #[tokio::test]
    async fn filters_combine_with_and() {
        let client = visitors();
        let rows = client
            .select(
                &Select::from("unique_visitors")
                    .eq("user_type", "user")
                    .gte("created_at", "2026-03-15"),
            )
            .await
            .unwrap();
        assert_eq!(rows.rows.len(), 1);
        assert_eq!(rows.rows[0]["id"], "3");
    }

    #[tokio::test]
    async fn count_ignores_range() {
        let client = visitors();
        let rows = client
            .select(
                &Select::from("unique_visitors")
                    .order_desc("created_at")
                    .range(0, 0)
                    .exact_count(),
            )
            .await
            .unwrap();
        assert_eq!(rows.count, Some(3));
        assert_eq!(rows.rows.len(), 1);
        assert_eq!(rows.rows[0]["id"], "2");
    }

    #[tokio::test]
    async fn head_count_materializes_nothing() {
        let client = visitors();
        let total = head_count(&client, Select::from("unique_visitors").eq("user_type", "user"))
            .await
            .unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn ilike_is_case_insensitive_and_skips_nulls() {
        let client = visitors();
        let rows: Vec<Value> = fetch_all(
            &client,
            &Select::from("unique_visitors").any_ilike(&["full_name"], "%ADA%"),
        )
        .await
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "1");
    }

    #[tokio::test]
    async fn in_list_matches_any() {
        let client = visitors();
        let rows = client
            .select(&Select::from("unique_visitors").in_list("id", ["1", "3"]))
            .await
            .unwrap();
        assert_eq!(rows.rows.len(), 2);
    }

    #[tokio::test]
    async fn descending_order_puts_nulls_first() {
        let client = visitors();
        let rows = client
            .select(&Select::from("unique_visitors").order_desc("full_name"))
            .await
            .unwrap();
        assert_eq!(rows.rows[0]["id"], "3");
        assert_eq!(rows.rows[1]["id"], "2");
    }

    #[tokio::test]
    async fn update_merges_patch_into_matching_rows() {
        let client = visitors();
        let updated = client
            .update(
                "unique_visitors",
                &[Filter::eq("id", "1")],
                json!({"verification_status": "verified"}),
            )
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        let rows = client.rows("unique_visitors").await;
        assert_eq!(rows[0]["verification_status"], "verified");
        assert_eq!(rows[0]["full_name"], "Ada Obi");
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let client = MemoryClient::new();
        let stored = client
            .insert("schools", vec![json!({"name": "University of Lagos"})])
            .await
            .unwrap();
        assert!(stored[0]["id"].is_string());
        assert!(stored[0]["created_at"].is_string());
        assert_eq!(client.rows("schools").await.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_matching_rows() {
        let client = visitors();
        let removed = client
            .delete("unique_visitors", &[Filter::eq("user_type", "user")])
            .await
            .unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(client.rows("unique_visitors").await.len(), 1);
    }

    #[tokio::test]
    async fn failing_table_errors_and_counts_calls() {
        let client = visitors();
        client.fail_table("invoices").await;
        let err = client.select(&Select::from("invoices")).await.unwrap_err();
        assert!(matches!(err, RemoteError::Api { status: 503, .. }));
        assert_eq!(client.calls(), 1);
    }
}
