//! Table query model shared by every `DataClient` implementation.
//!
//! A [`Select`] is built the same way the hosted client's query chain reads:
//! `Select::from("invoices").eq(..).gte(..).order_desc("created_at").range(0, 9)`.
//! Implementations decide how to evaluate it (query string, in-memory scan).

use serde_json::Value;

/// Scalar comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// Operator keyword in PostgREST filter syntax.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Neq => "neq",
            CompareOp::Gt => "gt",
            CompareOp::Gte => "gte",
            CompareOp::Lt => "lt",
            CompareOp::Lte => "lte",
        }
    }
}

/// A single row predicate. Predicates on one query combine with AND.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Compare {
        column: String,
        op: CompareOp,
        value: Value,
    },
    In {
        column: String,
        values: Vec<Value>,
    },
    /// Case-insensitive LIKE; `%` matches any run, `_` any single char.
    ILike { column: String, pattern: String },
    /// Matches when any of the columns matches the ILIKE pattern.
    AnyILike {
        columns: Vec<String>,
        pattern: String,
    },
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Filter::Compare {
            column: column.to_string(),
            op: CompareOp::Eq,
            value: value.into(),
        }
    }

    /// Column the predicate reads, or the first one for `AnyILike`.
    pub fn column(&self) -> &str {
        match self {
            Filter::Compare { column, .. }
            | Filter::In { column, .. }
            | Filter::ILike { column, .. } => column,
            Filter::AnyILike { columns, .. } => columns.first().map(String::as_str).unwrap_or(""),
        }
    }
}

/// Sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A read query against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    /// Inclusive zero-based row range.
    pub range: Option<(u64, u64)>,
    pub limit: Option<u64>,
    /// Request an exact total row count alongside the rows.
    pub count: bool,
    /// Count only; no rows are materialized.
    pub head: bool,
}

impl Select {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            range: None,
            limit: None,
            count: false,
            head: false,
        }
    }

    /// Projection, including embedded resources such as `*,schools(name,short_name)`.
    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = columns.chars().filter(|c| !c.is_whitespace()).collect();
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    fn compare(self, column: &str, op: CompareOp, value: impl Into<Value>) -> Self {
        self.filter(Filter::Compare {
            column: column.to_string(),
            op,
            value: value.into(),
        })
    }

    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.compare(column, CompareOp::Eq, value)
    }

    pub fn neq(self, column: &str, value: impl Into<Value>) -> Self {
        self.compare(column, CompareOp::Neq, value)
    }

    pub fn gte(self, column: &str, value: impl Into<Value>) -> Self {
        self.compare(column, CompareOp::Gte, value)
    }

    pub fn lte(self, column: &str, value: impl Into<Value>) -> Self {
        self.compare(column, CompareOp::Lte, value)
    }

    pub fn in_list<V: Into<Value>>(self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.filter(Filter::In {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn ilike(self, column: &str, pattern: &str) -> Self {
        self.filter(Filter::ILike {
            column: column.to_string(),
            pattern: pattern.to_string(),
        })
    }

    pub fn any_ilike(self, columns: &[&str], pattern: &str) -> Self {
        self.filter(Filter::AnyILike {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            pattern: pattern.to_string(),
        })
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order.push(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn order_desc(self, column: &str) -> Self {
        self.order(column, false)
    }

    pub fn range(mut self, from: u64, to: u64) -> Self {
        self.range = Some((from, to));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn exact_count(mut self) -> Self {
        self.count = true;
        self
    }

    /// Head-count query: only the exact count comes back.
    pub fn head(mut self) -> Self {
        self.count = true;
        self.head = true;
        self
    }
}

/// ILIKE pattern matching `term` anywhere in the column.
pub fn contains_pattern(term: &str) -> String {
    format!("%{term}%")
}

/// Textual form of a filter value as the remote service receives it.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_filters_in_order() {
        let q = Select::from("unique_visitors")
            .eq("user_type", "user")
            .gte("created_at", "2026-01-01")
            .order_desc("created_at")
            .range(10, 19)
            .exact_count();

        assert_eq!(q.table, "unique_visitors");
        assert_eq!(q.filters.len(), 2);
        assert_eq!(q.filters[0], Filter::eq("user_type", "user"));
        assert_eq!(q.filters[1].column(), "created_at");
        assert_eq!(q.range, Some((10, 19)));
        assert!(q.count);
        assert!(!q.head);
        assert!(!q.order[0].ascending);
    }

    #[test]
    fn columns_strip_whitespace() {
        let q = Select::from("unique_visitors").columns("*, schools ( name, short_name )");
        assert_eq!(q.columns, "*,schools(name,short_name)");
    }

    #[test]
    fn head_implies_count() {
        let q = Select::from("schools").head();
        assert!(q.count);
        assert!(q.head);
    }

    #[test]
    fn value_text_renders_scalars() {
        assert_eq!(value_text(&Value::from("pending")), "pending");
        assert_eq!(value_text(&Value::from(true)), "true");
        assert_eq!(value_text(&Value::from(42)), "42");
        assert_eq!(value_text(&Value::Null), "null");
    }
}
