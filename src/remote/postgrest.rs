//! reqwest client for a PostgREST endpoint (the hosted Supabase REST API).
//!
//! Filters travel as query parameters (`col=op.value`), the exact count is
//! requested with `Prefer: count=exact` and read back from `Content-Range`,
//! and head counts use `HEAD` so no rows cross the wire.

use async_trait::async_trait;
use reqwest::header::CONTENT_RANGE;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::Value;

use super::query::{value_text, Filter, Select};
use super::{DataClient, RemoteError, Rows};

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    hint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostgrestClient {
    http: Client,
    rest_url: Url,
    api_key: String,
}

impl PostgrestClient {
    /// Build a client for `{base_url}/rest/v1/`.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, RemoteError> {
        if base_url.trim().is_empty() {
            return Err(RemoteError::Config("data service URL is not set".to_string()));
        }
        if api_key.trim().is_empty() {
            return Err(RemoteError::Config("data service key is not set".to_string()));
        }

        let mut rest_url = Url::parse(base_url)
            .map_err(|e| RemoteError::Config(format!("invalid data service URL: {e}")))?;
        let path = format!("{}/rest/v1/", rest_url.path().trim_end_matches('/'));
        rest_url.set_path(&path);

        let http = Client::builder().build()?;

        Ok(Self {
            http,
            rest_url,
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str, params: &[(String, String)]) -> Result<Url, RemoteError> {
        let mut url = self
            .rest_url
            .join(table)
            .map_err(|e| RemoteError::Config(format!("invalid table name '{table}': {e}")))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[async_trait]
impl DataClient for PostgrestClient {
    async fn select(&self, query: &Select) -> Result<Rows, RemoteError> {
        let url = self.table_url(&query.table, &select_params(query))?;
        let method = if query.head { Method::HEAD } else { Method::GET };

        let mut request = self.request(method, url);
        if query.count {
            request = request.header("Prefer", "count=exact");
        }

        tracing::debug!(table = %query.table, head = query.head, "Remote select");
        let response = error_for_status(request.send().await?).await?;

        let count = if query.count {
            response
                .headers()
                .get(CONTENT_RANGE)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_content_range)
        } else {
            None
        };

        let rows = if query.head {
            Vec::new()
        } else {
            response
                .json::<Vec<Value>>()
                .await
                .map_err(|e| RemoteError::Decode(e.to_string()))?
        };

        Ok(Rows { rows, count })
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, RemoteError> {
        let url = self.table_url(table, &[])?;
        tracing::debug!(table, rows = rows.len(), "Remote insert");
        let response = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&rows)
            .send()
            .await?;
        read_rows(error_for_status(response).await?).await
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, RemoteError> {
        let params: Vec<(String, String)> = filters.iter().map(filter_param).collect();
        let url = self.table_url(table, &params)?;
        tracing::debug!(table, "Remote update");
        let response = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;
        read_rows(error_for_status(response).await?).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, RemoteError> {
        let params: Vec<(String, String)> = filters.iter().map(filter_param).collect();
        let url = self.table_url(table, &params)?;
        tracing::debug!(table, "Remote delete");
        let response = self
            .request(Method::DELETE, url)
            .header("Prefer", "return=representation")
            .send()
            .await?;
        read_rows(error_for_status(response).await?).await
    }
}

async fn read_rows(response: Response) -> Result<Vec<Value>, RemoteError> {
    response
        .json::<Vec<Value>>()
        .await
        .map_err(|e| RemoteError::Decode(e.to_string()))
}

/// Turn a non-2xx response into `RemoteError::Api`, preferring the service's own message.
async fn error_for_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            message: Some(message),
            hint,
        }) if !message.is_empty() => match hint {
            Some(hint) if !hint.is_empty() => format!("{message} ({hint})"),
            _ => message,
        },
        _ if !body.trim().is_empty() => body,
        _ => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };

    tracing::warn!(status = status.as_u16(), %message, "Remote call rejected");
    Err(RemoteError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Total from a `Content-Range` header such as `0-9/42` or `*/42`.
fn parse_content_range(value: &str) -> Option<i64> {
    value.split_once('/')?.1.trim().parse().ok()
}

/// Quote a value that contains PostgREST list delimiters.
fn quote_reserved(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '(' | ')' | '"' | '\\' | ':')) {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

fn filter_param(filter: &Filter) -> (String, String) {
    match filter {
        Filter::Compare { column, op, value } => {
            (column.clone(), format!("{}.{}", op.as_str(), value_text(value)))
        }
        Filter::In { column, values } => {
            let list: Vec<String> = values.iter().map(|v| quote_reserved(&value_text(v))).collect();
            (column.clone(), format!("in.({})", list.join(",")))
        }
        Filter::ILike { column, pattern } => (column.clone(), format!("ilike.{pattern}")),
        Filter::AnyILike { columns, pattern } => {
            let pattern = quote_reserved(pattern);
            let parts: Vec<String> = columns
                .iter()
                .map(|column| format!("{column}.ilike.{pattern}"))
                .collect();
            ("or".to_string(), format!("({})", parts.join(",")))
        }
    }
}

fn select_params(query: &Select) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), query.columns.clone())];
    params.extend(query.filters.iter().map(filter_param));

    if !query.order.is_empty() {
        let order: Vec<String> = query
            .order
            .iter()
            .map(|o| format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" }))
            .collect();
        params.push(("order".to_string(), order.join(",")));
    }

    match (query.range, query.limit) {
        (Some((from, to)), _) => {
            params.push(("offset".to_string(), from.to_string()));
            params.push(("limit".to_string(), (to.saturating_sub(from) + 1).to_string()));
        }
        (None, Some(limit)) => params.push(("limit".to_string(), limit.to_string())),
        (None, None) => {}
    }

    params
}
