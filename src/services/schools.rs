//! School reference data CRUD.

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::filters::active;
use crate::errors::AppError;
use crate::models::school::{self, School, SchoolInput};
use crate::remote::{fetch_all, DataClient, Filter, Rows, Select};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchoolListParams {
    /// `created_at` (newest first, the default) or `name` (A to Z).
    pub order: Option<String>,
}

pub fn query(params: &SchoolListParams) -> Result<Select, AppError> {
    let query = Select::from(school::TABLE);
    match active(&params.order).as_deref() {
        None | Some("created_at") => Ok(query.order_desc("created_at")),
        Some("name") => Ok(query.order("name", true)),
        Some(other) => Err(AppError::Validation(format!(
            "order must be created_at or name, got {other:?}"
        ))),
    }
}

pub async fn list(client: &dyn DataClient, params: &SchoolListParams) -> Result<Vec<School>, AppError> {
    let query = query(params)?;
    Ok(fetch_all(client, &query).await?)
}

pub async fn create(client: &dyn DataClient, input: &SchoolInput) -> Result<School, AppError> {
    let input = input.trimmed();
    input.validate()?;

    let stored = client
        .insert(
            school::TABLE,
            vec![json!({"name": input.name, "short_name": input.short_name})],
        )
        .await?;
    let created = inserted(stored, school::TABLE)?;
    tracing::info!(name = %input.name, "School created");
    Ok(created)
}

pub async fn update(
    client: &dyn DataClient,
    id: Uuid,
    input: &SchoolInput,
) -> Result<School, AppError> {
    let input = input.trimmed();
    input.validate()?;

    let updated = client
        .update(
            school::TABLE,
            &[Filter::eq("id", id.to_string())],
            json!({"name": input.name, "short_name": input.short_name}),
        )
        .await?;
    single(updated, &format!("School {id}"))
}

pub async fn delete(client: &dyn DataClient, id: Uuid) -> Result<(), AppError> {
    let deleted = client
        .delete(school::TABLE, &[Filter::eq("id", id.to_string())])
        .await?;
    if deleted.is_empty() {
        return Err(AppError::NotFound(format!("School {id}")));
    }
    tracing::info!(school_id = %id, "School deleted");
    Ok(())
}

/// First row of a write result, decoded. No row means nothing matched.
pub(crate) fn single<T: serde::de::DeserializeOwned>(
    rows: Vec<serde_json::Value>,
    what: &str,
) -> Result<T, AppError> {
    let row = Rows { rows, count: None }
        .decode::<T>()?
        .into_iter()
        .next();
    row.ok_or_else(|| AppError::NotFound(what.to_string()))
}

/// First row of an insert result. The data service always echoes inserted
/// rows, so an empty result is a server-side fault rather than a miss.
pub(crate) fn inserted<T: serde::de::DeserializeOwned>(
    rows: Vec<serde_json::Value>,
    table: &str,
) -> Result<T, AppError> {
    let row = Rows { rows, count: None }
        .decode::<T>()?
        .into_iter()
        .next();
    row.ok_or_else(|| AppError::Internal(format!("insert into {table} returned no row")))
}
