//! Hostel reference data CRUD.

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::schools::{inserted, single};
use crate::errors::AppError;
use crate::models::hostel::{self, Hostel, HostelInput};
use crate::remote::{fetch_all, DataClient, Filter, Select};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostelFilters {
    pub school_id: Option<Uuid>,
}

pub async fn list(client: &dyn DataClient, filters: &HostelFilters) -> Result<Vec<Hostel>, AppError> {
    let mut query = Select::from(hostel::TABLE);
    if let Some(school_id) = filters.school_id {
        query = query.eq("school_id", school_id.to_string());
    }
    Ok(fetch_all(client, &query.order_desc("created_at")).await?)
}

fn row(input: &HostelInput) -> Result<serde_json::Value, AppError> {
    let name = input.name.trim();
    let input = HostelInput {
        name: name.to_string(),
        ..input.clone()
    };
    input.validate()?;
    Ok(json!({
        "name": input.name,
        "school_id": input.school_id,
        "gender": input.gender,
    }))
}

pub async fn create(client: &dyn DataClient, input: &HostelInput) -> Result<Hostel, AppError> {
    let row = row(input)?;
    let stored = client.insert(hostel::TABLE, vec![row]).await?;
    let created = inserted(stored, hostel::TABLE)?;
    tracing::info!(school_id = %input.school_id, "Hostel created");
    Ok(created)
}

pub async fn update(
    client: &dyn DataClient,
    id: Uuid,
    input: &HostelInput,
) -> Result<Hostel, AppError> {
    let patch = row(input)?;
    let updated = client
        .update(hostel::TABLE, &[Filter::eq("id", id.to_string())], patch)
        .await?;
    single(updated, &format!("Hostel {id}"))
}

pub async fn delete(client: &dyn DataClient, id: Uuid) -> Result<(), AppError> {
    let deleted = client
        .delete(hostel::TABLE, &[Filter::eq("id", id.to_string())])
        .await?;
    if deleted.is_empty() {
        return Err(AppError::NotFound(format!("Hostel {id}")));
    }
    tracing::info!(hostel_id = %id, "Hostel deleted");
    Ok(())
}
