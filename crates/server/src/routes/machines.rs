//! Machine catalog endpoints and their wire types.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::machine::{self, MachineState};
use service::machine_store::{MachineFilter, MachineInput, Sort, SortDirection, SortField};
use service::pagination::{Page, PageRequest};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

/// Wire representation of a machine record.
/// The mapping to and from the entity is total: every column is accounted
/// for, in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDto {
    pub id: i64,
    pub name: String,
    pub site: String,
    pub installed_at: DateTime<FixedOffset>,
    pub state: MachineState,
    pub description: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<machine::Model> for MachineDto {
    fn from(m: machine::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            site: m.site,
            installed_at: m.installed_at,
            state: m.state,
            description: m.description,
            model: m.model,
            manufacturer: m.manufacturer,
            serial_number: m.serial_number,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<MachineDto> for machine::Model {
    fn from(dto: MachineDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            site: dto.site,
            installed_at: dto.installed_at,
            state: dto.state,
            description: dto.description,
            model: dto.model,
            manufacturer: dto.manufacturer,
            serial_number: dto.serial_number,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub site: Option<String>,
    pub state: Option<MachineState>,
    pub name: Option<String>,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub direction: SortDirection,
}

fn default_size() -> u32 {
    10
}

/// Field-shape validation happens here, before the catalog is invoked; the
/// core only re-validates existence.
fn validate(input: &MachineInput) -> Result<(), JsonApiError> {
    let mut invalid = Vec::new();
    if input.name.trim().is_empty() {
        invalid.push("name");
    }
    if input.site.trim().is_empty() {
        invalid.push("site");
    }
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(JsonApiError::invalid_fields(&invalid))
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<MachineDto>>, JsonApiError> {
    let rows = state.catalog.list_all().await?;
    Ok(Json(rows.into_iter().map(MachineDto::from).collect()))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<MachineDto>, JsonApiError> {
    match state.catalog.get(id).await? {
        Some(m) => Ok(Json(m.into())),
        None => Err(JsonApiError::not_found("machine")),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<MachineInput>,
) -> Result<(StatusCode, Json<MachineDto>), JsonApiError> {
    validate(&input)?;
    let created = state.catalog.create(input).await?;
    info!(id = created.id, site = %created.site, "created machine");
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(input): Json<MachineInput>,
) -> Result<Json<MachineDto>, JsonApiError> {
    validate(&input)?;
    match state.catalog.update(id, input).await? {
        Some(m) => Ok(Json(m.into())),
        None => Err(JsonApiError::not_found("machine")),
    }
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, JsonApiError> {
    if state.catalog.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("machine"))
    }
}

pub async fn search(
    State(state): State<ServerState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Page<MachineDto>>, JsonApiError> {
    let filter = MachineFilter { site: q.site, state: q.state, name: q.name };
    let sort = Sort { field: q.sort_by, direction: q.direction };
    let page = PageRequest { page: q.page, size: q.size };
    let result = state.catalog.search(&filter, sort, page).await?;
    Ok(Json(result.map(MachineDto::from)))
}

/// History for a machine. 404 when the machine is unknown locally; otherwise
/// whatever the gateway produced, fallback marker included, as a 200.
pub async fn intervention_history(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match state.catalog.intervention_history(id).await? {
        Some(history) => Ok(Json(history.into_payload())),
        None => Err(JsonApiError::not_found("machine")),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn dto_round_trip_is_identity() {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let entity = machine::Model {
            id: 7,
            name: "Press-7".into(),
            site: "Lyon".into(),
            installed_at: now,
            state: MachineState::BrokenDown,
            description: Some("hydraulic press".into()),
            model: Some("P-700".into()),
            manufacturer: Some("Acme".into()),
            serial_number: Some("SN-0042".into()),
            created_at: now,
            updated_at: now,
        };

        let dto = MachineDto::from(entity.clone());
        let back = machine::Model::from(dto);
        assert_eq!(back, entity);
    }

    #[test]
    fn search_query_defaults() {
        let q: SearchQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page, 0);
        assert_eq!(q.size, 10);
        assert_eq!(q.sort_by, SortField::Id);
        assert_eq!(q.direction, SortDirection::Asc);
        assert!(q.site.is_none() && q.state.is_none() && q.name.is_none());
    }
}
