//! HTTP handlers shared by the wind, pressure, humidity and precipitation
//! collections
//!
//! Each handler is generic over the payload type of one kind; the kind itself
//! comes from the payload type's `KIND`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use shared::{Observation, ObservationDraft, ObservationPatch, RecordId};

use crate::error::AppResult;
use crate::handlers::AppJson;
use crate::services::ObservationService;
use crate::AppState;

/// Record an observation
pub async fn create_observation<D>(
    State(state): State<AppState>,
    AppJson(input): AppJson<D>,
) -> AppResult<(StatusCode, Json<Observation>)>
where
    D: ObservationDraft + DeserializeOwned,
{
    let service = ObservationService::new(state.store);
    let observation = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(observation)))
}

/// List every observation of one kind
pub async fn list_observations<D: ObservationDraft>(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Observation>>> {
    let service = ObservationService::new(state.store);
    let observations = service.list(D::KIND).await?;
    Ok(Json(observations))
}

/// Get an observation by ID
pub async fn get_observation<D: ObservationDraft>(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<Json<Observation>> {
    let service = ObservationService::new(state.store);
    let observation = service.get(D::KIND, id).await?;
    Ok(Json(observation))
}

/// Partially update an observation
pub async fn update_observation<P>(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    AppJson(input): AppJson<P>,
) -> AppResult<Json<Observation>>
where
    P: ObservationPatch + DeserializeOwned,
{
    let service = ObservationService::new(state.store);
    let observation = service.update(id, input).await?;
    Ok(Json(observation))
}

/// Delete an observation
pub async fn delete_observation<D: ObservationDraft>(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<StatusCode> {
    let service = ObservationService::new(state.store);
    service.delete(D::KIND, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
