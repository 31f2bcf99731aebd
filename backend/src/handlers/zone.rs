//! Geographic zone HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{CreateGeographicZoneInput, GeographicZone, RecordId, UpdateGeographicZoneInput};

use crate::error::AppResult;
use crate::handlers::AppJson;
use crate::services::GeographicZoneService;
use crate::AppState;

pub async fn create_zone(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateGeographicZoneInput>,
) -> AppResult<(StatusCode, Json<GeographicZone>)> {
    let service = GeographicZoneService::new(state.store);
    let zone = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(zone)))
}

pub async fn list_zones(State(state): State<AppState>) -> AppResult<Json<Vec<GeographicZone>>> {
    let service = GeographicZoneService::new(state.store);
    Ok(Json(service.list().await?))
}

pub async fn get_zone(
    State(state): State<AppState>,
    Path(zone_id): Path<RecordId>,
) -> AppResult<Json<GeographicZone>> {
    let service = GeographicZoneService::new(state.store);
    Ok(Json(service.get(zone_id).await?))
}

pub async fn update_zone(
    State(state): State<AppState>,
    Path(zone_id): Path<RecordId>,
    AppJson(input): AppJson<UpdateGeographicZoneInput>,
) -> AppResult<Json<GeographicZone>> {
    let service = GeographicZoneService::new(state.store);
    Ok(Json(service.update(zone_id, input).await?))
}

pub async fn delete_zone(
    State(state): State<AppState>,
    Path(zone_id): Path<RecordId>,
) -> AppResult<StatusCode> {
    let service = GeographicZoneService::new(state.store);
    service.delete(zone_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
