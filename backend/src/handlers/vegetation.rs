//! Vegetation HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{CreateVegetationInput, RecordId, UpdateVegetationInput, Vegetation};

use crate::error::AppResult;
use crate::handlers::AppJson;
use crate::services::VegetationService;
use crate::AppState;

pub async fn create_vegetation(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateVegetationInput>,
) -> AppResult<(StatusCode, Json<Vegetation>)> {
    let service = VegetationService::new(state.store);
    let vegetation = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(vegetation)))
}

pub async fn list_vegetation(State(state): State<AppState>) -> AppResult<Json<Vec<Vegetation>>> {
    let service = VegetationService::new(state.store);
    Ok(Json(service.list().await?))
}

pub async fn get_vegetation(
    State(state): State<AppState>,
    Path(vegetation_id): Path<RecordId>,
) -> AppResult<Json<Vegetation>> {
    let service = VegetationService::new(state.store);
    Ok(Json(service.get(vegetation_id).await?))
}

pub async fn update_vegetation(
    State(state): State<AppState>,
    Path(vegetation_id): Path<RecordId>,
    AppJson(input): AppJson<UpdateVegetationInput>,
) -> AppResult<Json<Vegetation>> {
    let service = VegetationService::new(state.store);
    Ok(Json(service.update(vegetation_id, input).await?))
}

pub async fn delete_vegetation(
    State(state): State<AppState>,
    Path(vegetation_id): Path<RecordId>,
) -> AppResult<StatusCode> {
    let service = VegetationService::new(state.store);
    service.delete(vegetation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
