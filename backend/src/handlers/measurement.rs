//! HTTP handlers for weather measurement composition

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use shared::{
    CreateWeatherMeasurementInput, LinkStatus, RecordId, UpdateWeatherMeasurementInput,
    WeatherMeasurement,
};

use crate::error::AppResult;
use crate::handlers::AppJson;
use crate::services::WeatherMeasurementService;
use crate::AppState;

/// Response for a newly composed measurement
#[derive(Debug, Serialize)]
pub struct MeasurementCreated {
    pub message: String,
    pub id: RecordId,
}

/// Compose a weather measurement for a date
pub async fn create_measurement(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateWeatherMeasurementInput>,
) -> AppResult<(StatusCode, Json<MeasurementCreated>)> {
    let service = WeatherMeasurementService::new(state.store);
    let measurement = service.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(MeasurementCreated {
            message: "Weather measurement added successfully".to_string(),
            id: measurement.id,
        }),
    ))
}

/// List weather measurements
pub async fn list_measurements(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<WeatherMeasurement>>> {
    let service = WeatherMeasurementService::new(state.store);
    Ok(Json(service.list().await?))
}

/// Get a weather measurement by ID
pub async fn get_measurement(
    State(state): State<AppState>,
    Path(measurement_id): Path<RecordId>,
) -> AppResult<Json<WeatherMeasurement>> {
    let service = WeatherMeasurementService::new(state.store);
    Ok(Json(service.get(measurement_id).await?))
}

/// Partially update a weather measurement, relinking it when `Date` changes
pub async fn update_measurement(
    State(state): State<AppState>,
    Path(measurement_id): Path<RecordId>,
    AppJson(input): AppJson<UpdateWeatherMeasurementInput>,
) -> AppResult<Json<WeatherMeasurement>> {
    let service = WeatherMeasurementService::new(state.store);
    Ok(Json(service.update(measurement_id, input).await?))
}

/// Delete a weather measurement
pub async fn delete_measurement(
    State(state): State<AppState>,
    Path(measurement_id): Path<RecordId>,
) -> AppResult<StatusCode> {
    let service = WeatherMeasurementService::new(state.store);
    service.delete(measurement_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Show which of a measurement's references still resolve
pub async fn get_measurement_links(
    State(state): State<AppState>,
    Path(measurement_id): Path<RecordId>,
) -> AppResult<Json<Vec<LinkStatus>>> {
    let service = WeatherMeasurementService::new(state.store);
    Ok(Json(service.links(measurement_id).await?))
}
