//! Route definitions for the meteorological observation service

use axum::{
    routing::{get, put},
    Router,
};
use serde::de::DeserializeOwned;
use shared::{
    CreateHumidityInput, CreatePrecipitationInput, CreatePressureInput, CreateWindInput,
    ObservationDraft, ObservationPatch, UpdateHumidityInput, UpdatePrecipitationInput,
    UpdatePressureInput, UpdateWindInput,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Observation collections
        .nest("/wind", observation_routes::<CreateWindInput, UpdateWindInput>())
        .nest(
            "/pressure",
            observation_routes::<CreatePressureInput, UpdatePressureInput>(),
        )
        .nest(
            "/humidity",
            observation_routes::<CreateHumidityInput, UpdateHumidityInput>(),
        )
        .nest(
            "/precipitation",
            observation_routes::<CreatePrecipitationInput, UpdatePrecipitationInput>(),
        )
        .nest("/geographiczone", zone_routes())
        .nest("/weathermeasurement", measurement_routes())
        // Older clients update measurements through this path
        .route(
            "/update_weathermeasurement/:measurement_id",
            put(handlers::update_measurement),
        )
        .nest("/vegetation", vegetation_routes())
}

/// CRUD routes for one observation kind
fn observation_routes<D, P>() -> Router<AppState>
where
    D: ObservationDraft + DeserializeOwned + 'static,
    P: ObservationPatch + DeserializeOwned + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::list_observations::<D>).post(handlers::create_observation::<D>),
        )
        .route(
            "/:id",
            get(handlers::get_observation::<D>)
                .put(handlers::update_observation::<P>)
                .delete(handlers::delete_observation::<D>),
        )
}

/// Geographic zone routes
fn zone_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_zones).post(handlers::create_zone))
        .route(
            "/:zone_id",
            get(handlers::get_zone)
                .put(handlers::update_zone)
                .delete(handlers::delete_zone),
        )
}

/// Weather measurement routes
fn measurement_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_measurements).post(handlers::create_measurement),
        )
        .route(
            "/:measurement_id",
            get(handlers::get_measurement)
                .put(handlers::update_measurement)
                .delete(handlers::delete_measurement),
        )
        .route(
            "/:measurement_id/links",
            get(handlers::get_measurement_links),
        )
}

/// Vegetation routes
fn vegetation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_vegetation).post(handlers::create_vegetation),
        )
        .route(
            "/:vegetation_id",
            get(handlers::get_vegetation)
                .put(handlers::update_vegetation)
                .delete(handlers::delete_vegetation),
        )
}
