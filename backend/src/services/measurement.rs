//! Weather measurement composition
//!
//! Builds and relinks [`WeatherMeasurement`] composites from the observations
//! recorded for a date. Nothing is written unless all four kinds resolve.

use shared::{
    parse_date_patch, require_date, CreateWeatherMeasurementInput, LinkStatus, ObservationKind,
    RecordId, UpdateWeatherMeasurementInput, WeatherMeasurement,
};

use crate::error::{AppError, AppResult};
use crate::services::lookup::ObservationLookup;
use crate::store::SharedStore;

const RESOURCE: &str = "Weather measurement";

/// Composition resolver for weather measurements
#[derive(Clone)]
pub struct WeatherMeasurementService {
    store: SharedStore,
    lookup: ObservationLookup,
}

impl WeatherMeasurementService {
    /// Create a new WeatherMeasurementService instance
    pub fn new(store: SharedStore) -> Self {
        Self {
            lookup: ObservationLookup::new(store.clone()),
            store,
        }
    }

    /// Compose a new measurement from the observations recorded on `Date`.
    ///
    /// `GeographicZone_ID` is stored as given without checking that the zone
    /// exists. Concurrent calls for the same date may each create a composite.
    pub async fn create(
        &self,
        input: CreateWeatherMeasurementInput,
    ) -> AppResult<WeatherMeasurement> {
        let date = require_date("Date", input.date.as_deref())?;

        let set = match self.lookup.resolve_all(date).await {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(%date, "Refusing to compose weather measurement: {}", e);
                return Err(e);
            }
        };

        let measurement = self
            .store
            .insert_measurement(WeatherMeasurement {
                id: 0,
                wind_id: set.wind_id,
                pressure_id: set.pressure_id,
                humidity_id: set.humidity_id,
                precipitation_id: set.precipitation_id,
                geographic_zone_id: input.geographic_zone_id,
                date,
                max_temperature_2m: input.max_temperature_2m,
                min_temperature_2m: input.min_temperature_2m,
                cloud_amount: input.cloud_amount,
            })
            .await?;

        tracing::info!(
            measurement_id = measurement.id,
            %date,
            wind_id = set.wind_id,
            pressure_id = set.pressure_id,
            humidity_id = set.humidity_id,
            precipitation_id = set.precipitation_id,
            "Weather measurement composed"
        );

        Ok(measurement)
    }

    /// Apply a partial update.
    ///
    /// A present `Date` re-resolves and replaces all four observation links
    /// together; if any kind is missing for the new date nothing changes.
    /// Without `Date` the links and date are left as they are. Concurrent
    /// updates of one measurement are last-writer-wins over the whole row.
    pub async fn update(
        &self,
        measurement_id: RecordId,
        input: UpdateWeatherMeasurementInput,
    ) -> AppResult<WeatherMeasurement> {
        let mut measurement = self.get(measurement_id).await?;

        let new_date = parse_date_patch("Date", input.date.as_ref().map(|d| d.as_deref()))?;
        if let Some(date) = new_date {
            let set = match self.lookup.resolve_all(date).await {
                Ok(set) => set,
                Err(e) => {
                    tracing::warn!(
                        measurement_id,
                        %date,
                        "Refusing to relink weather measurement: {}",
                        e
                    );
                    return Err(e);
                }
            };
            measurement.relink(date, set);
        }

        input.apply_direct_fields(&mut measurement);

        let updated = self
            .store
            .update_measurement(measurement)
            .await?
            .ok_or_else(|| AppError::not_found(RESOURCE))?;

        tracing::info!(
            measurement_id,
            date = %updated.date,
            relinked = new_date.is_some(),
            "Weather measurement updated"
        );

        Ok(updated)
    }

    /// Get a measurement by ID
    pub async fn get(&self, measurement_id: RecordId) -> AppResult<WeatherMeasurement> {
        self.store
            .get_measurement(measurement_id)
            .await?
            .ok_or_else(|| AppError::not_found(RESOURCE))
    }

    /// List every measurement
    pub async fn list(&self) -> AppResult<Vec<WeatherMeasurement>> {
        self.store.list_measurements().await
    }

    /// Delete a measurement; vegetation records pointing at it are left alone
    pub async fn delete(&self, measurement_id: RecordId) -> AppResult<()> {
        if !self.store.delete_measurement(measurement_id).await? {
            return Err(AppError::not_found(RESOURCE));
        }

        tracing::info!(measurement_id, "Weather measurement deleted");
        Ok(())
    }

    /// Report whether each stored reference still resolves
    pub async fn links(&self, measurement_id: RecordId) -> AppResult<Vec<LinkStatus>> {
        let measurement = self.get(measurement_id).await?;
        let set = measurement.observations();

        let mut links = Vec::with_capacity(5);
        for kind in ObservationKind::ALL {
            let id = set.id_for(kind);
            let present = self.store.get_observation(kind, id).await?.is_some();
            links.push(LinkStatus {
                field: kind.id_field().to_string(),
                id: Some(id),
                present,
            });
        }

        let zone_present = match measurement.geographic_zone_id {
            Some(zone_id) => self.store.get_zone(zone_id).await?.is_some(),
            None => false,
        };
        links.push(LinkStatus {
            field: "GeographicZone_ID".to_string(),
            id: measurement.geographic_zone_id,
            present: zone_present,
        });

        Ok(links)
    }
}
