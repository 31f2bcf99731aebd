//! Geographic zone service

use shared::{
    require_max_len, require_text, CreateGeographicZoneInput, GeographicZone, RecordId,
    UpdateGeographicZoneInput, MAX_TEXT_LEN,
};

use crate::error::{AppError, AppResult};
use crate::store::SharedStore;

const RESOURCE: &str = "GeographicZone";

#[derive(Clone)]
pub struct GeographicZoneService {
    store: SharedStore,
}

impl GeographicZoneService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: CreateGeographicZoneInput) -> AppResult<GeographicZone> {
        let zone_name = require_text("Zone_Name", input.zone_name.as_deref())?.to_string();
        require_max_len("Zone_Name", Some(zone_name.as_str()), MAX_TEXT_LEN)?;

        let zone = self
            .store
            .insert_zone(GeographicZone {
                id: 0,
                zone_name,
                longitude: input.longitude,
                altitude: input.altitude,
                latitude: input.latitude,
            })
            .await?;

        tracing::info!(zone_id = zone.id, zone_name = %zone.zone_name, "Geographic zone created");
        Ok(zone)
    }

    pub async fn update(
        &self,
        zone_id: RecordId,
        mut input: UpdateGeographicZoneInput,
    ) -> AppResult<GeographicZone> {
        let mut zone = self.get(zone_id).await?;

        if let Some(name) = input.zone_name.take() {
            require_text("Zone_Name", Some(name.as_str()))?;
            require_max_len("Zone_Name", Some(name.as_str()), MAX_TEXT_LEN)?;
            zone.zone_name = name;
        }
        input.apply_coordinates(&mut zone);

        self.store
            .update_zone(zone)
            .await?
            .ok_or_else(|| AppError::not_found(RESOURCE))
    }

    pub async fn get(&self, zone_id: RecordId) -> AppResult<GeographicZone> {
        self.store
            .get_zone(zone_id)
            .await?
            .ok_or_else(|| AppError::not_found(RESOURCE))
    }

    pub async fn list(&self) -> AppResult<Vec<GeographicZone>> {
        self.store.list_zones().await
    }

    /// Delete a zone; measurements and vegetation keep their zone identifier
    pub async fn delete(&self, zone_id: RecordId) -> AppResult<()> {
        if !self.store.delete_zone(zone_id).await? {
            return Err(AppError::not_found(RESOURCE));
        }

        tracing::info!(zone_id, "Geographic zone deleted");
        Ok(())
    }
}
