//! Vegetation service

use shared::{
    require_max_len, validate_vegetation_input, CreateVegetationInput, RecordId,
    UpdateVegetationInput, Vegetation, MAX_TEXT_LEN,
};

use crate::error::{AppError, AppResult};
use crate::store::SharedStore;

const RESOURCE: &str = "Vegetation";

/// Vegetation service for managing vegetation records
#[derive(Clone)]
pub struct VegetationService {
    store: SharedStore,
}

impl VegetationService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Validate and store a vegetation record verbatim
    pub async fn create(&self, input: CreateVegetationInput) -> AppResult<Vegetation> {
        let vegetation = validate_vegetation_input(&input)?;
        let vegetation = self.store.insert_vegetation(vegetation).await?;

        tracing::info!(
            vegetation_id = vegetation.id,
            measurement_id = vegetation.climate_measurement_id,
            "Vegetation recorded"
        );

        Ok(vegetation)
    }

    /// Overwrite the fields present in the payload
    pub async fn update(
        &self,
        vegetation_id: RecordId,
        input: UpdateVegetationInput,
    ) -> AppResult<Vegetation> {
        require_max_len(
            "Vegetation_Type",
            input.vegetation_type.as_ref().and_then(|t| t.as_deref()),
            MAX_TEXT_LEN,
        )?;

        let mut vegetation = self.get(vegetation_id).await?;
        input.apply(&mut vegetation);

        self.store
            .update_vegetation(vegetation)
            .await?
            .ok_or_else(|| AppError::not_found(RESOURCE))
    }

    pub async fn get(&self, vegetation_id: RecordId) -> AppResult<Vegetation> {
        self.store
            .get_vegetation(vegetation_id)
            .await?
            .ok_or_else(|| AppError::not_found(RESOURCE))
    }

    pub async fn list(&self) -> AppResult<Vec<Vegetation>> {
        self.store.list_vegetation().await
    }

    pub async fn delete(&self, vegetation_id: RecordId) -> AppResult<()> {
        if !self.store.delete_vegetation(vegetation_id).await? {
            return Err(AppError::not_found(RESOURCE));
        }

        tracing::info!(vegetation_id, "Vegetation deleted");
        Ok(())
    }
}
