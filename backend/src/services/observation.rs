//! Observation service for the four dated observation kinds

use shared::{
    parse_date_patch, require_date, Observation, ObservationDraft, ObservationKind,
    ObservationPatch, RecordId,
};

use crate::error::{AppError, AppResult};
use crate::store::SharedStore;

/// Observation service shared by every observation kind
#[derive(Clone)]
pub struct ObservationService {
    store: SharedStore,
}

impl ObservationService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Record a new observation; `Date` is required
    pub async fn create<D: ObservationDraft>(&self, input: D) -> AppResult<Observation> {
        let date = require_date("Date", input.raw_date())?;
        input.validate()?;
        let observation = self.store.insert_observation(input.into_observation(date)).await?;

        tracing::info!(
            kind = %D::KIND,
            id = observation.id(),
            %date,
            "Observation recorded"
        );

        Ok(observation)
    }

    /// Partial update. Weather measurements already linked to this
    /// observation are not revisited when its date changes.
    pub async fn update<P: ObservationPatch>(
        &self,
        id: RecordId,
        input: P,
    ) -> AppResult<Observation> {
        input.validate()?;
        let mut observation = self.get(P::KIND, id).await?;

        if let Some(date) = parse_date_patch("Date", input.raw_date())? {
            observation.set_date(date);
        }
        input.apply_fields(&mut observation);

        self.store
            .update_observation(observation)
            .await?
            .ok_or_else(|| AppError::not_found(P::KIND))
    }

    pub async fn get(&self, kind: ObservationKind, id: RecordId) -> AppResult<Observation> {
        self.store
            .get_observation(kind, id)
            .await?
            .ok_or_else(|| AppError::not_found(kind))
    }

    pub async fn list(&self, kind: ObservationKind) -> AppResult<Vec<Observation>> {
        self.store.list_observations(kind).await
    }

    /// Delete without checking composites that reference the observation
    pub async fn delete(&self, kind: ObservationKind, id: RecordId) -> AppResult<()> {
        if !self.store.delete_observation(kind, id).await? {
            return Err(AppError::not_found(kind));
        }

        tracing::info!(%kind, id, "Observation deleted");
        Ok(())
    }
}
