//! Date-keyed observation lookup

use chrono::NaiveDate;
use shared::{Observation, ObservationKind, ObservationSet};

use crate::error::{AppError, AppResult};
use crate::store::SharedStore;

/// Resolves "the observation of kind K for date D"
#[derive(Clone)]
pub struct ObservationLookup {
    store: SharedStore,
}

impl ObservationLookup {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// First observation of `kind` on `date`; the lowest identifier wins
    pub async fn find(
        &self,
        kind: ObservationKind,
        date: NaiveDate,
    ) -> AppResult<Option<Observation>> {
        self.store.find_observation_by_date(kind, date).await
    }

    /// Resolve one observation of every kind for `date`.
    ///
    /// Fails with every missing kind listed when any lookup comes back empty.
    pub async fn resolve_all(&self, date: NaiveDate) -> AppResult<ObservationSet> {
        let mut found = [None; 4];
        let mut missing = Vec::new();

        for (slot, kind) in found.iter_mut().zip(ObservationKind::ALL) {
            match self.find(kind, date).await? {
                Some(observation) => *slot = Some(observation.id()),
                None => missing.push(kind),
            }
        }

        match found {
            [Some(wind_id), Some(pressure_id), Some(humidity_id), Some(precipitation_id)] => {
                Ok(ObservationSet {
                    wind_id,
                    pressure_id,
                    humidity_id,
                    precipitation_id,
                })
            }
            _ => Err(AppError::IncompleteObservationSet { date, missing }),
        }
    }
}
