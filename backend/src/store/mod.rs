//! Keyed record storage
//!
//! Services never hold an ambient connection; they receive a [`MeteoStore`]
//! handle and perform point lookups, date lookups, inserts, updates and
//! deletes through it. Two implementations exist: PostgreSQL for deployments
//! and an in-process store for tests and local runs.

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{
    GeographicZone, Observation, ObservationKind, RecordId, Vegetation, WeatherMeasurement,
};

use crate::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Keyed record store consumed by the services
///
/// Inserts ignore the identifier on the incoming record and return the stored
/// record with its assigned identifier, except for vegetation whose
/// identifier is supplied by the caller. Updates replace the whole record and
/// return `None` when the identifier does not resolve. Deletes report whether
/// a record was removed and never touch other collections.
///
/// Services read a record, change it and write the whole record back without
/// a transaction. Two concurrent updates of the same record can therefore
/// lose one of the writes: a `Cloud_Amount` patch racing a `Date` patch may
/// write the old links back over the relink. Only the single write itself is
/// atomic, so the four links and the date always change together.
#[async_trait]
pub trait MeteoStore: Send + Sync {
    /// Liveness check for health reporting
    async fn ping(&self) -> AppResult<()>;

    // Observations
    async fn insert_observation(&self, record: Observation) -> AppResult<Observation>;
    async fn get_observation(
        &self,
        kind: ObservationKind,
        id: RecordId,
    ) -> AppResult<Option<Observation>>;
    async fn list_observations(&self, kind: ObservationKind) -> AppResult<Vec<Observation>>;
    async fn update_observation(&self, record: Observation) -> AppResult<Option<Observation>>;
    async fn delete_observation(&self, kind: ObservationKind, id: RecordId) -> AppResult<bool>;

    /// First observation of `kind` dated `date`, lowest identifier first
    async fn find_observation_by_date(
        &self,
        kind: ObservationKind,
        date: NaiveDate,
    ) -> AppResult<Option<Observation>>;

    // Geographic zones
    async fn insert_zone(&self, record: GeographicZone) -> AppResult<GeographicZone>;
    async fn get_zone(&self, id: RecordId) -> AppResult<Option<GeographicZone>>;
    async fn list_zones(&self) -> AppResult<Vec<GeographicZone>>;
    async fn update_zone(&self, record: GeographicZone) -> AppResult<Option<GeographicZone>>;
    async fn delete_zone(&self, id: RecordId) -> AppResult<bool>;

    // Weather measurements
    async fn insert_measurement(
        &self,
        record: WeatherMeasurement,
    ) -> AppResult<WeatherMeasurement>;
    async fn get_measurement(&self, id: RecordId) -> AppResult<Option<WeatherMeasurement>>;
    async fn list_measurements(&self) -> AppResult<Vec<WeatherMeasurement>>;
    async fn update_measurement(
        &self,
        record: WeatherMeasurement,
    ) -> AppResult<Option<WeatherMeasurement>>;
    async fn delete_measurement(&self, id: RecordId) -> AppResult<bool>;

    // Vegetation
    async fn insert_vegetation(&self, record: Vegetation) -> AppResult<Vegetation>;
    async fn get_vegetation(&self, id: RecordId) -> AppResult<Option<Vegetation>>;
    async fn list_vegetation(&self) -> AppResult<Vec<Vegetation>>;
    async fn update_vegetation(&self, record: Vegetation) -> AppResult<Option<Vegetation>>;
    async fn delete_vegetation(&self, id: RecordId) -> AppResult<bool>;
}

/// Store handle shared by the application state and every service
pub type SharedStore = std::sync::Arc<dyn MeteoStore>;
