//! In-process record store

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{
    GeographicZone, Observation, ObservationKind, RecordId, Vegetation, WeatherMeasurement,
};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::store::MeteoStore;

/// Ordered table with a monotonically increasing identifier sequence
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<RecordId, T>,
    next_id: RecordId,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn allocate(&mut self) -> RecordId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn replace(&mut self, id: RecordId, record: T) -> Option<T> {
        let slot = self.rows.get_mut(&id)?;
        *slot = record.clone();
        Some(record)
    }
}

#[derive(Debug)]
struct Tables {
    wind: Table<Observation>,
    pressure: Table<Observation>,
    humidity: Table<Observation>,
    precipitation: Table<Observation>,
    zones: Table<GeographicZone>,
    measurements: Table<WeatherMeasurement>,
    vegetation: Table<Vegetation>,
}

impl Tables {
    fn observations(&self, kind: ObservationKind) -> &Table<Observation> {
        match kind {
            ObservationKind::Wind => &self.wind,
            ObservationKind::Pressure => &self.pressure,
            ObservationKind::Humidity => &self.humidity,
            ObservationKind::Precipitation => &self.precipitation,
        }
    }

    fn observations_mut(&mut self, kind: ObservationKind) -> &mut Table<Observation> {
        match kind {
            ObservationKind::Wind => &mut self.wind,
            ObservationKind::Pressure => &mut self.pressure,
            ObservationKind::Humidity => &mut self.humidity,
            ObservationKind::Precipitation => &mut self.precipitation,
        }
    }
}

/// Record store held entirely in memory
///
/// Every operation takes the table lock for its own duration only, so like
/// the database store it offers no isolation across a service's separate
/// reads and writes.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                wind: Table::new(),
                pressure: Table::new(),
                humidity: Table::new(),
                precipitation: Table::new(),
                zones: Table::new(),
                measurements: Table::new(),
                vegetation: Table::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MeteoStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn insert_observation(&self, mut record: Observation) -> AppResult<Observation> {
        let mut tables = self.tables.write().await;
        let table = tables.observations_mut(record.kind());
        let id = table.allocate();
        record.set_id(id);
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn get_observation(
        &self,
        kind: ObservationKind,
        id: RecordId,
    ) -> AppResult<Option<Observation>> {
        let tables = self.tables.read().await;
        Ok(tables.observations(kind).rows.get(&id).cloned())
    }

    async fn list_observations(&self, kind: ObservationKind) -> AppResult<Vec<Observation>> {
        let tables = self.tables.read().await;
        Ok(tables.observations(kind).all())
    }

    async fn update_observation(&self, record: Observation) -> AppResult<Option<Observation>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .observations_mut(record.kind())
            .replace(record.id(), record))
    }

    async fn delete_observation(&self, kind: ObservationKind, id: RecordId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.observations_mut(kind).rows.remove(&id).is_some())
    }

    async fn find_observation_by_date(
        &self,
        kind: ObservationKind,
        date: NaiveDate,
    ) -> AppResult<Option<Observation>> {
        let tables = self.tables.read().await;
        // BTreeMap iterates in ascending identifier order
        Ok(tables
            .observations(kind)
            .rows
            .values()
            .find(|record| record.date() == date)
            .cloned())
    }

    async fn insert_zone(&self, mut record: GeographicZone) -> AppResult<GeographicZone> {
        let mut tables = self.tables.write().await;
        record.id = tables.zones.allocate();
        tables.zones.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_zone(&self, id: RecordId) -> AppResult<Option<GeographicZone>> {
        Ok(self.tables.read().await.zones.rows.get(&id).cloned())
    }

    async fn list_zones(&self) -> AppResult<Vec<GeographicZone>> {
        Ok(self.tables.read().await.zones.all())
    }

    async fn update_zone(&self, record: GeographicZone) -> AppResult<Option<GeographicZone>> {
        let mut tables = self.tables.write().await;
        Ok(tables.zones.replace(record.id, record))
    }

    async fn delete_zone(&self, id: RecordId) -> AppResult<bool> {
        Ok(self.tables.write().await.zones.rows.remove(&id).is_some())
    }

    async fn insert_measurement(
        &self,
        mut record: WeatherMeasurement,
    ) -> AppResult<WeatherMeasurement> {
        let mut tables = self.tables.write().await;
        record.id = tables.measurements.allocate();
        tables.measurements.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_measurement(&self, id: RecordId) -> AppResult<Option<WeatherMeasurement>> {
        Ok(self.tables.read().await.measurements.rows.get(&id).cloned())
    }

    async fn list_measurements(&self) -> AppResult<Vec<WeatherMeasurement>> {
        Ok(self.tables.read().await.measurements.all())
    }

    async fn update_measurement(
        &self,
        record: WeatherMeasurement,
    ) -> AppResult<Option<WeatherMeasurement>> {
        let mut tables = self.tables.write().await;
        Ok(tables.measurements.replace(record.id, record))
    }

    async fn delete_measurement(&self, id: RecordId) -> AppResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .measurements
            .rows
            .remove(&id)
            .is_some())
    }

    async fn insert_vegetation(&self, record: Vegetation) -> AppResult<Vegetation> {
        let mut tables = self.tables.write().await;
        if tables.vegetation.rows.contains_key(&record.id) {
            return Err(AppError::DuplicateEntry("Vegetation_ID".to_string()));
        }
        tables.vegetation.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_vegetation(&self, id: RecordId) -> AppResult<Option<Vegetation>> {
        Ok(self.tables.read().await.vegetation.rows.get(&id).cloned())
    }

    async fn list_vegetation(&self) -> AppResult<Vec<Vegetation>> {
        Ok(self.tables.read().await.vegetation.all())
    }

    async fn update_vegetation(&self, record: Vegetation) -> AppResult<Option<Vegetation>> {
        let mut tables = self.tables.write().await;
        Ok(tables.vegetation.replace(record.id, record))
    }

    async fn delete_vegetation(&self, id: RecordId) -> AppResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .vegetation
            .rows
            .remove(&id)
            .is_some())
    }
}
