//! PostgreSQL record store

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{
    GeographicZone, Humidity, Observation, ObservationKind, Precipitation, Pressure, RecordId,
    Vegetation, WeatherMeasurement, Wind,
};
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, FromRow, PgPool};

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};
use crate::store::MeteoStore;

/// Record store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct WindRow {
    id: i64,
    wind_speed: Option<Decimal>,
    wind_direction: Option<Decimal>,
    date: NaiveDate,
}

impl From<WindRow> for Observation {
    fn from(row: WindRow) -> Self {
        Observation::Wind(Wind {
            id: row.id,
            wind_speed: row.wind_speed,
            wind_direction: row.wind_direction,
            date: row.date,
        })
    }
}

#[derive(Debug, FromRow)]
struct PressureRow {
    id: i64,
    pressure_value: Option<Decimal>,
    date: NaiveDate,
}

impl From<PressureRow> for Observation {
    fn from(row: PressureRow) -> Self {
        Observation::Pressure(Pressure {
            id: row.id,
            pressure_value: row.pressure_value,
            date: row.date,
        })
    }
}

#[derive(Debug, FromRow)]
struct HumidityRow {
    id: i64,
    surface_soil_wetness: Option<Decimal>,
    root_zone_soil_wetness: Option<Decimal>,
    profile_soil_moisture: Option<Decimal>,
    date: NaiveDate,
}

impl From<HumidityRow> for Observation {
    fn from(row: HumidityRow) -> Self {
        Observation::Humidity(Humidity {
            id: row.id,
            surface_soil_wetness: row.surface_soil_wetness,
            root_zone_soil_wetness: row.root_zone_soil_wetness,
            profile_soil_moisture: row.profile_soil_moisture,
            date: row.date,
        })
    }
}

#[derive(Debug, FromRow)]
struct PrecipitationRow {
    id: i64,
    precipitation_type: Option<String>,
    precipitation_amount: Option<Decimal>,
    date: NaiveDate,
}

impl From<PrecipitationRow> for Observation {
    fn from(row: PrecipitationRow) -> Self {
        Observation::Precipitation(Precipitation {
            id: row.id,
            precipitation_type: row.precipitation_type,
            precipitation_amount: row.precipitation_amount,
            date: row.date,
        })
    }
}

#[derive(Debug, FromRow)]
struct ZoneRow {
    id: i64,
    zone_name: String,
    longitude: Option<Decimal>,
    altitude: Option<Decimal>,
    latitude: Option<Decimal>,
}

impl From<ZoneRow> for GeographicZone {
    fn from(row: ZoneRow) -> Self {
        GeographicZone {
            id: row.id,
            zone_name: row.zone_name,
            longitude: row.longitude,
            altitude: row.altitude,
            latitude: row.latitude,
        }
    }
}

#[derive(Debug, FromRow)]
struct MeasurementRow {
    id: i64,
    wind_id: i64,
    pressure_id: i64,
    humidity_id: i64,
    precipitation_id: i64,
    geographic_zone_id: Option<i64>,
    date: NaiveDate,
    max_temperature_2m: Option<Decimal>,
    min_temperature_2m: Option<Decimal>,
    cloud_amount: Option<Decimal>,
}

impl From<MeasurementRow> for WeatherMeasurement {
    fn from(row: MeasurementRow) -> Self {
        WeatherMeasurement {
            id: row.id,
            wind_id: row.wind_id,
            pressure_id: row.pressure_id,
            humidity_id: row.humidity_id,
            precipitation_id: row.precipitation_id,
            geographic_zone_id: row.geographic_zone_id,
            date: row.date,
            max_temperature_2m: row.max_temperature_2m,
            min_temperature_2m: row.min_temperature_2m,
            cloud_amount: row.cloud_amount,
        }
    }
}

#[derive(Debug, FromRow)]
struct VegetationRow {
    id: i64,
    climate_measurement_id: i64,
    wind_id: i64,
    pressure_id: i64,
    geographic_zone_id: i64,
    vegetation_type: Option<String>,
}

impl From<VegetationRow> for Vegetation {
    fn from(row: VegetationRow) -> Self {
        Vegetation {
            id: row.id,
            climate_measurement_id: row.climate_measurement_id,
            wind_id: row.wind_id,
            pressure_id: row.pressure_id,
            geographic_zone_id: row.geographic_zone_id,
            vegetation_type: row.vegetation_type,
        }
    }
}

const ZONE_COLUMNS: &str = "id, zone_name, longitude, altitude, latitude";

const MEASUREMENT_COLUMNS: &str = "id, wind_id, pressure_id, humidity_id, precipitation_id, \
     geographic_zone_id, date, max_temperature_2m, min_temperature_2m, cloud_amount";

const VEGETATION_COLUMNS: &str =
    "id, climate_measurement_id, wind_id, pressure_id, geographic_zone_id, vegetation_type";

fn observation_columns(kind: ObservationKind) -> &'static str {
    match kind {
        ObservationKind::Wind => "id, wind_speed, wind_direction, date",
        ObservationKind::Pressure => "id, pressure_value, date",
        ObservationKind::Humidity => {
            "id, surface_soil_wetness, root_zone_soil_wetness, profile_soil_moisture, date"
        }
        ObservationKind::Precipitation => "id, precipitation_type, precipitation_amount, date",
    }
}

/// Single-row observation filter
#[derive(Debug, Clone, Copy)]
enum Filter {
    Id(RecordId),
    Date(NaiveDate),
}

impl Filter {
    fn clause(&self) -> &'static str {
        match self {
            Filter::Id(_) => "id = $1",
            Filter::Date(_) => "date = $1",
        }
    }
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Open a connection pool from configuration
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        if config.url.is_empty() {
            return Err(AppError::Configuration(
                "database.url must be set for the postgres backend".to_string(),
            ));
        }

        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.url)
            .await?;

        Ok(Self::new(db))
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))
    }

    async fn fetch_observation<R>(
        &self,
        sql: &str,
        filter: Filter,
    ) -> AppResult<Option<Observation>>
    where
        R: for<'r> FromRow<'r, PgRow> + Send + Unpin + Into<Observation>,
    {
        let query = sqlx::query_as::<_, R>(sql);
        let query = match filter {
            Filter::Id(id) => query.bind(id),
            Filter::Date(date) => query.bind(date),
        };

        Ok(query.fetch_optional(&self.db).await?.map(Into::into))
    }

    async fn fetch_observations<R>(&self, sql: &str) -> AppResult<Vec<Observation>>
    where
        R: for<'r> FromRow<'r, PgRow> + Send + Unpin + Into<Observation>,
    {
        let rows = sqlx::query_as::<_, R>(sql).fetch_all(&self.db).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn select_observation(
        &self,
        kind: ObservationKind,
        filter: Filter,
    ) -> AppResult<Option<Observation>> {
        // The id ordering is the tie-break when several rows share a date
        let sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY id ASC LIMIT 1",
            observation_columns(kind),
            kind.table(),
            filter.clause(),
        );

        match kind {
            ObservationKind::Wind => self.fetch_observation::<WindRow>(&sql, filter).await,
            ObservationKind::Pressure => self.fetch_observation::<PressureRow>(&sql, filter).await,
            ObservationKind::Humidity => self.fetch_observation::<HumidityRow>(&sql, filter).await,
            ObservationKind::Precipitation => {
                self.fetch_observation::<PrecipitationRow>(&sql, filter).await
            }
        }
    }

    /// Insert or update an observation row, returning the stored record
    async fn write_observation(
        &self,
        record: &Observation,
        insert: bool,
    ) -> AppResult<Option<Observation>> {
        let kind = record.kind();
        let columns = observation_columns(kind);

        let stored = match record {
            Observation::Wind(wind) => {
                let sql = if insert {
                    format!(
                        "INSERT INTO wind (wind_speed, wind_direction, date) \
                         VALUES ($1, $2, $3) RETURNING {}",
                        columns
                    )
                } else {
                    format!(
                        "UPDATE wind SET wind_speed = $1, wind_direction = $2, date = $3 \
                         WHERE id = $4 RETURNING {}",
                        columns
                    )
                };
                let query = sqlx::query_as::<_, WindRow>(&sql)
                    .bind(wind.wind_speed)
                    .bind(wind.wind_direction)
                    .bind(wind.date);
                let query = if insert { query } else { query.bind(wind.id) };
                query
                    .fetch_optional(&self.db)
                    .await?
                    .map(Observation::from)
            }
            Observation::Pressure(pressure) => {
                let sql = if insert {
                    format!(
                        "INSERT INTO pressure (pressure_value, date) \
                         VALUES ($1, $2) RETURNING {}",
                        columns
                    )
                } else {
                    format!(
                        "UPDATE pressure SET pressure_value = $1, date = $2 \
                         WHERE id = $3 RETURNING {}",
                        columns
                    )
                };
                let query = sqlx::query_as::<_, PressureRow>(&sql)
                    .bind(pressure.pressure_value)
                    .bind(pressure.date);
                let query = if insert { query } else { query.bind(pressure.id) };
                query
                    .fetch_optional(&self.db)
                    .await?
                    .map(Observation::from)
            }
            Observation::Humidity(humidity) => {
                let sql = if insert {
                    format!(
                        "INSERT INTO humidity (surface_soil_wetness, root_zone_soil_wetness, \
                         profile_soil_moisture, date) VALUES ($1, $2, $3, $4) RETURNING {}",
                        columns
                    )
                } else {
                    format!(
                        "UPDATE humidity SET surface_soil_wetness = $1, \
                         root_zone_soil_wetness = $2, profile_soil_moisture = $3, date = $4 \
                         WHERE id = $5 RETURNING {}",
                        columns
                    )
                };
                let query = sqlx::query_as::<_, HumidityRow>(&sql)
                    .bind(humidity.surface_soil_wetness)
                    .bind(humidity.root_zone_soil_wetness)
                    .bind(humidity.profile_soil_moisture)
                    .bind(humidity.date);
                let query = if insert { query } else { query.bind(humidity.id) };
                query
                    .fetch_optional(&self.db)
                    .await?
                    .map(Observation::from)
            }
            Observation::Precipitation(precipitation) => {
                let sql = if insert {
                    format!(
                        "INSERT INTO precipitation (precipitation_type, precipitation_amount, \
                         date) VALUES ($1, $2, $3) RETURNING {}",
                        columns
                    )
                } else {
                    format!(
                        "UPDATE precipitation SET precipitation_type = $1, \
                         precipitation_amount = $2, date = $3 WHERE id = $4 RETURNING {}",
                        columns
                    )
                };
                let query = sqlx::query_as::<_, PrecipitationRow>(&sql)
                    .bind(&precipitation.precipitation_type)
                    .bind(precipitation.precipitation_amount)
                    .bind(precipitation.date);
                let query = if insert { query } else { query.bind(precipitation.id) };
                query
                    .fetch_optional(&self.db)
                    .await?
                    .map(Observation::from)
            }
        };

        Ok(stored)
    }
}

#[async_trait]
impl MeteoStore for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn insert_observation(&self, record: Observation) -> AppResult<Observation> {
        self.write_observation(&record, true)
            .await?
            .ok_or_else(|| AppError::Internal("Insert returned no row".to_string()))
    }

    async fn get_observation(
        &self,
        kind: ObservationKind,
        id: RecordId,
    ) -> AppResult<Option<Observation>> {
        self.select_observation(kind, Filter::Id(id)).await
    }

    async fn list_observations(&self, kind: ObservationKind) -> AppResult<Vec<Observation>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id ASC",
            observation_columns(kind),
            kind.table()
        );

        match kind {
            ObservationKind::Wind => self.fetch_observations::<WindRow>(&sql).await,
            ObservationKind::Pressure => self.fetch_observations::<PressureRow>(&sql).await,
            ObservationKind::Humidity => self.fetch_observations::<HumidityRow>(&sql).await,
            ObservationKind::Precipitation => {
                self.fetch_observations::<PrecipitationRow>(&sql).await
            }
        }
    }

    async fn update_observation(&self, record: Observation) -> AppResult<Option<Observation>> {
        self.write_observation(&record, false).await
    }

    async fn delete_observation(&self, kind: ObservationKind, id: RecordId) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.db).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_observation_by_date(
        &self,
        kind: ObservationKind,
        date: NaiveDate,
    ) -> AppResult<Option<Observation>> {
        self.select_observation(kind, Filter::Date(date)).await
    }

    async fn insert_zone(&self, record: GeographicZone) -> AppResult<GeographicZone> {
        let zone = sqlx::query_as::<_, ZoneRow>(&format!(
            "INSERT INTO geographic_zone (zone_name, longitude, altitude, latitude) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            ZONE_COLUMNS
        ))
        .bind(&record.zone_name)
        .bind(record.longitude)
        .bind(record.altitude)
        .bind(record.latitude)
        .fetch_one(&self.db)
        .await?;

        Ok(zone.into())
    }

    async fn get_zone(&self, id: RecordId) -> AppResult<Option<GeographicZone>> {
        let zone = sqlx::query_as::<_, ZoneRow>(&format!(
            "SELECT {} FROM geographic_zone WHERE id = $1",
            ZONE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(zone.map(Into::into))
    }

    async fn list_zones(&self) -> AppResult<Vec<GeographicZone>> {
        let zones = sqlx::query_as::<_, ZoneRow>(&format!(
            "SELECT {} FROM geographic_zone ORDER BY id ASC",
            ZONE_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(zones.into_iter().map(Into::into).collect())
    }

    async fn update_zone(&self, record: GeographicZone) -> AppResult<Option<GeographicZone>> {
        let zone = sqlx::query_as::<_, ZoneRow>(&format!(
            "UPDATE geographic_zone SET zone_name = $1, longitude = $2, altitude = $3, \
             latitude = $4 WHERE id = $5 RETURNING {}",
            ZONE_COLUMNS
        ))
        .bind(&record.zone_name)
        .bind(record.longitude)
        .bind(record.altitude)
        .bind(record.latitude)
        .bind(record.id)
        .fetch_optional(&self.db)
        .await?;

        Ok(zone.map(Into::into))
    }

    async fn delete_zone(&self, id: RecordId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM geographic_zone WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_measurement(
        &self,
        record: WeatherMeasurement,
    ) -> AppResult<WeatherMeasurement> {
        let measurement = sqlx::query_as::<_, MeasurementRow>(&format!(
            r#"
            INSERT INTO weather_measurement (
                wind_id, pressure_id, humidity_id, precipitation_id, geographic_zone_id,
                date, max_temperature_2m, min_temperature_2m, cloud_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            MEASUREMENT_COLUMNS
        ))
        .bind(record.wind_id)
        .bind(record.pressure_id)
        .bind(record.humidity_id)
        .bind(record.precipitation_id)
        .bind(record.geographic_zone_id)
        .bind(record.date)
        .bind(record.max_temperature_2m)
        .bind(record.min_temperature_2m)
        .bind(record.cloud_amount)
        .fetch_one(&self.db)
        .await?;

        Ok(measurement.into())
    }

    async fn get_measurement(&self, id: RecordId) -> AppResult<Option<WeatherMeasurement>> {
        let measurement = sqlx::query_as::<_, MeasurementRow>(&format!(
            "SELECT {} FROM weather_measurement WHERE id = $1",
            MEASUREMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(measurement.map(Into::into))
    }

    async fn list_measurements(&self) -> AppResult<Vec<WeatherMeasurement>> {
        let measurements = sqlx::query_as::<_, MeasurementRow>(&format!(
            "SELECT {} FROM weather_measurement ORDER BY id ASC",
            MEASUREMENT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(measurements.into_iter().map(Into::into).collect())
    }

    async fn update_measurement(
        &self,
        record: WeatherMeasurement,
    ) -> AppResult<Option<WeatherMeasurement>> {
        // One statement, so the four links and the date change together
        let measurement = sqlx::query_as::<_, MeasurementRow>(&format!(
            r#"
            UPDATE weather_measurement
            SET wind_id = $1, pressure_id = $2, humidity_id = $3, precipitation_id = $4,
                geographic_zone_id = $5, date = $6, max_temperature_2m = $7,
                min_temperature_2m = $8, cloud_amount = $9
            WHERE id = $10
            RETURNING {}
            "#,
            MEASUREMENT_COLUMNS
        ))
        .bind(record.wind_id)
        .bind(record.pressure_id)
        .bind(record.humidity_id)
        .bind(record.precipitation_id)
        .bind(record.geographic_zone_id)
        .bind(record.date)
        .bind(record.max_temperature_2m)
        .bind(record.min_temperature_2m)
        .bind(record.cloud_amount)
        .bind(record.id)
        .fetch_optional(&self.db)
        .await?;

        Ok(measurement.map(Into::into))
    }

    async fn delete_measurement(&self, id: RecordId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM weather_measurement WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_vegetation(&self, record: Vegetation) -> AppResult<Vegetation> {
        let vegetation = sqlx::query_as::<_, VegetationRow>(&format!(
            "INSERT INTO vegetation (id, climate_measurement_id, wind_id, pressure_id, \
             geographic_zone_id, vegetation_type) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            VEGETATION_COLUMNS
        ))
        .bind(record.id)
        .bind(record.climate_measurement_id)
        .bind(record.wind_id)
        .bind(record.pressure_id)
        .bind(record.geographic_zone_id)
        .bind(&record.vegetation_type)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::DuplicateEntry("Vegetation_ID".to_string());
                }
            }
            AppError::from(e)
        })?;

        Ok(vegetation.into())
    }

    async fn get_vegetation(&self, id: RecordId) -> AppResult<Option<Vegetation>> {
        let vegetation = sqlx::query_as::<_, VegetationRow>(&format!(
            "SELECT {} FROM vegetation WHERE id = $1",
            VEGETATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(vegetation.map(Into::into))
    }

    async fn list_vegetation(&self) -> AppResult<Vec<Vegetation>> {
        let vegetation = sqlx::query_as::<_, VegetationRow>(&format!(
            "SELECT {} FROM vegetation ORDER BY id ASC",
            VEGETATION_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(vegetation.into_iter().map(Into::into).collect())
    }

    async fn update_vegetation(&self, record: Vegetation) -> AppResult<Option<Vegetation>> {
        let vegetation = sqlx::query_as::<_, VegetationRow>(&format!(
            "UPDATE vegetation SET climate_measurement_id = $1, wind_id = $2, pressure_id = $3, \
             geographic_zone_id = $4, vegetation_type = $5 WHERE id = $6 RETURNING {}",
            VEGETATION_COLUMNS
        ))
        .bind(record.climate_measurement_id)
        .bind(record.wind_id)
        .bind(record.pressure_id)
        .bind(record.geographic_zone_id)
        .bind(&record.vegetation_type)
        .bind(record.id)
        .fetch_optional(&self.db)
        .await?;

        Ok(vegetation.map(Into::into))
    }

    async fn delete_vegetation(&self, id: RecordId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM vegetation WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
