//! Weather measurement composite models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::ObservationKind;
use crate::types::{apply_patch, deserialize_patch, RecordId};

/// The four observations a weather measurement links to for its date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObservationSet {
    pub wind_id: RecordId,
    pub pressure_id: RecordId,
    pub humidity_id: RecordId,
    pub precipitation_id: RecordId,
}

impl ObservationSet {
    /// Identifier referenced for the given kind
    pub fn id_for(&self, kind: ObservationKind) -> RecordId {
        match kind {
            ObservationKind::Wind => self.wind_id,
            ObservationKind::Pressure => self.pressure_id,
            ObservationKind::Humidity => self.humidity_id,
            ObservationKind::Precipitation => self.precipitation_id,
        }
    }
}

/// Composite record linking one observation of each kind for a date
///
/// The referenced observations share the measurement's date when it is
/// written. Nothing re-checks this later, so an edited or deleted observation
/// leaves the link stale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherMeasurement {
    #[serde(rename = "ClimateMeasurement_ID")]
    pub id: RecordId,
    #[serde(rename = "Wind_ID")]
    pub wind_id: RecordId,
    #[serde(rename = "Pressure_ID")]
    pub pressure_id: RecordId,
    #[serde(rename = "Humidity_ID")]
    pub humidity_id: RecordId,
    #[serde(rename = "Precipitation_ID")]
    pub precipitation_id: RecordId,
    #[serde(rename = "GeographicZone_ID")]
    pub geographic_zone_id: Option<RecordId>,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Max_Temperature_2m")]
    pub max_temperature_2m: Option<Decimal>,
    #[serde(rename = "Min_Temperature_2m")]
    pub min_temperature_2m: Option<Decimal>,
    #[serde(rename = "Cloud_Amount")]
    pub cloud_amount: Option<Decimal>,
}

impl WeatherMeasurement {
    pub fn observations(&self) -> ObservationSet {
        ObservationSet {
            wind_id: self.wind_id,
            pressure_id: self.pressure_id,
            humidity_id: self.humidity_id,
            precipitation_id: self.precipitation_id,
        }
    }

    /// Relink to a new date; all four references change together
    pub fn relink(&mut self, date: NaiveDate, set: ObservationSet) {
        self.wind_id = set.wind_id;
        self.pressure_id = set.pressure_id;
        self.humidity_id = set.humidity_id;
        self.precipitation_id = set.precipitation_id;
        self.date = date;
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateWeatherMeasurementInput {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "GeographicZone_ID")]
    pub geographic_zone_id: Option<RecordId>,
    #[serde(rename = "Max_Temperature_2m")]
    pub max_temperature_2m: Option<Decimal>,
    #[serde(rename = "Min_Temperature_2m")]
    pub min_temperature_2m: Option<Decimal>,
    #[serde(rename = "Cloud_Amount")]
    pub cloud_amount: Option<Decimal>,
}

/// Partial measurement update
///
/// A present `Date` triggers re-resolution of all four observation links.
/// Every other field is overwritten verbatim when present.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWeatherMeasurementInput {
    #[serde(rename = "Date", default, deserialize_with = "deserialize_patch")]
    pub date: Option<Option<String>>,
    #[serde(rename = "GeographicZone_ID", default, deserialize_with = "deserialize_patch")]
    pub geographic_zone_id: Option<Option<RecordId>>,
    #[serde(rename = "Max_Temperature_2m", default, deserialize_with = "deserialize_patch")]
    pub max_temperature_2m: Option<Option<Decimal>>,
    #[serde(rename = "Min_Temperature_2m", default, deserialize_with = "deserialize_patch")]
    pub min_temperature_2m: Option<Option<Decimal>>,
    #[serde(rename = "Cloud_Amount", default, deserialize_with = "deserialize_patch")]
    pub cloud_amount: Option<Option<Decimal>>,
}

impl UpdateWeatherMeasurementInput {
    /// Overwrite the directly supplied fields present in the payload
    pub fn apply_direct_fields(self, measurement: &mut WeatherMeasurement) {
        apply_patch(&mut measurement.geographic_zone_id, self.geographic_zone_id);
        apply_patch(&mut measurement.max_temperature_2m, self.max_temperature_2m);
        apply_patch(&mut measurement.min_temperature_2m, self.min_temperature_2m);
        apply_patch(&mut measurement.cloud_amount, self.cloud_amount);
    }
}

/// Whether a stored reference still resolves
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LinkStatus {
    pub field: String,
    pub id: Option<RecordId>,
    pub present: bool,
}
