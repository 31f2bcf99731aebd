//! Dated single-kind observations (wind, pressure, humidity, precipitation)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{apply_patch, deserialize_patch, RecordId};
use crate::validation::{require_max_len, ValidationError, MAX_TEXT_LEN};

/// The four observation kinds a weather measurement is composed from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    Wind,
    Pressure,
    Humidity,
    Precipitation,
}

impl ObservationKind {
    /// Every kind, in composition order
    pub const ALL: [ObservationKind; 4] = [
        ObservationKind::Wind,
        ObservationKind::Pressure,
        ObservationKind::Humidity,
        ObservationKind::Precipitation,
    ];

    /// Storage table holding records of this kind
    pub fn table(&self) -> &'static str {
        match self {
            ObservationKind::Wind => "wind",
            ObservationKind::Pressure => "pressure",
            ObservationKind::Humidity => "humidity",
            ObservationKind::Precipitation => "precipitation",
        }
    }

    /// Name of the identifier field on the wire and in storage
    pub fn id_field(&self) -> &'static str {
        match self {
            ObservationKind::Wind => "Wind_ID",
            ObservationKind::Pressure => "Pressure_ID",
            ObservationKind::Humidity => "Humidity_ID",
            ObservationKind::Precipitation => "Precipitation_ID",
        }
    }
}

impl std::fmt::Display for ObservationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObservationKind::Wind => write!(f, "Wind"),
            ObservationKind::Pressure => write!(f, "Pressure"),
            ObservationKind::Humidity => write!(f, "Humidity"),
            ObservationKind::Precipitation => write!(f, "Precipitation"),
        }
    }
}

/// Wind speed and direction on a date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wind {
    #[serde(rename = "Wind_ID")]
    pub id: RecordId,
    #[serde(rename = "Wind_Speed")]
    pub wind_speed: Option<Decimal>,
    #[serde(rename = "Wind_Direction")]
    pub wind_direction: Option<Decimal>,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
}

/// Atmospheric pressure on a date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pressure {
    #[serde(rename = "Pressure_ID")]
    pub id: RecordId,
    #[serde(rename = "PressureValue")]
    pub pressure_value: Option<Decimal>,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
}

/// Soil wetness at surface, root zone and full profile on a date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Humidity {
    #[serde(rename = "Humidity_ID")]
    pub id: RecordId,
    #[serde(rename = "SurfaceSoilWetness")]
    pub surface_soil_wetness: Option<Decimal>,
    #[serde(rename = "RootZoneSoilWetness")]
    pub root_zone_soil_wetness: Option<Decimal>,
    #[serde(rename = "ProfileSoilMoisture")]
    pub profile_soil_moisture: Option<Decimal>,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
}

/// Precipitation type and amount on a date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Precipitation {
    #[serde(rename = "Precipitation_ID")]
    pub id: RecordId,
    #[serde(rename = "Precipitation_Type")]
    pub precipitation_type: Option<String>,
    #[serde(rename = "Precipitation_Amount")]
    pub precipitation_amount: Option<Decimal>,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
}

/// An observation of any kind
///
/// Serializes as the inner record so clients see the same shape regardless
/// of which collection they query.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Observation {
    Wind(Wind),
    Pressure(Pressure),
    Humidity(Humidity),
    Precipitation(Precipitation),
}

impl Observation {
    pub fn kind(&self) -> ObservationKind {
        match self {
            Observation::Wind(_) => ObservationKind::Wind,
            Observation::Pressure(_) => ObservationKind::Pressure,
            Observation::Humidity(_) => ObservationKind::Humidity,
            Observation::Precipitation(_) => ObservationKind::Precipitation,
        }
    }

    pub fn id(&self) -> RecordId {
        match self {
            Observation::Wind(w) => w.id,
            Observation::Pressure(p) => p.id,
            Observation::Humidity(h) => h.id,
            Observation::Precipitation(p) => p.id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Observation::Wind(w) => w.date,
            Observation::Pressure(p) => p.date,
            Observation::Humidity(h) => h.date,
            Observation::Precipitation(p) => p.date,
        }
    }

    /// Replace the store-assigned identifier
    pub fn set_id(&mut self, id: RecordId) {
        match self {
            Observation::Wind(w) => w.id = id,
            Observation::Pressure(p) => p.id = id,
            Observation::Humidity(h) => h.id = id,
            Observation::Precipitation(p) => p.id = id,
        }
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        match self {
            Observation::Wind(w) => w.date = date,
            Observation::Pressure(p) => p.date = date,
            Observation::Humidity(h) => h.date = date,
            Observation::Precipitation(p) => p.date = date,
        }
    }
}

/// Create payload for a single observation kind.
///
/// `Date` arrives as raw text so the service can report a precise error for
/// missing or malformed dates.
pub trait ObservationDraft: Send {
    const KIND: ObservationKind;

    fn raw_date(&self) -> Option<&str>;

    /// Field checks beyond the date
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Build the record to insert; the identifier is assigned by the store
    fn into_observation(self, date: NaiveDate) -> Observation;
}

/// Partial update payload for a single observation kind
pub trait ObservationPatch: Send {
    const KIND: ObservationKind;

    /// `None` when `Date` is absent, `Some(None)` when it is explicitly null
    fn raw_date(&self) -> Option<Option<&str>>;

    /// Field checks beyond the date
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Overwrite the measured fields present in the payload
    fn apply_fields(self, record: &mut Observation);
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateWindInput {
    #[serde(rename = "Wind_Speed")]
    pub wind_speed: Option<Decimal>,
    #[serde(rename = "Wind_Direction")]
    pub wind_direction: Option<Decimal>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
}

impl ObservationDraft for CreateWindInput {
    const KIND: ObservationKind = ObservationKind::Wind;

    fn raw_date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    fn into_observation(self, date: NaiveDate) -> Observation {
        Observation::Wind(Wind {
            id: 0,
            wind_speed: self.wind_speed,
            wind_direction: self.wind_direction,
            date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateWindInput {
    #[serde(rename = "Wind_Speed", default, deserialize_with = "deserialize_patch")]
    pub wind_speed: Option<Option<Decimal>>,
    #[serde(rename = "Wind_Direction", default, deserialize_with = "deserialize_patch")]
    pub wind_direction: Option<Option<Decimal>>,
    #[serde(rename = "Date", default, deserialize_with = "deserialize_patch")]
    pub date: Option<Option<String>>,
}

impl ObservationPatch for UpdateWindInput {
    const KIND: ObservationKind = ObservationKind::Wind;

    fn raw_date(&self) -> Option<Option<&str>> {
        self.date.as_ref().map(|d| d.as_deref())
    }

    fn apply_fields(self, record: &mut Observation) {
        if let Observation::Wind(wind) = record {
            apply_patch(&mut wind.wind_speed, self.wind_speed);
            apply_patch(&mut wind.wind_direction, self.wind_direction);
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreatePressureInput {
    #[serde(rename = "PressureValue")]
    pub pressure_value: Option<Decimal>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
}

impl ObservationDraft for CreatePressureInput {
    const KIND: ObservationKind = ObservationKind::Pressure;

    fn raw_date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    fn into_observation(self, date: NaiveDate) -> Observation {
        Observation::Pressure(Pressure {
            id: 0,
            pressure_value: self.pressure_value,
            date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePressureInput {
    #[serde(rename = "PressureValue", default, deserialize_with = "deserialize_patch")]
    pub pressure_value: Option<Option<Decimal>>,
    #[serde(rename = "Date", default, deserialize_with = "deserialize_patch")]
    pub date: Option<Option<String>>,
}

impl ObservationPatch for UpdatePressureInput {
    const KIND: ObservationKind = ObservationKind::Pressure;

    fn raw_date(&self) -> Option<Option<&str>> {
        self.date.as_ref().map(|d| d.as_deref())
    }

    fn apply_fields(self, record: &mut Observation) {
        if let Observation::Pressure(pressure) = record {
            apply_patch(&mut pressure.pressure_value, self.pressure_value);
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateHumidityInput {
    #[serde(rename = "SurfaceSoilWetness")]
    pub surface_soil_wetness: Option<Decimal>,
    #[serde(rename = "RootZoneSoilWetness")]
    pub root_zone_soil_wetness: Option<Decimal>,
    #[serde(rename = "ProfileSoilMoisture")]
    pub profile_soil_moisture: Option<Decimal>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
}

impl ObservationDraft for CreateHumidityInput {
    const KIND: ObservationKind = ObservationKind::Humidity;

    fn raw_date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    fn into_observation(self, date: NaiveDate) -> Observation {
        Observation::Humidity(Humidity {
            id: 0,
            surface_soil_wetness: self.surface_soil_wetness,
            root_zone_soil_wetness: self.root_zone_soil_wetness,
            profile_soil_moisture: self.profile_soil_moisture,
            date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateHumidityInput {
    #[serde(rename = "SurfaceSoilWetness", default, deserialize_with = "deserialize_patch")]
    pub surface_soil_wetness: Option<Option<Decimal>>,
    #[serde(rename = "RootZoneSoilWetness", default, deserialize_with = "deserialize_patch")]
    pub root_zone_soil_wetness: Option<Option<Decimal>>,
    #[serde(rename = "ProfileSoilMoisture", default, deserialize_with = "deserialize_patch")]
    pub profile_soil_moisture: Option<Option<Decimal>>,
    #[serde(rename = "Date", default, deserialize_with = "deserialize_patch")]
    pub date: Option<Option<String>>,
}

impl ObservationPatch for UpdateHumidityInput {
    const KIND: ObservationKind = ObservationKind::Humidity;

    fn raw_date(&self) -> Option<Option<&str>> {
        self.date.as_ref().map(|d| d.as_deref())
    }

    fn apply_fields(self, record: &mut Observation) {
        if let Observation::Humidity(humidity) = record {
            apply_patch(&mut humidity.surface_soil_wetness, self.surface_soil_wetness);
            apply_patch(&mut humidity.root_zone_soil_wetness, self.root_zone_soil_wetness);
            apply_patch(&mut humidity.profile_soil_moisture, self.profile_soil_moisture);
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreatePrecipitationInput {
    #[serde(rename = "Precipitation_Type")]
    pub precipitation_type: Option<String>,
    #[serde(rename = "Precipitation_Amount")]
    pub precipitation_amount: Option<Decimal>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
}

impl ObservationDraft for CreatePrecipitationInput {
    const KIND: ObservationKind = ObservationKind::Precipitation;

    fn raw_date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_max_len(
            "Precipitation_Type",
            self.precipitation_type.as_deref(),
            MAX_TEXT_LEN,
        )
    }

    fn into_observation(self, date: NaiveDate) -> Observation {
        Observation::Precipitation(Precipitation {
            id: 0,
            precipitation_type: self.precipitation_type,
            precipitation_amount: self.precipitation_amount,
            date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePrecipitationInput {
    #[serde(rename = "Precipitation_Type", default, deserialize_with = "deserialize_patch")]
    pub precipitation_type: Option<Option<String>>,
    #[serde(rename = "Precipitation_Amount", default, deserialize_with = "deserialize_patch")]
    pub precipitation_amount: Option<Option<Decimal>>,
    #[serde(rename = "Date", default, deserialize_with = "deserialize_patch")]
    pub date: Option<Option<String>>,
}

impl ObservationPatch for UpdatePrecipitationInput {
    const KIND: ObservationKind = ObservationKind::Precipitation;

    fn raw_date(&self) -> Option<Option<&str>> {
        self.date.as_ref().map(|d| d.as_deref())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_max_len(
            "Precipitation_Type",
            self.precipitation_type.as_ref().and_then(|t| t.as_deref()),
            MAX_TEXT_LEN,
        )
    }

    fn apply_fields(self, record: &mut Observation) {
        if let Observation::Precipitation(precipitation) = record {
            apply_patch(&mut precipitation.precipitation_type, self.precipitation_type);
            apply_patch(&mut precipitation.precipitation_amount, self.precipitation_amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_wind_serializes_with_wire_field_names() {
        let wind = Observation::Wind(Wind {
            id: 4,
            wind_speed: Some(Decimal::new(125, 1)),
            wind_direction: None,
            date: date("2024-03-01"),
        });

        let json = serde_json::to_value(&wind).unwrap();
        assert_eq!(json["Wind_ID"], 4);
        assert_eq!(json["Date"], "2024-03-01");
        assert!(json["Wind_Direction"].is_null());
        assert!(json.get("Wind").is_none());
    }

    #[test]
    fn test_patch_leaves_absent_fields_untouched() {
        let mut record = Observation::Humidity(Humidity {
            id: 1,
            surface_soil_wetness: Some(Decimal::ONE),
            root_zone_soil_wetness: Some(Decimal::TWO),
            profile_soil_moisture: Some(Decimal::TEN),
            date: date("2024-03-01"),
        });

        let patch: UpdateHumidityInput =
            serde_json::from_str(r#"{"SurfaceSoilWetness": null, "ProfileSoilMoisture": 0.5}"#)
                .unwrap();
        assert!(patch.raw_date().is_none());
        patch.apply_fields(&mut record);

        match record {
            Observation::Humidity(h) => {
                assert_eq!(h.surface_soil_wetness, None);
                assert_eq!(h.root_zone_soil_wetness, Some(Decimal::TWO));
                assert_eq!(h.profile_soil_moisture, Some(Decimal::new(5, 1)));
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn test_explicit_null_date_is_reported() {
        let patch: UpdatePressureInput = serde_json::from_str(r#"{"Date": null}"#).unwrap();
        assert_eq!(patch.raw_date(), Some(None));
    }

    #[test]
    fn test_kind_order_and_names() {
        assert_eq!(ObservationKind::ALL[0], ObservationKind::Wind);
        assert_eq!(ObservationKind::ALL[3], ObservationKind::Precipitation);
        assert_eq!(ObservationKind::Humidity.id_field(), "Humidity_ID");
        assert_eq!(ObservationKind::Pressure.table(), "pressure");
        assert_eq!(ObservationKind::Precipitation.to_string(), "Precipitation");
    }
}
