//! Vegetation models

use serde::{Deserialize, Serialize};

use crate::types::{apply_patch, deserialize_patch, RecordId};

/// Vegetation record
///
/// `Wind_ID`, `Pressure_ID` and `GeographicZone_ID` are stored as supplied and
/// may differ from the ones held by the referenced weather measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vegetation {
    #[serde(rename = "Vegetation_ID")]
    pub id: RecordId,
    #[serde(rename = "ClimateMeasurement_ID")]
    pub climate_measurement_id: RecordId,
    #[serde(rename = "Wind_ID")]
    pub wind_id: RecordId,
    #[serde(rename = "Pressure_ID")]
    pub pressure_id: RecordId,
    #[serde(rename = "GeographicZone_ID")]
    pub geographic_zone_id: RecordId,
    #[serde(rename = "Vegetation_Type")]
    pub vegetation_type: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CreateVegetationInput {
    #[serde(rename = "Vegetation_ID")]
    pub id: Option<RecordId>,
    #[serde(rename = "ClimateMeasurement_ID")]
    pub climate_measurement_id: Option<RecordId>,
    #[serde(rename = "Wind_ID")]
    pub wind_id: Option<RecordId>,
    #[serde(rename = "Pressure_ID")]
    pub pressure_id: Option<RecordId>,
    #[serde(rename = "GeographicZone_ID")]
    pub geographic_zone_id: Option<RecordId>,
    #[serde(rename = "Vegetation_Type")]
    pub vegetation_type: Option<String>,
}

/// Partial vegetation update; the reference columns are not nullable so a
/// null reference counts as absent
#[derive(Debug, Default, Deserialize)]
pub struct UpdateVegetationInput {
    #[serde(rename = "ClimateMeasurement_ID")]
    pub climate_measurement_id: Option<RecordId>,
    #[serde(rename = "Wind_ID")]
    pub wind_id: Option<RecordId>,
    #[serde(rename = "Pressure_ID")]
    pub pressure_id: Option<RecordId>,
    #[serde(rename = "GeographicZone_ID")]
    pub geographic_zone_id: Option<RecordId>,
    #[serde(rename = "Vegetation_Type", default, deserialize_with = "deserialize_patch")]
    pub vegetation_type: Option<Option<String>>,
}

impl UpdateVegetationInput {
    pub fn apply(self, vegetation: &mut Vegetation) {
        if let Some(id) = self.climate_measurement_id {
            vegetation.climate_measurement_id = id;
        }
        if let Some(id) = self.wind_id {
            vegetation.wind_id = id;
        }
        if let Some(id) = self.pressure_id {
            vegetation.pressure_id = id;
        }
        if let Some(id) = self.geographic_zone_id {
            vegetation.geographic_zone_id = id;
        }
        apply_patch(&mut vegetation.vegetation_type, self.vegetation_type);
    }
}
