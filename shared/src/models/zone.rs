//! Geographic zone models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{apply_patch, deserialize_patch, RecordId};

/// A named location measurements are attributed to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeographicZone {
    #[serde(rename = "GeographicZone_ID")]
    pub id: RecordId,
    #[serde(rename = "Zone_Name")]
    pub zone_name: String,
    #[serde(rename = "Longitude")]
    pub longitude: Option<Decimal>,
    #[serde(rename = "Altitude")]
    pub altitude: Option<Decimal>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateGeographicZoneInput {
    #[serde(rename = "Zone_Name")]
    pub zone_name: Option<String>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<Decimal>,
    #[serde(rename = "Altitude")]
    pub altitude: Option<Decimal>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<Decimal>,
}

/// Partial zone update; `Zone_Name` is not nullable so null counts as absent
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGeographicZoneInput {
    #[serde(rename = "Zone_Name")]
    pub zone_name: Option<String>,
    #[serde(rename = "Longitude", default, deserialize_with = "deserialize_patch")]
    pub longitude: Option<Option<Decimal>>,
    #[serde(rename = "Altitude", default, deserialize_with = "deserialize_patch")]
    pub altitude: Option<Option<Decimal>>,
    #[serde(rename = "Latitude", default, deserialize_with = "deserialize_patch")]
    pub latitude: Option<Option<Decimal>>,
}

impl UpdateGeographicZoneInput {
    /// Overwrite the coordinates present in the payload
    pub fn apply_coordinates(self, zone: &mut GeographicZone) {
        apply_patch(&mut zone.longitude, self.longitude);
        apply_patch(&mut zone.altitude, self.altitude);
        apply_patch(&mut zone.latitude, self.latitude);
    }
}
