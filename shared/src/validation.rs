//! Validation utilities for the meteorological observation platform
//!
//! Pure request checks shared by the backend and the WASM client bindings.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{CreateVegetationInput, Vegetation};
use crate::types::{RecordId, DATE_FORMAT};

/// A request payload failed validation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(String),

    #[error("Invalid date format for {field}: {value:?}. Use YYYY-MM-DD.")]
    InvalidDateFormat { field: String, value: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField(field) => field,
            ValidationError::InvalidDateFormat { field, .. } => field,
            ValidationError::TooLong { field, .. } => field,
        }
    }
}

/// Fields a vegetation create payload must carry, checked in this order
pub const VEGETATION_REQUIRED_FIELDS: [&str; 5] = [
    "Vegetation_ID",
    "ClimateMeasurement_ID",
    "Wind_ID",
    "Pressure_ID",
    "GeographicZone_ID",
];

/// Longest text accepted for `Zone_Name`, `Precipitation_Type` and
/// `Vegetation_Type`; the columns are `VARCHAR(100)`
pub const MAX_TEXT_LEN: usize = 100;

// ============================================================================
// Dates
// ============================================================================

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_iso_date(field: &str, raw: &str) -> Result<NaiveDate, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()));
    }
    // chrono accepts unpadded fields; the wire format is always zero padded
    if raw.len() != 10 {
        return Err(invalid_date(field, raw));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid_date(field, raw))
}

/// Require a date field to be present and parseable
pub fn require_date(field: &str, raw: Option<&str>) -> Result<NaiveDate, ValidationError> {
    match raw {
        Some(raw) => parse_iso_date(field, raw),
        None => Err(ValidationError::MissingField(field.to_string())),
    }
}

/// Parse an optional date patch; an explicit null is not a date
pub fn parse_date_patch(
    field: &str,
    raw: Option<Option<&str>>,
) -> Result<Option<NaiveDate>, ValidationError> {
    match raw {
        None => Ok(None),
        Some(None) => Err(invalid_date(field, "null")),
        // A present but empty date is malformed, not missing
        Some(Some("")) => Err(invalid_date(field, "")),
        Some(Some(raw)) => parse_iso_date(field, raw).map(Some),
    }
}

fn invalid_date(field: &str, raw: &str) -> ValidationError {
    ValidationError::InvalidDateFormat {
        field: field.to_string(),
        value: raw.to_string(),
    }
}

// ============================================================================
// Identifiers and text
// ============================================================================

/// Require an identifier to be present and truthy.
///
/// Zero is rejected like an absent value.
pub fn require_identifier(
    field: &str,
    value: Option<RecordId>,
) -> Result<RecordId, ValidationError> {
    match value {
        Some(id) if id != 0 => Ok(id),
        _ => Err(ValidationError::MissingField(field.to_string())),
    }
}

/// Reject text longer than `max` characters; absent text passes
pub fn require_max_len(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(text) if text.chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        _ => Ok(()),
    }
}

/// Require a non-blank text field
pub fn require_text<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError::MissingField(field.to_string())),
    }
}

// ============================================================================
// Vegetation
// ============================================================================

/// Validate a vegetation create payload, reporting the first missing field.
///
/// References are accepted verbatim; they are not cross-checked against the
/// referenced weather measurement.
pub fn validate_vegetation_input(
    input: &CreateVegetationInput,
) -> Result<Vegetation, ValidationError> {
    let [id_field, measurement_field, wind_field, pressure_field, zone_field] =
        VEGETATION_REQUIRED_FIELDS;

    let vegetation = Vegetation {
        id: require_identifier(id_field, input.id)?,
        climate_measurement_id: require_identifier(
            measurement_field,
            input.climate_measurement_id,
        )?,
        wind_id: require_identifier(wind_field, input.wind_id)?,
        pressure_id: require_identifier(pressure_field, input.pressure_id)?,
        geographic_zone_id: require_identifier(zone_field, input.geographic_zone_id)?,
        vegetation_type: input.vegetation_type.clone(),
    };
    require_max_len(
        "Vegetation_Type",
        vegetation.vegetation_type.as_deref(),
        MAX_TEXT_LEN,
    )?;

    Ok(vegetation)
}

/// Every required vegetation field that is absent or zero, in check order
pub fn missing_vegetation_fields(input: &CreateVegetationInput) -> Vec<&'static str> {
    let values = [
        input.id,
        input.climate_measurement_id,
        input.wind_id,
        input.pressure_id,
        input.geographic_zone_id,
    ];

    VEGETATION_REQUIRED_FIELDS
        .iter()
        .zip(values)
        .filter(|(field, value)| require_identifier(field, *value).is_err())
        .map(|(field, _)| *field)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn complete_vegetation() -> CreateVegetationInput {
        CreateVegetationInput {
            id: Some(10),
            climate_measurement_id: Some(3),
            wind_id: Some(5),
            pressure_id: Some(6),
            geographic_zone_id: Some(2),
            vegetation_type: Some("Grassland".to_string()),
        }
    }

    // ========================================================================
    // Date Tests
    // ========================================================================

    #[test]
    fn test_parse_iso_date_valid() {
        let date = parse_iso_date("Date", "2024-03-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_parse_iso_date_invalid() {
        assert!(matches!(
            parse_iso_date("Date", "01/03/2024"),
            Err(ValidationError::InvalidDateFormat { .. })
        ));
        assert!(parse_iso_date("Date", "2024-02-30").is_err());
        assert!(parse_iso_date("Date", "2024-3-1").is_err());
        assert!(parse_iso_date("Date", "2024-03-01T00:00:00").is_err());
    }

    #[test]
    fn test_empty_date_is_missing() {
        assert_eq!(
            parse_iso_date("Date", ""),
            Err(ValidationError::MissingField("Date".to_string()))
        );
        assert_eq!(
            require_date("Date", None),
            Err(ValidationError::MissingField("Date".to_string()))
        );
    }

    #[test]
    fn test_date_patch() {
        assert_eq!(parse_date_patch("Date", None), Ok(None));
        assert!(parse_date_patch("Date", Some(None)).is_err());
        assert_eq!(
            parse_date_patch("Date", Some(Some(""))),
            Err(ValidationError::InvalidDateFormat {
                field: "Date".to_string(),
                value: String::new(),
            })
        );
        assert_eq!(
            parse_date_patch("Date", Some(Some("2024-03-02"))),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 2))
        );
    }

    // ========================================================================
    // Identifier Tests
    // ========================================================================

    #[test]
    fn test_zero_identifier_is_missing() {
        assert!(require_identifier("Wind_ID", Some(0)).is_err());
        assert!(require_identifier("Wind_ID", None).is_err());
        assert_eq!(require_identifier("Wind_ID", Some(-4)), Ok(-4));
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("Zone_Name", Some("Andes")), Ok("Andes"));
        assert!(require_text("Zone_Name", Some("   ")).is_err());
        assert!(require_text("Zone_Name", None).is_err());
    }

    #[test]
    fn test_require_max_len() {
        let at_limit = "a".repeat(MAX_TEXT_LEN);
        let over_limit = "a".repeat(MAX_TEXT_LEN + 1);

        assert_eq!(require_max_len("Zone_Name", None, MAX_TEXT_LEN), Ok(()));
        assert_eq!(require_max_len("Zone_Name", Some(at_limit.as_str()), MAX_TEXT_LEN), Ok(()));
        // Counted in characters, like the column
        assert_eq!(
            require_max_len("Zone_Name", Some("é".repeat(MAX_TEXT_LEN).as_str()), MAX_TEXT_LEN),
            Ok(())
        );

        let err = require_max_len("Zone_Name", Some(over_limit.as_str()), MAX_TEXT_LEN).unwrap_err();
        assert_eq!(err.field(), "Zone_Name");
        assert_eq!(err.to_string(), "Zone_Name must be at most 100 characters");
    }

    // ========================================================================
    // Vegetation Tests
    // ========================================================================

    #[test]
    fn test_vegetation_input_valid() {
        let vegetation = validate_vegetation_input(&complete_vegetation()).unwrap();
        assert_eq!(vegetation.id, 10);
        assert_eq!(vegetation.climate_measurement_id, 3);
        assert_eq!(vegetation.vegetation_type.as_deref(), Some("Grassland"));
    }

    #[test]
    fn test_vegetation_type_is_optional() {
        let input = CreateVegetationInput {
            vegetation_type: None,
            ..complete_vegetation()
        };
        assert!(validate_vegetation_input(&input).is_ok());
    }

    #[test]
    fn test_vegetation_reports_first_missing_field() {
        let input = CreateVegetationInput {
            wind_id: Some(0),
            geographic_zone_id: None,
            ..complete_vegetation()
        };

        let err = validate_vegetation_input(&input).unwrap_err();
        assert_eq!(err.field(), "Wind_ID");
        assert_eq!(err.to_string(), "Wind_ID is required");
        assert_eq!(missing_vegetation_fields(&input), vec!["Wind_ID", "GeographicZone_ID"]);
    }

    #[test]
    fn test_vegetation_type_too_long() {
        let input = CreateVegetationInput {
            vegetation_type: Some("x".repeat(MAX_TEXT_LEN + 1)),
            ..complete_vegetation()
        };

        let err = validate_vegetation_input(&input).unwrap_err();
        assert_eq!(err.field(), "Vegetation_Type");
    }

    proptest! {
        /// Any valid calendar date survives formatting and parsing
        #[test]
        fn prop_iso_dates_parse(days in 0i64..200_000) {
            let date = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + chrono::Duration::days(days);
            let raw = date.format(DATE_FORMAT).to_string();
            prop_assert_eq!(parse_iso_date("Date", &raw), Ok(date));
        }

        /// Clearing any one required field to zero rejects the payload with that field named
        #[test]
        fn prop_zero_reference_rejected(index in 0usize..5, absent in any::<bool>()) {
            let value = if absent { None } else { Some(0) };
            let mut input = complete_vegetation();
            match index {
                0 => input.id = value,
                1 => input.climate_measurement_id = value,
                2 => input.wind_id = value,
                3 => input.pressure_id = value,
                _ => input.geographic_zone_id = value,
            }

            let err = validate_vegetation_input(&input).unwrap_err();
            prop_assert_eq!(err.field(), VEGETATION_REQUIRED_FIELDS[index]);
        }

        /// Non-zero references are always accepted verbatim
        #[test]
        fn prop_nonzero_references_accepted(ids in prop::array::uniform5(1i64..i64::MAX)) {
            let input = CreateVegetationInput {
                id: Some(ids[0]),
                climate_measurement_id: Some(ids[1]),
                wind_id: Some(ids[2]),
                pressure_id: Some(ids[3]),
                geographic_zone_id: Some(ids[4]),
                vegetation_type: None,
            };
            let vegetation = validate_vegetation_input(&input).unwrap();
            prop_assert_eq!(
                [vegetation.id, vegetation.climate_measurement_id, vegetation.wind_id,
                 vegetation.pressure_id, vegetation.geographic_zone_id],
                ids
            );
        }
    }
}
