//! WebAssembly module for the meteorological observation service
//!
//! Provides client-side checks for:
//! - Observation and measurement dates
//! - Vegetation payloads before submission
//! - Whether a date has every observation kind a measurement needs

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("meteorological-wasm ready"));
}

/// Error message for a date field, or `None` when it is a valid `YYYY-MM-DD`
#[wasm_bindgen]
pub fn date_error(raw: &str) -> Option<String> {
    parse_iso_date("Date", raw).err().map(|e| e.to_string())
}

#[wasm_bindgen]
pub fn is_valid_observation_date(raw: &str) -> bool {
    date_error(raw).is_none()
}

/// First problem with a vegetation create payload, or `None` if it would be
/// accepted
#[wasm_bindgen]
pub fn vegetation_error(payload_json: &str) -> Option<String> {
    match parse_vegetation(payload_json) {
        Ok(input) => validate_vegetation_input(&input).err().map(|e| e.to_string()),
        Err(message) => Some(message),
    }
}

/// Every required vegetation field that is absent or zero
#[wasm_bindgen]
pub fn vegetation_missing_fields(payload_json: &str) -> Result<js_sys::Array, JsValue> {
    let input = parse_vegetation(payload_json).map_err(|e| JsValue::from_str(&e))?;

    Ok(missing_vegetation_fields(&input)
        .into_iter()
        .map(JsValue::from_str)
        .collect())
}

/// Observation kinds still needed before a measurement can be composed.
///
/// `recorded_json` is a JSON array of kind names already recorded for the
/// date, e.g. `["wind", "humidity"]`.
#[wasm_bindgen]
pub fn missing_observation_kinds(recorded_json: &str) -> Result<js_sys::Array, JsValue> {
    let missing = missing_kinds(recorded_json).map_err(|e| JsValue::from_str(&e))?;

    Ok(missing
        .into_iter()
        .map(|kind| JsValue::from_str(kind.table()))
        .collect())
}

fn parse_vegetation(payload_json: &str) -> Result<CreateVegetationInput, String> {
    serde_json::from_str(payload_json).map_err(|e| format!("Invalid vegetation JSON: {}", e))
}

fn missing_kinds(recorded_json: &str) -> Result<Vec<ObservationKind>, String> {
    let recorded: Vec<ObservationKind> = serde_json::from_str(recorded_json)
        .map_err(|e| format!("Invalid observation kinds JSON: {}", e))?;

    Ok(ObservationKind::ALL
        .into_iter()
        .filter(|kind| !recorded.contains(kind))
        .collect())
}
