//! JSON payloads exchanged with the front end.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonData;

use crate::errors::{InspectError, Result};

/// `{"type": ..., "data": ...}`: a value tagged with the name its inspector
/// serializes it under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonPayload {
    #[serde(rename = "type")]
    pub type_name: String,
    pub data: JsonData,
}

impl JsonPayload {
    pub fn new(type_name: impl Into<String>, data: JsonData) -> Self {
        Self {
            type_name: type_name.into(),
            data,
        }
    }
}

/// Check the envelope of an untrusted payload before any type-specific decoding.
pub fn validate_payload(payload: &JsonData) -> Result<JsonPayload> {
    let JsonData::Object(fields) = payload else {
        return Err(InspectError::malformed(format!(
            "Expected json_data to be dict, got {payload}"
        )));
    };
    let type_name = match fields.get("type") {
        Some(JsonData::String(type_name)) => type_name.clone(),
        Some(other) => {
            return Err(InspectError::malformed(format!(
                "Expected json_data['type'] to be str, got {other}"
            )));
        }
        None => return Err(InspectError::malformed("missing key 'type'")),
    };
    let data = fields
        .get("data")
        .cloned()
        .ok_or_else(|| InspectError::malformed("missing key 'data'"))?;
    Ok(JsonPayload { type_name, data })
}

/// JSON has no non-finite numbers, so those travel as `"nan"`, `"inf"` and
/// `"-inf"`.
pub fn float_to_json(value: f64) -> JsonData {
    if value.is_nan() {
        JsonData::from("nan")
    } else if value.is_infinite() {
        JsonData::from(if value > 0.0 { "inf" } else { "-inf" })
    } else {
        JsonData::from(value)
    }
}

/// Inverse of [`float_to_json`]; integers are accepted as floats.
pub fn float_from_json(data: &JsonData) -> Option<f64> {
    match data {
        JsonData::Number(number) => number.as_f64(),
        JsonData::String(text) => match text.as_str() {
            "nan" => Some(f64::NAN),
            "inf" => Some(f64::INFINITY),
            "-inf" => Some(f64::NEG_INFINITY),
            _ => None,
        },
        _ => None,
    }
}

/// Field `name` of a JSON object, as an integer.
pub fn int_field(data: &JsonData, name: &str) -> Result<i64> {
    match data.get(name) {
        Some(field) => field.as_i64().ok_or_else(|| {
            InspectError::malformed(format!("Expected data['{name}'] to be int, got {field}"))
        }),
        None => Err(InspectError::malformed(format!("missing key '{name}'"))),
    }
}
