//! Access keys: compact JSON strings that name a child value.
//!
//! A front end navigating into a container needs a key it can hand back
//! later, and only a few value types survive the trip: booleans, numbers,
//! strings, bytes, ranges, timestamps and classes. The key is the JSON
//! payload produced by the value's inspector.

use miette::Diagnostic;
use spyglass_core::{InspectError, get_inspector, json::validate_payload, lookup_inspector_class};
use spyglass_values::Value;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum AccessKeyError {
    /// The key is not valid JSON.
    #[error("access key is not valid JSON")]
    #[diagnostic(code(spyglass::access_key::json))]
    Json(#[from] serde_json::Error),

    /// The payload is well formed but its type tag names no inspector.
    #[error("no inspector for access key type: {type_name}")]
    #[diagnostic(
        code(spyglass::access_key::unknown_type),
        help("keys are produced by encode_access_key; only scalar, range, timestamp and class values have one")
    )]
    UnknownType { type_name: String },

    #[error(transparent)]
    #[diagnostic(code(spyglass::access_key::inspect))]
    Inspect(#[from] InspectError),
}

pub type Result<T, E = AccessKeyError> = core::result::Result<T, E>;

/// Inspector registry key for a payload type tag. Serialized numbers,
/// strings and ranges carry their builtin type name; those are registered
/// under their kind.
fn registry_key(type_name: &str) -> &str {
    match type_name {
        "int" | "float" | "complex" => "number",
        "bool" => "boolean",
        "str" => "string",
        "bytes" => "bytes",
        "range" => "collection",
        "type" => "class",
        other => other,
    }
}

/// Encode `value` as an access key.
///
/// # Example
///
/// ```
/// use spyglass::access_keys::encode_access_key;
/// use spyglass::Value;
///
/// assert_eq!(encode_access_key(&Value::Int(3)).unwrap(), r#"{"type":"int","data":3}"#);
/// ```
pub fn encode_access_key(value: &Value) -> Result<String> {
    let payload = get_inspector(value).to_json()?;
    Ok(serde_json::to_string(&payload)?)
}

/// Decode an access key produced by [`encode_access_key`].
pub fn decode_access_key(key: &str) -> Result<Value> {
    let data: serde_json::Value = serde_json::from_str(key)?;
    let payload = validate_payload(&data)?;
    let type_name = registry_key(&payload.type_name);
    let class = lookup_inspector_class(type_name).ok_or_else(|| {
        AccessKeyError::UnknownType {
            type_name: payload.type_name.clone(),
        }
    })?;
    Ok(class.from_json(&data)?)
}
