//! JSON literals as host values.

use spyglass_values::Value;

/// Parse a JSON literal: null → `None`, integers → `int`, other numbers →
/// `float`, arrays → `list`, objects → `dict` with string keys.
pub fn parse_literal(text: &str) -> Result<Value, serde_json::Error> {
    let data: serde_json::Value = serde_json::from_str(text)?;
    Ok(to_value(&data))
}

pub fn to_value(data: &serde_json::Value) -> Value {
    use serde_json::Value as Json;

    match data {
        Json::Null => Value::None,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(number) => match number.as_i64() {
            Some(n) => Value::Int(n),
            // Beyond i64, or fractional.
            None => Value::Float(number.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::str(s),
        Json::Array(items) => Value::list(items.iter().map(to_value)),
        Json::Object(fields) => Value::dict(
            fields
                .iter()
                .map(|(key, field)| (Value::str(key), to_value(field))),
        ),
    }
}
