//! Scalars, strings, byte buffers and callables.

use serde_json::Value as JsonData;
use spyglass_values::{Complex, HostError, Value};

use super::Inspector;
use crate::{
    errors::{InspectError, Result},
    json::{float_from_json, float_to_json},
    kind::Kind,
    truncate::{
        DisplayValue, bytes_display_value, default_display_value, maybe_truncate_string,
        string_display_value,
    },
};

pub struct NoneInspector<'a> {
    value: &'a Value,
}

impl<'a> NoneInspector<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }
}

impl<'a> Inspector<'a> for NoneInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn is_mutable(&self) -> bool {
        false
    }
}

pub struct BooleanInspector<'a> {
    value: &'a Value,
}

impl<'a> BooleanInspector<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn value_from_json(_type_name: &str, data: &JsonData) -> Result<Value> {
        match data {
            JsonData::Bool(b) => Ok(Value::Bool(*b)),
            other => Err(InspectError::malformed(format!(
                "Expected data to be bool, got {other}"
            ))),
        }
    }
}

impl<'a> Inspector<'a> for BooleanInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn is_mutable(&self) -> bool {
        false
    }

    fn get_kind(&self) -> Kind {
        Kind::Boolean
    }

    fn value_to_json(&self) -> Result<JsonData> {
        match self.value {
            Value::Bool(b) => Ok(JsonData::Bool(*b)),
            _ => Err(InspectError::unsupported("value_to_json", self.get_type_info())),
        }
    }
}

/// `bytes`, `bytearray` and `memoryview`.
pub struct BytesInspector<'a> {
    value: &'a Value,
}

impl<'a> BytesInspector<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn value_from_json(type_name: &str, data: &JsonData) -> Result<Value> {
        match data {
            JsonData::String(text) => Ok(Value::bytes(text.as_bytes())),
            _ => Err(InspectError::unsupported("value_from_json", type_name)),
        }
    }
}

impl<'a> Inspector<'a> for BytesInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn is_mutable(&self) -> bool {
        !matches!(self.value, Value::Bytes(_))
    }

    fn deepcopy(&self) -> Result<Value> {
        match self.value {
            // A bytearray can only hold bytes, so a fresh buffer shares nothing.
            Value::ByteArray(bytes) => Ok(Value::bytearray(bytes.borrow().clone())),
            _ if self.is_mutable() => Err(InspectError::CopyRefused {
                type_name: self.get_type_info(),
            }),
            _ => Ok(self.value.clone()),
        }
    }

    fn get_kind(&self) -> Kind {
        Kind::Bytes
    }

    fn get_display_value(&self, level: usize) -> DisplayValue {
        match self.value {
            Value::Bytes(bytes) => bytes_display_value(bytes, false, level),
            Value::ByteArray(bytes) => bytes_display_value(&bytes.borrow(), true, level),
            _ => default_display_value(self.value, level),
        }
    }

    fn has_children(&self) -> bool {
        false
    }

    fn value_to_json(&self) -> Result<JsonData> {
        match self.value {
            Value::Bytes(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => Ok(JsonData::from(text)),
                Err(err) => Err(HostError::InvalidValue(format!(
                    "'utf-8' codec can't decode bytes: {err}"
                ))
                .into()),
            },
            _ => Err(InspectError::unsupported("value_to_json", self.get_type_info())),
        }
    }
}

pub struct PropertyInspector<'a> {
    value: &'a Value,
}

impl<'a> PropertyInspector<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }
}

impl<'a> Inspector<'a> for PropertyInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn is_mutable(&self) -> bool {
        false
    }
}

/// Functions and methods.
pub struct FunctionInspector<'a> {
    value: &'a Value,
}

impl<'a> FunctionInspector<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }
}

impl<'a> Inspector<'a> for FunctionInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn is_mutable(&self) -> bool {
        false
    }

    fn get_kind(&self) -> Kind {
        Kind::Function
    }

    fn get_display_value(&self, level: usize) -> DisplayValue {
        let text = match self.value {
            Value::Function(function) => format!("{}{}", function.qualname, function.signature),
            other => format!("{}()", other.type_name().qualname),
        };
        maybe_truncate_string(&text, level)
    }
}

/// Numbers, including library scalars.
///
/// Library scalars (e.g. `numpy.float32`) render through the built-in number
/// they wrap, since their own repr spells out the type.
pub struct NumberInspector<'a> {
    value: &'a Value,
    unwrap_scalar: bool,
}

impl<'a> NumberInspector<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self {
            value,
            unwrap_scalar: false,
        }
    }

    /// An inspector that displays a library scalar as the number it wraps.
    pub fn library_scalar(value: &'a Value) -> Self {
        Self {
            value,
            unwrap_scalar: true,
        }
    }

    /// The built-in number behind the value.
    fn number(&self) -> Option<Value> {
        match self.value {
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Complex(_) => {
                Some(self.value.clone())
            }
            Value::Host(host) => host.as_scalar(),
            _ => None,
        }
    }

    /// Serialization is lossy across concrete numeric types: a library
    /// integer travels as `int`.
    pub fn value_from_json(type_name: &str, data: &JsonData) -> Result<Value> {
        match type_name {
            "int" => data.as_i64().map(Value::Int).ok_or_else(|| {
                InspectError::malformed(format!("Expected data to be int, got {data}"))
            }),
            "float" => float_from_json(data).map(Value::Float).ok_or_else(|| {
                InspectError::malformed(format!("Expected data to be float, got {data}"))
            }),
            "complex" => match data {
                JsonData::String(text) => Ok(Value::Complex(Complex::parse(text)?)),
                other => Err(InspectError::malformed(format!(
                    "Expected data to be str, got {other}"
                ))),
            },
            _ => Err(InspectError::unsupported("value_from_json", type_name)),
        }
    }
}

impl<'a> Inspector<'a> for NumberInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn get_display_value(&self, level: usize) -> DisplayValue {
        match self.number() {
            Some(number) if self.unwrap_scalar => default_display_value(&number, level),
            _ => default_display_value(self.value, level),
        }
    }

    fn get_display_type(&self) -> String {
        let type_name = self.value.type_name();
        if type_name.module == "builtins" {
            type_name.name().to_string()
        } else {
            format!("{}.{}", type_name.module, type_name.name())
        }
    }

    fn is_mutable(&self) -> bool {
        false
    }

    fn get_kind(&self) -> Kind {
        Kind::Number
    }

    fn type_to_json(&self) -> Result<String> {
        match self.number() {
            Some(Value::Bool(_) | Value::Int(_)) => Ok("int".to_string()),
            Some(Value::Float(_)) => Ok("float".to_string()),
            Some(Value::Complex(_)) => Ok("complex".to_string()),
            _ => Err(InspectError::unsupported("type_to_json", self.get_type_info())),
        }
    }

    fn value_to_json(&self) -> Result<JsonData> {
        match self.number() {
            Some(Value::Bool(b)) => Ok(JsonData::from(i64::from(b))),
            Some(Value::Int(n)) => Ok(JsonData::from(n)),
            Some(Value::Float(x)) => Ok(float_to_json(x)),
            Some(Value::Complex(c)) => Ok(JsonData::from(c.to_string())),
            _ => Err(InspectError::unsupported("value_to_json", self.get_type_info())),
        }
    }
}

pub struct StringInspector<'a> {
    value: &'a Value,
}

impl<'a> StringInspector<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn value_from_json(_type_name: &str, data: &JsonData) -> Result<Value> {
        match data {
            JsonData::String(text) => Ok(Value::str(text)),
            other => Err(InspectError::malformed(format!(
                "Expected data to be str, got {other}"
            ))),
        }
    }
}

impl<'a> Inspector<'a> for StringInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn is_mutable(&self) -> bool {
        false
    }

    fn get_display_value(&self, level: usize) -> DisplayValue {
        match self.value {
            Value::Str(s) => string_display_value(s, level),
            _ => default_display_value(self.value, level),
        }
    }

    fn get_display_type(&self) -> String {
        self.value.type_name().name().to_string()
    }

    fn get_kind(&self) -> Kind {
        Kind::String
    }

    fn has_children(&self) -> bool {
        false
    }

    fn value_to_json(&self) -> Result<JsonData> {
        match self.value {
            Value::Str(s) => Ok(JsonData::from(&**s)),
            _ => Err(InspectError::unsupported("value_to_json", self.get_type_info())),
        }
    }
}
