use serde_json::Value as JsonData;
use spyglass_values::{Datetime, Value};

use super::Inspector;
use crate::{
    errors::{InspectError, Result},
    third_party,
};

/// `datetime.datetime` and library timestamps; both travel as ISO-8601 text.
pub struct TimestampInspector<'a> {
    value: &'a Value,
}

impl<'a> TimestampInspector<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    fn timestamp(&self) -> Option<Datetime> {
        match self.value {
            Value::Datetime(datetime) => Some(*datetime),
            Value::Host(host) => host.as_timestamp(),
            _ => None,
        }
    }

    fn isoformat_data(data: &JsonData) -> Result<&str> {
        data.as_str().ok_or_else(|| {
            InspectError::malformed(format!("Expected data to be str, got {data}"))
        })
    }

    pub fn datetime_from_json(_type_name: &str, data: &JsonData) -> Result<Value> {
        let text = Self::isoformat_data(data)?;
        Ok(Value::Datetime(Datetime::from_isoformat(text)?))
    }

    /// Decodes through the installed pandas binding.
    pub fn pandas_timestamp_from_json(_type_name: &str, data: &JsonData) -> Result<Value> {
        let text = Self::isoformat_data(data)?;
        Ok(third_party::pandas()?.timestamp_from_isoformat(text)?)
    }
}

impl<'a> Inspector<'a> for TimestampInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn is_mutable(&self) -> bool {
        false
    }

    fn value_to_json(&self) -> Result<JsonData> {
        match self.timestamp() {
            Some(timestamp) => Ok(JsonData::from(timestamp.isoformat())),
            None => Err(InspectError::unsupported("value_to_json", self.get_type_info())),
        }
    }
}
