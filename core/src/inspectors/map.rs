use spyglass_values::{HostError, Protocols, Value};
use tracing::debug;

use super::Inspector;
use crate::{
    errors::Result,
    kind::Kind,
    truncate::{DisplayValue, default_display_value, map_display_value},
};

/// Dicts and host mappings.
pub struct MapInspector<'a> {
    value: &'a Value,
}

impl<'a> MapInspector<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    fn keys(&self) -> Result<Vec<Value>, HostError> {
        match self.value {
            Value::Dict(pairs) => Ok(pairs.borrow().iter().map(|(key, _)| key.clone()).collect()),
            Value::Host(host) => host.items(),
            _ => Ok(Vec::new()),
        }
    }

    fn lookup(value: &Value, key: &Value) -> Result<Value, HostError> {
        match value {
            Value::Dict(pairs) => {
                for (existing, item) in pairs.borrow().iter() {
                    if existing.try_eq(key)? {
                        return Ok(item.clone());
                    }
                }
                Err(HostError::Key {
                    key: key.repr().unwrap_or_else(|_| key.type_name().qualified()),
                })
            }
            Value::Host(host) => host.get_item(key),
            _ => Err(HostError::NotSubscriptable {
                type_name: value.type_name().qualified(),
            }),
        }
    }
}

impl<'a> Inspector<'a> for MapInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn get_kind(&self) -> Kind {
        Kind::Map
    }

    fn get_size(&self) -> usize {
        self.get_length()
    }

    fn get_display_value(&self, level: usize) -> DisplayValue {
        // Dict values come straight from their pairs: a key that is not equal
        // to itself (NaN) could never be looked up again.
        if let Value::Dict(pairs) = self.value {
            let entries: Vec<_> = pairs
                .borrow()
                .iter()
                .map(|(key, item)| (key.clone(), Ok::<_, HostError>(item.clone())))
                .collect();
            let len = entries.len();
            return map_display_value(self.value, entries, len, level);
        }
        match self.keys() {
            Ok(keys) => {
                let len = keys.len();
                let value = self.value;
                let entries = keys.into_iter().map(|key| {
                    let item = Self::lookup(value, &key);
                    (key, item)
                });
                map_display_value(value, entries, len, level)
            }
            Err(err) => {
                debug!(error = %err, "mapping keys are not iterable");
                default_display_value(self.value, level)
            }
        }
    }

    fn has_child(&self, key: &Value) -> bool {
        self.keys()
            .map(|keys| keys.iter().any(|existing| existing.try_eq(key).unwrap_or(false)))
            .unwrap_or(false)
    }

    fn get_child(&self, key: &Value) -> Result<Value> {
        Ok(Self::lookup(self.value, key)?)
    }

    fn get_children(&self) -> Result<Vec<Value>> {
        Ok(self.keys()?)
    }

    fn is_mutable(&self) -> bool {
        match self.value {
            Value::Dict(_) => true,
            Value::Host(host) => host.protocols().contains(Protocols::MUTABLE),
            _ => false,
        }
    }
}
