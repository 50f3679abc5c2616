use serde_json::{Value as JsonData, json};
use spyglass_values::{HostError, Protocols, Value};
use tracing::debug;

use super::{Inspector, index_keys, is_index_below, position};
use crate::{
    errors::{InspectError, Result},
    json::int_field,
    kind::Kind,
    truncate::{DisplayValue, collection_display_value, default_display_value},
};

/// Sequences and sets: lists, tuples, sets, ranges and host sequences.
pub struct CollectionInspector<'a> {
    value: &'a Value,
}

impl<'a> CollectionInspector<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    fn is_set(&self) -> bool {
        match self.value {
            Value::Set(_) | Value::FrozenSet(_) => true,
            Value::Host(host) => {
                let protocols = host.protocols();
                protocols.contains(Protocols::SET) && !protocols.contains(Protocols::SEQUENCE)
            }
            _ => false,
        }
    }

    /// Ranges are implied by their bounds and sets are not subscriptable, so
    /// neither exposes its elements as children.
    fn is_navigable(&self) -> bool {
        !matches!(self.value, Value::Range(_)) && !self.is_set()
    }

    pub fn value_from_json(type_name: &str, data: &JsonData) -> Result<Value> {
        if type_name != "range" {
            return Err(InspectError::unsupported("value_from_json", type_name));
        }
        if !data.is_object() {
            return Err(InspectError::malformed(format!(
                "Expected data to be dict, got {data}"
            )));
        }
        let start = int_field(data, "start")?;
        let stop = int_field(data, "stop")?;
        let step = int_field(data, "step")?;
        Ok(Value::range(start, stop, step)?)
    }
}

impl<'a> Inspector<'a> for CollectionInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn get_kind(&self) -> Kind {
        Kind::Collection
    }

    fn get_display_type(&self) -> String {
        let type_name = self.value.type_name();
        let name = type_name.name();
        let length = self.get_length();
        if self.is_set() {
            format!("{name} {{{length}}}")
        } else if matches!(self.value, Value::Tuple(_)) {
            format!("{name} ({length})")
        } else {
            format!("{name} [{length}]")
        }
    }

    fn get_display_value(&self, level: usize) -> DisplayValue {
        let value = self.value;
        match value {
            Value::List(items) => {
                let items = items.borrow();
                collection_display_value(value, items.iter().cloned(), items.len(), "[", "]", level)
            }
            Value::Tuple(items) => {
                collection_display_value(value, items.iter().cloned(), items.len(), "(", ")", level)
            }
            Value::Set(items) => {
                let items = items.borrow();
                let (prefix, suffix) = if items.is_empty() { ("set(", ")") } else { ("{", "}") };
                collection_display_value(value, items.iter().cloned(), items.len(), prefix, suffix, level)
            }
            Value::FrozenSet(items) => {
                let (prefix, suffix) = if items.is_empty() {
                    ("frozenset(", ")")
                } else {
                    ("{", "}")
                };
                collection_display_value(value, items.iter().cloned(), items.len(), prefix, suffix, level)
            }
            Value::Host(host) => match host.items() {
                Ok(items) => {
                    let (prefix, suffix) = if self.is_set() { ("{", "}") } else { ("[", "]") };
                    let len = items.len();
                    collection_display_value(value, items, len, prefix, suffix, level)
                }
                Err(err) => {
                    debug!(error = %err, "host sequence is not iterable");
                    default_display_value(value, level)
                }
            },
            _ => default_display_value(value, level),
        }
    }

    fn has_children(&self) -> bool {
        self.is_navigable() && self.get_length() > 0
    }

    fn has_child(&self, key: &Value) -> bool {
        is_index_below(key, self.get_length())
    }

    fn get_child(&self, key: &Value) -> Result<Value> {
        if !self.is_navigable() {
            return Err(InspectError::unsupported("get_child", self.get_type_info()));
        }
        let out_of_range = || {
            let index = match key {
                Value::Int(index) => *index,
                _ => -1,
            };
            HostError::Index {
                type_name: self.value.type_name().qualified(),
                index,
            }
        };
        match self.value {
            Value::List(items) => {
                let items = items.borrow();
                let index = position(key, items.len()).ok_or_else(out_of_range)?;
                Ok(items[index].clone())
            }
            Value::Tuple(items) => {
                let index = position(key, items.len()).ok_or_else(out_of_range)?;
                Ok(items[index].clone())
            }
            Value::Host(host) => Ok(host.get_item(key)?),
            _ => Err(InspectError::unsupported("get_child", self.get_type_info())),
        }
    }

    fn get_children(&self) -> Result<Vec<Value>> {
        Ok(index_keys(self.get_length()))
    }

    fn get_comparison_cost(&self) -> usize {
        self.get_length()
    }

    fn is_mutable(&self) -> bool {
        match self.value {
            Value::List(_) | Value::Set(_) => true,
            Value::Host(host) => host.protocols().contains(Protocols::MUTABLE),
            _ => false,
        }
    }

    fn value_to_json(&self) -> Result<JsonData> {
        match self.value {
            Value::Range(range) => Ok(json!({
                "start": range.start,
                "stop": range.stop,
                "step": range.step,
            })),
            _ => Err(InspectError::unsupported("value_to_json", self.get_type_info())),
        }
    }
}
