//! Attribute bags: plain objects, classes, connections and query expressions.

use hashbrown::HashSet;
use lazy_static::lazy_static;
use serde_json::Value as JsonData;
use spyglass_values::{Class, ConnectionLike, HostError, Value};
use tracing::debug;

use super::Inspector;
use crate::{
    errors::{InspectError, Result},
    kind::Kind,
    qualname::get_qualname,
    truncate::{DisplayValue, maybe_truncate_string},
};

lazy_static! {
    /// Classes reachable by bare name.
    static ref BUILTIN_CLASSES: HashSet<&'static str> = HashSet::from([
        "bool", "bytearray", "bytes", "complex", "dict", "float", "frozenset", "int", "list",
        "memoryview", "object", "property", "range", "set", "str", "tuple", "type",
    ]);
}

/// All attribute names of `value`, sorted.
fn attribute_names(value: &Value) -> Vec<String> {
    let mut names = match value {
        Value::Object(object) => object.dir(),
        Value::Class(class) => class.attributes.iter().map(|(name, _)| name.clone()).collect(),
        Value::Host(host) => host.attributes(),
        _ => Vec::new(),
    };
    names.sort();
    names.dedup();
    names
}

fn public_attribute_names(value: &Value) -> impl Iterator<Item = String> {
    attribute_names(value)
        .into_iter()
        .filter(|name| !name.starts_with('_'))
}

fn get_attribute(value: &Value, name: &str) -> Result<Value, HostError> {
    let missing = || HostError::missing_attribute(value.type_name().qualified(), name);
    match value {
        Value::Object(object) => object.attribute(name).ok_or_else(missing),
        Value::Class(class) => class.attribute(name).cloned().ok_or_else(missing),
        Value::Host(host) => host.get_attribute(name),
        _ => Err(missing()),
    }
}

fn attribute_key(key: &Value) -> Result<&str> {
    key.as_str().ok_or_else(|| {
        HostError::InvalidValue(format!(
            "attribute name must be string, not '{}'",
            key.type_name().qualified()
        ))
        .into()
    })
}

/// Children of an attribute bag are its public attribute names.
trait AttributeChildren<'a>: Inspector<'a> {
    fn attribute_count(&self) -> usize {
        public_attribute_names(self.value()).count()
    }

    fn has_attribute(&self, key: &Value) -> bool {
        key.as_str()
            .is_some_and(|name| get_attribute(self.value(), name).is_ok())
    }

    fn attribute(&self, key: &Value) -> Result<Value> {
        Ok(get_attribute(self.value(), attribute_key(key)?)?)
    }

    fn attribute_keys(&self) -> Vec<Value> {
        public_attribute_names(self.value()).map(Value::from).collect()
    }
}

/// Instances of user classes and any other value with attributes.
pub struct ObjectInspector<'a> {
    value: &'a Value,
}

impl<'a> ObjectInspector<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }
}

impl<'a> AttributeChildren<'a> for ObjectInspector<'a> {}

impl<'a> Inspector<'a> for ObjectInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn get_length(&self) -> usize {
        self.attribute_count()
    }

    fn has_child(&self, key: &Value) -> bool {
        self.has_attribute(key)
    }

    fn get_child(&self, key: &Value) -> Result<Value> {
        self.attribute(key)
    }

    fn get_children(&self) -> Result<Vec<Value>> {
        Ok(self.attribute_keys())
    }
}

/// Classes, navigated through their class attributes.
pub struct ClassInspector<'a> {
    value: &'a Value,
}

impl<'a> ClassInspector<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// Locate a class from its `<class 'module.Name'>` text. Built-in classes
    /// are found by bare name; anything else is rebuilt from its dotted path.
    pub fn value_from_json(_type_name: &str, data: &JsonData) -> Result<Value> {
        let JsonData::String(text) = data else {
            return Err(InspectError::malformed(format!(
                "Expected data to be str, got {data}"
            )));
        };
        let path = text
            .strip_prefix("<class '")
            .and_then(|rest| rest.strip_suffix("'>"))
            .ok_or_else(|| InspectError::malformed(format!("Could not find class name in {text}")))?;

        match path.rsplit_once('.') {
            Some((module, qualname)) if !module.is_empty() && !qualname.is_empty() => {
                Ok(Value::class(Class::new(module, qualname)))
            }
            None if BUILTIN_CLASSES.contains(path) => Ok(Value::class(Class::builtin(path))),
            _ => Err(HostError::InvalidValue(format!("Could not locate a type named {text}")).into()),
        }
    }
}

impl<'a> AttributeChildren<'a> for ClassInspector<'a> {}

impl<'a> Inspector<'a> for ClassInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn get_kind(&self) -> Kind {
        Kind::Class
    }

    fn get_length(&self) -> usize {
        self.attribute_count()
    }

    fn has_child(&self, key: &Value) -> bool {
        self.has_attribute(key)
    }

    fn get_child(&self, key: &Value) -> Result<Value> {
        self.attribute(key)
    }

    fn get_children(&self) -> Result<Vec<Value>> {
        Ok(self.attribute_keys())
    }

    fn value_to_json(&self) -> Result<JsonData> {
        Ok(JsonData::from(self.value.repr()?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionFlavor {
    /// Live when a cursor can be acquired.
    Sqlite,
    /// Live when a connection can be acquired from the engine.
    SqlAlchemyEngine,
}

/// Database connections and engines.
pub struct ConnectionInspector<'a> {
    value: &'a Value,
    connection: &'a dyn ConnectionLike,
    flavor: ConnectionFlavor,
}

impl<'a> ConnectionInspector<'a> {
    pub fn new(value: &'a Value, flavor: ConnectionFlavor) -> Option<Self> {
        let connection = value.as_host()?.as_connection()?;
        Some(Self {
            value,
            connection,
            flavor,
        })
    }

    fn is_active(&self) -> bool {
        let probe = match self.flavor {
            ConnectionFlavor::Sqlite => self.connection.cursor(),
            ConnectionFlavor::SqlAlchemyEngine => self.connection.connect(),
        };
        probe
            .inspect_err(|err| debug!(error = %err, "connection is not active"))
            .is_ok()
    }
}

impl<'a> AttributeChildren<'a> for ConnectionInspector<'a> {}

impl<'a> Inspector<'a> for ConnectionInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn get_kind(&self) -> Kind {
        Kind::Connection
    }

    fn get_length(&self) -> usize {
        self.attribute_count()
    }

    fn has_child(&self, key: &Value) -> bool {
        self.has_attribute(key)
    }

    fn get_child(&self, key: &Value) -> Result<Value> {
        self.attribute(key)
    }

    fn get_children(&self) -> Result<Vec<Value>> {
        Ok(self.attribute_keys())
    }

    fn has_viewer(&self) -> bool {
        self.is_active()
    }

    fn is_mutable(&self) -> bool {
        true
    }

    fn deepcopy(&self) -> Result<Value> {
        Err(InspectError::CopyRefused {
            type_name: self.get_type_info(),
        })
    }
}

/// Nodes of a lazily evaluated query expression.
pub struct IbisExprInspector<'a> {
    value: &'a Value,
}

impl<'a> IbisExprInspector<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }
}

impl<'a> Inspector<'a> for IbisExprInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn has_children(&self) -> bool {
        false
    }

    fn get_length(&self) -> usize {
        0
    }

    fn is_mutable(&self) -> bool {
        false
    }

    fn get_display_value(&self, level: usize) -> DisplayValue {
        DisplayValue::new(maybe_truncate_string(&get_qualname(self.value), level).text, true)
    }

    fn get_display_type(&self) -> String {
        "ibis.Expr".to_string()
    }

    fn to_html(&self) -> Result<String> {
        Ok(get_qualname(self.value))
    }

    fn to_plaintext(&self) -> Result<String> {
        Ok(get_qualname(self.value))
    }
}
