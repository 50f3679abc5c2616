//! Value classification.

use core::fmt;

use spyglass_values::{Protocols, Value};

/// Coarse category of a value, as shown by a variable explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Boolean,
    Number,
    Bytes,
    Map,
    Collection,
    Function,
    Class,
    Property,
    Other,
    Empty,
    Table,
    Connection,
}

impl Kind {
    pub const ALL: [Kind; 13] = [
        Kind::String,
        Kind::Boolean,
        Kind::Number,
        Kind::Bytes,
        Kind::Map,
        Kind::Collection,
        Kind::Function,
        Kind::Class,
        Kind::Property,
        Kind::Other,
        Kind::Empty,
        Kind::Table,
        Kind::Connection,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::Bytes => "bytes",
            Kind::Map => "map",
            Kind::Collection => "collection",
            Kind::Function => "function",
            Kind::Class => "class",
            Kind::Property => "property",
            Kind::Other => "other",
            Kind::Empty => "empty",
            Kind::Table => "table",
            Kind::Connection => "connection",
        }
    }

    pub fn from_name(name: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a value. The first matching rule wins: strings, booleans, other
/// numbers, mappings, raw byte buffers, sequences and sets, functions,
/// classes; anything else is `other`, and `None` is `empty`.
///
/// Never yields [`Kind::Property`], [`Kind::Table`] or [`Kind::Connection`];
/// those come from specialized inspectors.
pub fn get_kind(value: &Value) -> Kind {
    match value {
        Value::Str(_) => Kind::String,
        Value::Bool(_) => Kind::Boolean,
        Value::Int(_) | Value::Float(_) | Value::Complex(_) => Kind::Number,
        Value::Dict(_) => Kind::Map,
        Value::Bytes(_) | Value::ByteArray(_) | Value::MemoryView(_) => Kind::Bytes,
        Value::List(_)
        | Value::Tuple(_)
        | Value::Set(_)
        | Value::FrozenSet(_)
        | Value::Range(_) => Kind::Collection,
        Value::Function(_) => Kind::Function,
        Value::Class(_) => Kind::Class,
        Value::None => Kind::Empty,
        Value::Datetime(_) | Value::Property(_) | Value::Object(_) => Kind::Other,
        Value::Host(host) => {
            let protocols = host.protocols();
            if protocols.contains(Protocols::NUMBER) {
                Kind::Number
            } else if protocols.contains(Protocols::MAPPING) {
                Kind::Map
            } else if protocols.intersects(Protocols::SEQUENCE | Protocols::SET) {
                Kind::Collection
            } else if protocols.contains(Protocols::FUNCTION) {
                Kind::Function
            } else {
                Kind::Other
            }
        }
    }
}
