//! Spyglass - value inspection for a REPL variable explorer
//!
//! # Overview
//!
//! Spyglass turns arbitrary host values into what a variable explorer shows:
//! a bounded preview, a type label, a kind used to group variables, a size
//! estimate, and children to navigate into. It also compares and copies
//! values so the explorer can detect changes between REPL steps, and
//! serializes a small set of scalar types into access keys.
//!
//! # Quick Start
//!
//! ```
//! use spyglass::{Kind, Value, get_inspector};
//!
//! let value = Value::dict([
//!     (Value::str("a"), Value::list([Value::Int(1), Value::Int(2), Value::Int(3)])),
//!     (Value::str("b"), Value::str("hello")),
//! ]);
//!
//! let inspector = get_inspector(&value);
//! assert_eq!(inspector.get_kind(), Kind::Map);
//! assert_eq!(inspector.get_display_type(), "dict [2]");
//! assert_eq!(inspector.get_display_value(0).text, "{'a': [1, 2, 3], 'b': 'hello'}");
//! ```
//!
//! # Access keys
//!
//! Children that the front end must address again later are named by access
//! keys:
//!
//! ```
//! use spyglass::{Value, decode_access_key, encode_access_key};
//!
//! let key = encode_access_key(&Value::str("radius")).unwrap();
//! assert_eq!(key, r#"{"type":"str","data":"radius"}"#);
//! assert!(matches!(decode_access_key(&key).unwrap(), Value::Str(s) if &*s == "radius"));
//! ```

pub mod access_keys;

pub use access_keys::{AccessKeyError, decode_access_key, encode_access_key};

// Re-export the inspection API from spyglass_core
pub use spyglass_core::{
    BoxedInspector, DisplayValue, InspectError, Inspector, InspectorClass, JsonPayload, Kind,
    get_inspector, get_kind, lookup_inspector_class, options, third_party,
};

// Re-export the host value model
pub use spyglass_values::{self as values, HostError, HostObject, Value};
