//! Inspection and serialization of host values for a variable explorer.
//!
//! [`get_inspector`] picks an [`Inspector`] for any [`Value`]: by the value's
//! simplified qualified type name when a specialized inspector is registered
//! for it, otherwise by its [`Kind`]. Inspectors render size-bounded previews
//! (see [`truncate`]), expose children for navigation, compare and copy
//! values, and convert a subset of them to and from JSON payloads.
//!
//! ```
//! use spyglass_core::get_inspector;
//! use spyglass_values::Value;
//!
//! let value = Value::list([Value::Int(1), Value::str("two")]);
//! let inspector = get_inspector(&value);
//! assert_eq!(inspector.get_display_value(0).text, "[1, 'two']");
//! assert_eq!(inspector.get_display_type(), "list [2]");
//! ```

pub mod errors;
pub mod inspectors;
pub mod json;
pub mod kind;
pub mod options;
pub mod qualname;
pub mod registry;
pub mod third_party;
pub mod truncate;

pub use errors::{InspectError, Result};
pub use inspectors::{BoxedInspector, Inspector};
pub use json::JsonPayload;
pub use kind::{Kind, get_kind};
pub use registry::{InspectorClass, get_inspector, lookup_inspector_class};
pub use truncate::DisplayValue;

pub use spyglass_values::Value;

#[cfg(test)]
mod json_test;
#[cfg(test)]
mod qualname_test;
#[cfg(test)]
mod truncate_test;
