//! Errors raised by host values and host objects.

use thiserror::Error;

/// Failure reported by a host operation (repr, indexing, comparison, ...).
///
/// These mirror the exceptions a dynamic runtime would raise. Inspectors decide
/// per call site whether to propagate them or to degrade gracefully.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The object has no attribute (or method) of that name.
    #[error("'{type_name}' object has no attribute '{name}'")]
    MissingAttribute { type_name: String, name: String },

    /// The truth value of an elementwise comparison is ambiguous.
    #[error("the truth value of {type_name} is ambiguous")]
    Ambiguous { type_name: String },

    /// Index out of range for a sequence.
    #[error("{type_name} index {index} out of range")]
    Index { type_name: String, index: i64 },

    /// Key not present in a mapping.
    #[error("key not found: {key}")]
    Key { key: String },

    /// The object does not support item access.
    #[error("'{type_name}' object is not subscriptable")]
    NotSubscriptable { type_name: String },

    /// The object does not support iteration.
    #[error("'{type_name}' object is not iterable")]
    NotIterable { type_name: String },

    /// An argument had the right type but an invalid value.
    #[error("{0}")]
    InvalidValue(String),

    /// Comparison or repr recursed too deeply (e.g. two distinct cyclic values).
    #[error("maximum recursion depth exceeded")]
    RecursionLimit,

    /// Any other failure raised by the host.
    #[error("{0}")]
    Failed(String),
}

impl HostError {
    pub fn missing_attribute(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        HostError::MissingAttribute {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}
