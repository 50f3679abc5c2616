//! Capability traits for third-party host objects.
//!
//! A host object is anything the runtime cannot describe with the built-in
//! [`Value`] variants: numeric arrays, data frames, database connections, query
//! expressions. Each one implements [`HostObject`] and opts into the narrow
//! capability views (`as_array`, `as_frame`, ...) that apply to it. Nothing in
//! this crate depends on the libraries themselves.

use core::fmt;

use bitflags::bitflags;

use crate::{Datetime, HostError, TypeName, Value};

bitflags! {
    /// Abstract protocols a host object implements.
    ///
    /// The kind classifier consults these for objects it cannot recognize
    /// structurally, in the same priority order as for built-in values.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct Protocols: u16 {
        /// Behaves as a number (including 0-d numeric scalars).
        const NUMBER = 1 << 0;
        /// Key/value mapping.
        const MAPPING = 1 << 1;
        /// Ordered sequence.
        const SEQUENCE = 1 << 2;
        /// Unordered set.
        const SET = 1 << 3;
        /// Plain function or bound method.
        const FUNCTION = 1 << 4;
        /// Supports in-place mutation of its elements.
        const MUTABLE = 1 << 5;
    }
}

/// A third-party object living in the host runtime.
pub trait HostObject: fmt::Debug {
    /// Module and qualified name of the object's type.
    fn type_name(&self) -> TypeName;

    /// The object's own textual representation. May fail.
    fn repr(&self) -> Result<String, HostError>;

    /// Low-level representation that bypasses any user-defined repr.
    fn raw_repr(&self) -> Result<String, HostError> {
        Ok(format!("<{} object>", self.type_name().qualified()))
    }

    fn protocols(&self) -> Protocols {
        Protocols::empty()
    }

    /// Element count, for sized objects.
    fn length(&self) -> Option<usize> {
        None
    }

    /// Shallow size estimate in bytes.
    fn size_hint(&self) -> usize {
        0
    }

    /// Value equality against an arbitrary value. May fail, e.g. when an
    /// elementwise comparison has no single truth value.
    fn equals(&self, _other: &Value) -> Result<bool, HostError> {
        Ok(false)
    }

    /// Elements of a sequence or set, or keys of a mapping.
    fn items(&self) -> Result<Vec<Value>, HostError> {
        Err(HostError::NotIterable {
            type_name: self.type_name().qualified(),
        })
    }

    /// `self[key]`.
    fn get_item(&self, _key: &Value) -> Result<Value, HostError> {
        Err(HostError::NotSubscriptable {
            type_name: self.type_name().qualified(),
        })
    }

    /// Public and private attribute names, unsorted.
    fn attributes(&self) -> Vec<String> {
        Vec::new()
    }

    fn get_attribute(&self, name: &str) -> Result<Value, HostError> {
        Err(HostError::missing_attribute(self.type_name().qualified(), name))
    }

    /// The built-in number behind a library scalar (`.item()`).
    fn as_scalar(&self) -> Option<Value> {
        None
    }

    fn as_timestamp(&self) -> Option<Datetime> {
        None
    }

    fn as_array(&self) -> Option<&dyn ArrayLike> {
        None
    }

    fn as_column(&self) -> Option<&dyn ColumnLike> {
        None
    }

    fn as_frame(&self) -> Option<&dyn FrameLike> {
        None
    }

    fn as_connection(&self) -> Option<&dyn ConnectionLike> {
        None
    }

    /// Whether the object is a node of a lazily-evaluated query expression tree.
    fn is_expression(&self) -> bool {
        false
    }
}

/// An n-dimensional numeric array or tensor.
pub trait ArrayLike {
    /// Element type, as the library prints it (`int64`, `torch.float32`).
    fn dtype(&self) -> String;

    fn shape(&self) -> Vec<usize>;

    fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Bytes per element, when the library exposes it.
    fn itemsize(&self) -> Option<usize>;

    /// `self[index]` along the first axis.
    fn get(&self, index: usize) -> Result<Value, HostError>;

    /// `.copy()` / `.clone()`.
    fn copy(&self) -> Result<Value, HostError>;

    /// `.detach()`: the same data without autodiff graph edges.
    fn detach(&self) -> Result<Value, HostError> {
        Err(HostError::missing_attribute("array", "detach"))
    }
}

/// A one-dimensional labelled column: a series or an index.
pub trait ColumnLike {
    fn dtype(&self) -> String;

    fn itemsize(&self) -> Option<usize>;

    /// Values in positional order.
    fn values(&self) -> Result<Vec<Value>, HostError>;

    /// Positional access (`.iloc[position]`).
    fn iloc(&self, position: usize) -> Result<Value, HostError>;

    /// Index label at `position`.
    fn label(&self, position: usize) -> Result<Value, HostError> {
        i64::try_from(position)
            .map(Value::Int)
            .map_err(|_| HostError::InvalidValue(format!("position {position} out of range")))
    }

    /// Whether this is a lazily materialized integer range index.
    fn is_range(&self) -> bool {
        false
    }

    /// `.equals(other)`. Older library versions lack it and report
    /// [`HostError::MissingAttribute`].
    fn equals(&self, other: &Value) -> Result<bool, HostError>;

    /// The pre-`equals` comparison method of older library versions.
    fn legacy_equals(&self, _other: &Value) -> Result<bool, HostError> {
        Err(HostError::missing_attribute("series", "series_equal"))
    }

    fn deep_copy(&self) -> Result<Value, HostError>;

    /// CSV export with the given field separator.
    fn to_csv(&self, separator: char) -> Result<String, HostError>;
}

/// A two-dimensional table of named columns.
pub trait FrameLike {
    /// `(rows, columns)`.
    fn shape(&self) -> (usize, usize);

    fn column_labels(&self) -> Vec<Value>;

    /// Column by position (`.iloc[:, position]`).
    fn column_at(&self, position: usize) -> Result<Value, HostError>;

    /// Column by label (`self[label]`).
    fn column(&self, label: &Value) -> Result<Value, HostError>;

    fn equals(&self, other: &Value) -> Result<bool, HostError>;

    /// The pre-`equals` comparison method of older library versions.
    fn legacy_equals(&self, _other: &Value) -> Result<bool, HostError> {
        Err(HostError::missing_attribute("frame", "frame_equal"))
    }

    fn deep_copy(&self) -> Result<Value, HostError>;

    fn to_csv(&self, separator: char) -> Result<String, HostError>;

    fn to_html(&self) -> Result<String, HostError>;
}

/// A database handle whose liveness can be probed cheaply.
pub trait ConnectionLike {
    /// Acquire (and drop) a cursor.
    fn cursor(&self) -> Result<(), HostError> {
        Err(HostError::missing_attribute("connection", "cursor"))
    }

    /// Acquire (and drop) a connection from a pool or engine.
    fn connect(&self) -> Result<(), HostError> {
        Err(HostError::missing_attribute("connection", "connect"))
    }
}
