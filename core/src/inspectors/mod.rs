//! The inspector family.
//!
//! An [`Inspector`] wraps one borrowed [`Value`] and answers everything a
//! variable explorer asks about it: how to display it, what kind it is,
//! whether and how to navigate into it, how to compare and copy it, and how to
//! serialize it. The trait's provided methods are the generic behavior; each
//! variant overrides what differs for its types.

use serde_json::Value as JsonData;
use spyglass_values::Value;
use tracing::debug;

use crate::{
    errors::{InspectError, Result},
    json::JsonPayload,
    kind::{Kind, get_kind},
    qualname::type_qualname,
    truncate::{DisplayValue, NO_REPR_AVAILABLE, default_display_value},
};

mod array;
mod collection;
mod map;
mod object;
mod scalar;
mod table;
mod timestamp;

pub use array::{ArrayFlavor, ArrayInspector};
pub use collection::CollectionInspector;
pub use map::MapInspector;
pub use object::{ConnectionFlavor, ConnectionInspector, IbisExprInspector, ObjectInspector};
pub use scalar::{
    BooleanInspector, BytesInspector, FunctionInspector, NoneInspector, NumberInspector,
    PropertyInspector, StringInspector,
};
pub use table::{ColumnFlavor, ColumnInspector, TableFlavor, TableInspector};
pub use timestamp::TimestampInspector;

pub(crate) use object::ClassInspector;

/// A boxed inspector borrowing its value for `'a`.
pub type BoxedInspector<'a> = Box<dyn Inspector<'a> + 'a>;

/// Read-only view of a value for a variable explorer.
pub trait Inspector<'a> {
    /// The inspected value.
    fn value(&self) -> &'a Value;

    /// Label for the child at `key`.
    fn get_display_name(&self, key: &Value) -> String {
        key.to_str()
            .or_else(|_| key.raw_repr())
            .unwrap_or_else(|_| NO_REPR_AVAILABLE.to_string())
    }

    /// Preview text, bounded by the budget of nesting `level`.
    fn get_display_value(&self, level: usize) -> DisplayValue {
        default_display_value(self.value(), level)
    }

    /// Short type label, with the length for sized values.
    fn get_display_type(&self) -> String {
        let type_name = self.value().type_name();
        let name = type_name.name();
        if self.value().len().is_some() {
            format!("{name} [{}]", self.get_length())
        } else {
            name.to_string()
        }
    }

    fn get_kind(&self) -> Kind {
        get_kind(self.value())
    }

    /// Fully qualified name of the value's type.
    fn get_type_info(&self) -> String {
        type_qualname(self.value())
    }

    fn get_length(&self) -> usize {
        self.value().len().unwrap_or(0)
    }

    /// Shallow size estimate in bytes.
    fn get_size(&self) -> usize {
        self.value().shallow_size()
    }

    fn has_children(&self) -> bool {
        self.get_length() > 0
    }

    fn has_child(&self, _key: &Value) -> bool {
        false
    }

    fn get_child(&self, _key: &Value) -> Result<Value> {
        Err(InspectError::unsupported("get_child", self.get_type_info()))
    }

    /// Keys of the value's children.
    fn get_children(&self) -> Result<Vec<Value>> {
        Err(InspectError::unsupported("get_children", self.get_type_info()))
    }

    fn has_viewer(&self) -> bool {
        false
    }

    /// Without more information a value is assumed mutable, which also
    /// disables [`Inspector::deepcopy`].
    fn is_mutable(&self) -> bool {
        true
    }

    /// Relative cost of [`Inspector::equals`].
    fn get_comparison_cost(&self) -> usize {
        self.get_size()
    }

    /// Value equality with `other`. Comparison failures count as unequal.
    fn equals(&self, other: &Value) -> bool {
        self.value().try_eq(other).unwrap_or_else(|err| {
            debug!(error = %err, "comparison failed");
            false
        })
    }

    /// A copy that shares nothing mutable with the original. Immutable values
    /// are their own copy; mutable ones need a type-specific strategy.
    fn deepcopy(&self) -> Result<Value> {
        if self.is_mutable() {
            return Err(InspectError::CopyRefused {
                type_name: self.get_type_info(),
            });
        }
        Ok(self.value().clone())
    }

    fn to_html(&self) -> Result<String> {
        Ok(self.value().repr()?)
    }

    fn to_plaintext(&self) -> Result<String> {
        Ok(self.value().repr()?)
    }

    fn to_json(&self) -> Result<JsonPayload> {
        Ok(JsonPayload::new(self.type_to_json()?, self.value_to_json()?))
    }

    fn type_to_json(&self) -> Result<String> {
        Ok(self.get_type_info())
    }

    fn value_to_json(&self) -> Result<JsonData> {
        Err(InspectError::unsupported("value_to_json", self.get_type_info()))
    }
}

/// The generic inspector, for values no specialized inspector claims.
pub struct DefaultInspector<'a> {
    value: &'a Value,
}

impl<'a> DefaultInspector<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }
}

impl<'a> Inspector<'a> for DefaultInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }
}

/// Child keys `0..len`.
pub(crate) fn index_keys(len: usize) -> Vec<Value> {
    (0..len)
        .map(|i| Value::Int(i64::try_from(i).unwrap_or(i64::MAX)))
        .collect()
}

/// `key` as a position within `len` elements, counting negative keys from
/// the end.
pub(crate) fn position(key: &Value, len: usize) -> Option<usize> {
    let Value::Int(index) = *key else {
        return None;
    };
    let len = i64::try_from(len).ok()?;
    let index = if index < 0 { index + len } else { index };
    if (0..len).contains(&index) {
        usize::try_from(index).ok()
    } else {
        None
    }
}

/// Whether `key` is a valid child index: any integer below the length.
pub(crate) fn is_index_below(key: &Value, len: usize) -> bool {
    match key {
        Value::Int(index) => i128::from(*index) < len as i128,
        _ => false,
    }
}
