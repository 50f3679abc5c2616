use spyglass_values::{ArrayLike, HostError, Value};
use tracing::{debug, warn};

use super::{Inspector, index_keys, is_index_below, position};
use crate::{
    errors::{InspectError, Result},
    kind::Kind,
    options::{ArrayPrintOptions, ELLIPSIS, MAX_ITEMS_BY_LEVEL},
    third_party,
    truncate::{DisplayValue, default_display_value},
};

/// Fallback element size when the library does not report one.
const DEFAULT_ITEMSIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayFlavor {
    Numpy,
    Torch,
}

/// N-dimensional numeric arrays and tensors.
pub struct ArrayInspector<'a> {
    value: &'a Value,
    array: &'a dyn ArrayLike,
    flavor: ArrayFlavor,
}

impl<'a> ArrayInspector<'a> {
    /// `None` when the value does not expose an array view.
    pub fn new(value: &'a Value, flavor: ArrayFlavor) -> Option<Self> {
        let array = value.as_host()?.as_array()?;
        Some(Self {
            value,
            array,
            flavor,
        })
    }

    /// Number of cells; zero for 0-d arrays.
    fn num_cells(&self) -> usize {
        if self.array.ndim() == 0 {
            return 0;
        }
        self.array.shape().iter().product()
    }

    fn library_display(&self) -> Result<String> {
        let options = ArrayPrintOptions::default();
        match self.flavor {
            ArrayFlavor::Numpy => Ok(third_party::numpy()?.array2string(self.value, &options)?),
            ArrayFlavor::Torch => {
                let text = third_party::torch()?.tensor_str(self.value, &options)?;
                Ok(text
                    .strip_prefix("tensor(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .map(str::to_string)
                    .unwrap_or(text))
            }
        }
    }

    fn library_equals(&self, other: &Value) -> Result<bool> {
        match self.flavor {
            ArrayFlavor::Numpy => Ok(third_party::numpy()?.array_equal(self.value, other)?),
            ArrayFlavor::Torch => Ok(third_party::torch()?.equal(self.value, other)?),
        }
    }
}

impl<'a> Inspector<'a> for ArrayInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn get_kind(&self) -> Kind {
        if self.array.ndim() > 0 {
            Kind::Collection
        } else {
            Kind::Number
        }
    }

    fn get_display_type(&self) -> String {
        let shape = self.array.shape();
        let mut display_type = self.array.dtype();
        match shape.as_slice() {
            [] => {}
            [length] => display_type = format!("{display_type} ({length})"),
            dims => {
                let dims: Vec<String> = dims.iter().map(ToString::to_string).collect();
                display_type = format!("{display_type} ({})", dims.join(", "));
            }
        }

        // Distinguishes arrays of different libraries with the same dtype.
        let module = self.value.type_name().module;
        if !display_type.starts_with(&module) {
            display_type = format!("{module}.{display_type}");
        }
        display_type
    }

    fn get_display_value(&self, level: usize) -> DisplayValue {
        if level >= MAX_ITEMS_BY_LEVEL.len() {
            let elided = match self.flavor {
                ArrayFlavor::Numpy => format!("numpy.array({ELLIPSIS})"),
                ArrayFlavor::Torch => format!("torch.Tensor({ELLIPSIS})"),
            };
            return DisplayValue::new(elided, true);
        }
        match self.library_display() {
            Ok(text) => DisplayValue::new(text, true),
            Err(err) => {
                warn!(error = %err, "array formatting failed");
                default_display_value(self.value, level)
            }
        }
    }

    fn get_length(&self) -> usize {
        self.array.shape().first().copied().unwrap_or(0)
    }

    fn get_size(&self) -> usize {
        let itemsize = self.array.itemsize().unwrap_or(DEFAULT_ITEMSIZE);
        match self.flavor {
            ArrayFlavor::Torch if self.array.ndim() == 0 => itemsize,
            _ => self.num_cells() * itemsize,
        }
    }

    fn has_child(&self, key: &Value) -> bool {
        is_index_below(key, self.get_length())
    }

    fn get_child(&self, key: &Value) -> Result<Value> {
        let index = position(key, self.get_length()).ok_or_else(|| HostError::Index {
            type_name: self.get_type_info(),
            index: match key {
                Value::Int(index) => *index,
                _ => -1,
            },
        })?;
        Ok(self.array.get(index)?)
    }

    fn get_children(&self) -> Result<Vec<Value>> {
        Ok(index_keys(self.get_length()))
    }

    fn get_comparison_cost(&self) -> usize {
        self.num_cells()
    }

    fn is_mutable(&self) -> bool {
        true
    }

    fn equals(&self, other: &Value) -> bool {
        self.library_equals(other).unwrap_or_else(|err| {
            debug!(error = %err, "array comparison failed");
            false
        })
    }

    fn deepcopy(&self) -> Result<Value> {
        match self.flavor {
            ArrayFlavor::Numpy => Ok(self.array.copy()?),
            ArrayFlavor::Torch => {
                // Detach first so the copy carries no autodiff graph edges.
                let detached = self.array.detach()?;
                let array = detached
                    .as_host()
                    .and_then(|host| host.as_array())
                    .ok_or_else(|| InspectError::unsupported("deepcopy", self.get_type_info()))?;
                Ok(array.copy()?)
            }
        }
    }
}
