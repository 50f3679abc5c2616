//! Tabular data: labelled columns and the frames built from them.

use spyglass_values::{ColumnLike, FrameLike, HostError, Value};
use tracing::debug;

use super::{Inspector, index_keys, position};
use crate::{
    errors::Result,
    kind::Kind,
    qualname::simplified_qualname,
    third_party::{POLARS_FRAME_EQUALS, POLARS_SERIES_EQUALS},
    truncate::{DisplayValue, collection_display_value, default_display_value, maybe_truncate_string},
};

/// Conservative element size for dtypes that do not report one.
const DEFAULT_ITEMSIZE: usize = 8;

fn position_error(key: &Value, type_name: String) -> HostError {
    HostError::Index {
        type_name,
        index: match key {
            Value::Int(index) => *index,
            _ => -1,
        },
    }
}

fn is_position(key: &Value, len: usize) -> bool {
    matches!(key, Value::Int(index) if *index >= 0) && position(key, len).is_some()
}

fn compare(result: Result<bool, HostError>) -> bool {
    result.unwrap_or_else(|err| {
        debug!(error = %err, "column comparison failed");
        false
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFlavor {
    PandasSeries,
    PandasIndex,
    PolarsSeries,
}

/// Series and indexes, navigated by position.
pub struct ColumnInspector<'a> {
    value: &'a Value,
    column: &'a dyn ColumnLike,
    flavor: ColumnFlavor,
}

impl<'a> ColumnInspector<'a> {
    /// `None` when the value does not expose a column view.
    pub fn new(value: &'a Value, flavor: ColumnFlavor) -> Option<Self> {
        let column = value.as_host()?.as_column()?;
        Some(Self {
            value,
            column,
            flavor,
        })
    }

    fn is_range_index(&self) -> bool {
        self.flavor == ColumnFlavor::PandasIndex && self.column.is_range()
    }
}

impl<'a> Inspector<'a> for ColumnInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn get_display_name(&self, key: &Value) -> String {
        if self.flavor == ColumnFlavor::PandasSeries {
            let label = position(key, self.get_length())
                .ok_or_else(|| position_error(key, self.get_type_info()))
                .and_then(|position| self.column.label(position))
                .and_then(|label| label.to_str());
            match label {
                Ok(label) => return label,
                Err(err) => debug!(error = %err, "series label lookup failed"),
            }
        }
        key.to_str().unwrap_or_default()
    }

    fn get_display_value(&self, level: usize) -> DisplayValue {
        if self.is_range_index() {
            // Implied by its bounds, so never cut.
            return match self.value.to_str() {
                Ok(text) => DisplayValue::new(text, false),
                Err(_) => default_display_value(self.value, level),
            };
        }
        match self.column.values() {
            Ok(values) => {
                let prefix = format!("{} [", simplified_qualname(self.value));
                let len = values.len();
                collection_display_value(self.value, values, len, &prefix, "]", level)
            }
            Err(err) => {
                debug!(error = %err, "column values unavailable");
                default_display_value(self.value, level)
            }
        }
    }

    fn get_display_type(&self) -> String {
        format!("{} [{}]", self.column.dtype(), self.get_length())
    }

    fn get_kind(&self) -> Kind {
        match self.flavor {
            // Listed with the data frames rather than the plain variables.
            ColumnFlavor::PandasSeries => Kind::Table,
            ColumnFlavor::PandasIndex | ColumnFlavor::PolarsSeries => Kind::Map,
        }
    }

    fn get_size(&self) -> usize {
        self.get_length() * self.column.itemsize().unwrap_or(DEFAULT_ITEMSIZE)
    }

    fn has_children(&self) -> bool {
        !self.is_range_index() && self.get_length() > 0
    }

    fn has_child(&self, key: &Value) -> bool {
        is_position(key, self.get_length())
    }

    fn get_child(&self, key: &Value) -> Result<Value> {
        let position =
            position(key, self.get_length()).ok_or_else(|| position_error(key, self.get_type_info()))?;
        Ok(self.column.iloc(position)?)
    }

    fn get_children(&self) -> Result<Vec<Value>> {
        Ok(index_keys(self.get_length()))
    }

    fn has_viewer(&self) -> bool {
        self.flavor == ColumnFlavor::PandasSeries
    }

    fn is_mutable(&self) -> bool {
        self.flavor != ColumnFlavor::PandasIndex
    }

    fn equals(&self, other: &Value) -> bool {
        match self.flavor {
            ColumnFlavor::PolarsSeries => compare(POLARS_SERIES_EQUALS.call(
                || self.column.equals(other),
                || self.column.legacy_equals(other),
            )),
            _ => compare(self.column.equals(other)),
        }
    }

    fn deepcopy(&self) -> Result<Value> {
        match self.flavor {
            // Indexes are immutable.
            ColumnFlavor::PandasIndex => Ok(self.value.clone()),
            _ => Ok(self.column.deep_copy()?),
        }
    }

    fn to_html(&self) -> Result<String> {
        self.to_plaintext()
    }

    fn to_plaintext(&self) -> Result<String> {
        Ok(self.column.to_csv('\t')?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFlavor {
    /// Children are column positions.
    Pandas,
    /// Children are column names.
    Polars,
}

/// Data frames. Their children are columns.
pub struct TableInspector<'a> {
    value: &'a Value,
    frame: &'a dyn FrameLike,
    flavor: TableFlavor,
}

impl<'a> TableInspector<'a> {
    /// `None` when the value does not expose a frame view.
    pub fn new(value: &'a Value, flavor: TableFlavor) -> Option<Self> {
        let frame = value.as_host()?.as_frame()?;
        Some(Self {
            value,
            frame,
            flavor,
        })
    }
}

impl<'a> Inspector<'a> for TableInspector<'a> {
    fn value(&self) -> &'a Value {
        self.value
    }

    fn get_display_name(&self, key: &Value) -> String {
        if self.flavor == TableFlavor::Pandas {
            let (_, columns) = self.frame.shape();
            let label = position(key, columns)
                .and_then(|position| self.frame.column_labels().into_iter().nth(position));
            if let Some(label) = label {
                return label.to_str().unwrap_or_default();
            }
        }
        key.to_str().unwrap_or_default()
    }

    fn get_display_value(&self, level: usize) -> DisplayValue {
        let (rows, columns) = self.frame.shape();
        let text = format!(
            "[{rows} rows x {columns} columns] {}",
            simplified_qualname(self.value)
        );
        DisplayValue::new(maybe_truncate_string(&text, level).text, true)
    }

    fn get_display_type(&self) -> String {
        let (rows, columns) = self.frame.shape();
        let type_name = self.value.type_name();
        format!("{} [{rows}x{columns}]", type_name.name())
    }

    fn get_kind(&self) -> Kind {
        Kind::Table
    }

    /// The number of columns; rows are counted by the column inspectors.
    fn get_length(&self) -> usize {
        self.frame.shape().1
    }

    fn get_size(&self) -> usize {
        let (rows, columns) = self.frame.shape();
        rows * columns
    }

    fn has_child(&self, key: &Value) -> bool {
        match self.flavor {
            TableFlavor::Pandas => is_position(key, self.get_length()),
            TableFlavor::Polars => self
                .frame
                .column_labels()
                .iter()
                .any(|label| label.try_eq(key).unwrap_or(false)),
        }
    }

    fn get_child(&self, key: &Value) -> Result<Value> {
        match self.flavor {
            TableFlavor::Pandas => {
                let position = position(key, self.get_length())
                    .ok_or_else(|| position_error(key, self.get_type_info()))?;
                Ok(self.frame.column_at(position)?)
            }
            TableFlavor::Polars => Ok(self.frame.column(key)?),
        }
    }

    fn get_children(&self) -> Result<Vec<Value>> {
        match self.flavor {
            TableFlavor::Pandas => Ok(index_keys(self.get_length())),
            TableFlavor::Polars => Ok(self.frame.column_labels()),
        }
    }

    fn has_viewer(&self) -> bool {
        true
    }

    fn is_mutable(&self) -> bool {
        true
    }

    fn equals(&self, other: &Value) -> bool {
        let result = match self.flavor {
            TableFlavor::Pandas => self.frame.equals(other),
            TableFlavor::Polars => POLARS_FRAME_EQUALS.call(
                || self.frame.equals(other),
                || self.frame.legacy_equals(other),
            ),
        };
        compare(result)
    }

    fn deepcopy(&self) -> Result<Value> {
        Ok(self.frame.deep_copy()?)
    }

    fn to_html(&self) -> Result<String> {
        Ok(self.frame.to_html()?)
    }

    fn to_plaintext(&self) -> Result<String> {
        Ok(self.frame.to_csv('\t')?)
    }
}
