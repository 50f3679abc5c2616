//! Mock host objects standing in for third-party library values.
#![allow(dead_code)]

use std::cell::Cell;

use spyglass_core::{
    options::ArrayPrintOptions,
    third_party::{self, NumpyModule, PandasModule, TorchModule},
};
use spyglass_values::{
    ArrayLike, ColumnLike, ConnectionLike, Datetime, FrameLike, HostError, HostObject, Protocols,
    TypeName, Value,
};

fn join(values: &[Value]) -> String {
    values
        .iter()
        .map(|value| value.repr().unwrap_or_default())
        .collect::<Vec<_>>()
        .join(", ")
}

fn same_cells(a: &[Value], b: &[Value]) -> Result<bool, HostError> {
    if a.len() != b.len() {
        return Ok(false);
    }
    for (x, y) in a.iter().zip(b) {
        if !x.try_eq(y)? {
            return Ok(false);
        }
    }
    Ok(true)
}

// ============================================================================
// Arrays
// ============================================================================

#[derive(Debug, Clone)]
pub struct MockArray {
    pub module: &'static str,
    pub dtype: &'static str,
    pub shape: Vec<usize>,
    pub itemsize: Option<usize>,
    /// Row-major cells.
    pub cells: Vec<Value>,
}

impl MockArray {
    pub fn numpy(shape: Vec<usize>, cells: Vec<f64>) -> Self {
        Self {
            module: "numpy",
            dtype: "float64",
            shape,
            itemsize: Some(8),
            cells: cells.into_iter().map(Value::Float).collect(),
        }
    }

    pub fn torch(shape: Vec<usize>, cells: Vec<i64>) -> Self {
        Self {
            module: "torch",
            dtype: "torch.int32",
            shape,
            itemsize: Some(4),
            cells: cells.into_iter().map(Value::Int).collect(),
        }
    }

    pub fn into_value(self) -> Value {
        Value::host(self)
    }

    fn row_len(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    fn text(&self) -> String {
        match self.shape.len() {
            0 => join(&self.cells),
            1 => format!("[{}]", join(&self.cells)),
            _ => {
                let rows: Vec<String> = self
                    .cells
                    .chunks(self.row_len().max(1))
                    .map(|row| format!("[{}]", join(row)))
                    .collect();
                format!("[{}]", rows.join(",\n "))
            }
        }
    }
}

impl HostObject for MockArray {
    fn type_name(&self) -> TypeName {
        match self.module {
            "torch" => TypeName::new("torch", "Tensor"),
            module => TypeName::new(module, "ndarray"),
        }
    }

    fn repr(&self) -> Result<String, HostError> {
        match self.module {
            "torch" => Ok(format!("tensor({})", self.text())),
            _ => Ok(format!("array({})", self.text())),
        }
    }

    fn protocols(&self) -> Protocols {
        Protocols::SEQUENCE | Protocols::MUTABLE
    }

    fn length(&self) -> Option<usize> {
        self.shape.first().copied()
    }

    fn equals(&self, _other: &Value) -> Result<bool, HostError> {
        Err(HostError::Ambiguous {
            type_name: "ndarray".to_string(),
        })
    }

    fn as_array(&self) -> Option<&dyn ArrayLike> {
        Some(self)
    }
}

impl ArrayLike for MockArray {
    fn dtype(&self) -> String {
        self.dtype.to_string()
    }

    fn shape(&self) -> Vec<usize> {
        self.shape.clone()
    }

    fn itemsize(&self) -> Option<usize> {
        self.itemsize
    }

    fn get(&self, index: usize) -> Result<Value, HostError> {
        if self.shape.len() == 1 {
            return self.cells.get(index).cloned().ok_or(HostError::Index {
                type_name: "ndarray".to_string(),
                index: index as i64,
            });
        }
        let row = self.row_len();
        let start = index * row;
        let cells = self
            .cells
            .get(start..start + row)
            .ok_or(HostError::Index {
                type_name: "ndarray".to_string(),
                index: index as i64,
            })?
            .to_vec();
        Ok(MockArray {
            shape: self.shape[1..].to_vec(),
            cells,
            ..self.clone()
        }
        .into_value())
    }

    fn copy(&self) -> Result<Value, HostError> {
        Ok(self.clone().into_value())
    }

    fn detach(&self) -> Result<Value, HostError> {
        match self.module {
            "torch" => Ok(self.clone().into_value()),
            _ => Err(HostError::missing_attribute("numpy.ndarray", "detach")),
        }
    }
}

fn array_cells(value: &Value) -> Option<Vec<Value>> {
    let array = value.as_host()?.as_array()?;
    let shape = array.shape();
    if shape.len() != 1 {
        return None;
    }
    (0..shape[0]).map(|i| array.get(i).ok()).collect()
}

/// Prints 1-d arrays the way `array2string` would with the given separator.
pub struct FakeNumpy;

impl NumpyModule for FakeNumpy {
    fn array2string(&self, array: &Value, options: &ArrayPrintOptions) -> Result<String, HostError> {
        let cells = array_cells(array).ok_or_else(|| HostError::Failed("not printable".into()))?;
        let cells: Vec<String> = cells
            .iter()
            .map(|cell| cell.repr().unwrap_or_default())
            .collect();
        Ok(format!("[{}]", cells.join(options.separator)))
    }

    fn array_equal(&self, a: &Value, b: &Value) -> Result<bool, HostError> {
        match (array_cells(a), array_cells(b)) {
            (Some(a), Some(b)) => same_cells(&a, &b),
            _ => Ok(false),
        }
    }
}

pub struct FakeTorch;

impl TorchModule for FakeTorch {
    fn tensor_str(&self, tensor: &Value, _options: &ArrayPrintOptions) -> Result<String, HostError> {
        tensor.repr()
    }

    fn equal(&self, a: &Value, b: &Value) -> Result<bool, HostError> {
        match (array_cells(a), array_cells(b)) {
            (Some(a), Some(b)) => same_cells(&a, &b),
            _ => Ok(false),
        }
    }
}

pub struct FakePandas;

impl PandasModule for FakePandas {
    fn timestamp_from_isoformat(&self, text: &str) -> Result<Value, HostError> {
        Ok(MockTimestamp(Datetime::from_isoformat(text)?).into_value())
    }
}

/// Installs the fake library bindings. Safe to call from every test.
pub fn install_libraries() {
    let _ = third_party::install_numpy(Box::new(FakeNumpy));
    let _ = third_party::install_torch(Box::new(FakeTorch));
    let _ = third_party::install_pandas(Box::new(FakePandas));
}

// ============================================================================
// Scalars
// ============================================================================

/// A numpy scalar: its repr spells out the type, `.item()` is the plain number.
#[derive(Debug)]
pub struct MockNumpyScalar {
    pub qualname: &'static str,
    pub item: Value,
}

impl MockNumpyScalar {
    pub fn float32(value: f64) -> Value {
        Value::host(Self {
            qualname: "float32",
            item: Value::Float(value),
        })
    }

    pub fn int64(value: i64) -> Value {
        Value::host(Self {
            qualname: "int64",
            item: Value::Int(value),
        })
    }
}

impl HostObject for MockNumpyScalar {
    fn type_name(&self) -> TypeName {
        TypeName::new("numpy", self.qualname)
    }

    fn repr(&self) -> Result<String, HostError> {
        Ok(format!("np.{}({})", self.qualname, self.item.repr()?))
    }

    fn protocols(&self) -> Protocols {
        Protocols::NUMBER
    }

    fn equals(&self, other: &Value) -> Result<bool, HostError> {
        self.item.try_eq(other)
    }

    fn as_scalar(&self) -> Option<Value> {
        Some(self.item.clone())
    }
}

#[derive(Debug)]
pub struct MockTimestamp(pub Datetime);

impl MockTimestamp {
    pub fn into_value(self) -> Value {
        Value::host(self)
    }
}

impl HostObject for MockTimestamp {
    fn type_name(&self) -> TypeName {
        TypeName::new("pandas._libs.tslibs.timestamps", "Timestamp")
    }

    fn repr(&self) -> Result<String, HostError> {
        Ok(format!("Timestamp('{}')", self.0.to_display_string()))
    }

    fn equals(&self, other: &Value) -> Result<bool, HostError> {
        match other.as_host().and_then(|host| host.as_timestamp()) {
            Some(timestamp) => Value::Datetime(self.0).try_eq(&Value::Datetime(timestamp)),
            None => Ok(false),
        }
    }

    fn as_timestamp(&self) -> Option<Datetime> {
        Some(self.0)
    }
}

// ============================================================================
// Columns and frames
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Library {
    Pandas,
    Polars,
}

#[derive(Debug, Clone)]
pub struct MockSeries {
    pub library: Library,
    pub name: String,
    pub labels: Vec<Value>,
    pub values: Vec<Value>,
    /// Polars before `equals` existed.
    pub legacy: bool,
}

impl MockSeries {
    pub fn pandas(name: &str, values: Vec<Value>) -> Self {
        let labels = (0..values.len() as i64).map(Value::Int).collect();
        Self {
            library: Library::Pandas,
            name: name.to_string(),
            labels,
            values,
            legacy: false,
        }
    }

    pub fn polars(name: &str, values: Vec<Value>) -> Self {
        Self {
            library: Library::Polars,
            ..Self::pandas(name, values)
        }
    }

    pub fn with_labels(mut self, labels: Vec<Value>) -> Self {
        self.labels = labels;
        self
    }

    pub fn into_value(self) -> Value {
        Value::host(self)
    }

    fn same_as(&self, other: &Value) -> Result<bool, HostError> {
        match other.as_host().and_then(|host| host.as_column()) {
            Some(column) => same_cells(&self.values, &column.values()?),
            None => Ok(false),
        }
    }
}

impl HostObject for MockSeries {
    fn type_name(&self) -> TypeName {
        match self.library {
            Library::Pandas => TypeName::new("pandas.core.series", "Series"),
            Library::Polars => TypeName::new("polars.series.series", "Series"),
        }
    }

    fn repr(&self) -> Result<String, HostError> {
        Ok(format!("Series({:?}, [{}])", self.name, join(&self.values)))
    }

    fn protocols(&self) -> Protocols {
        Protocols::SEQUENCE | Protocols::MUTABLE
    }

    fn length(&self) -> Option<usize> {
        Some(self.values.len())
    }

    fn as_column(&self) -> Option<&dyn ColumnLike> {
        Some(self)
    }
}

impl ColumnLike for MockSeries {
    fn dtype(&self) -> String {
        "int64".to_string()
    }

    fn itemsize(&self) -> Option<usize> {
        Some(8)
    }

    fn values(&self) -> Result<Vec<Value>, HostError> {
        Ok(self.values.clone())
    }

    fn iloc(&self, position: usize) -> Result<Value, HostError> {
        self.values.get(position).cloned().ok_or(HostError::Index {
            type_name: "Series".to_string(),
            index: position as i64,
        })
    }

    fn label(&self, position: usize) -> Result<Value, HostError> {
        self.labels.get(position).cloned().ok_or(HostError::Index {
            type_name: "Index".to_string(),
            index: position as i64,
        })
    }

    fn equals(&self, other: &Value) -> Result<bool, HostError> {
        if self.legacy {
            return Err(HostError::missing_attribute("Series", "equals"));
        }
        self.same_as(other)
    }

    fn legacy_equals(&self, other: &Value) -> Result<bool, HostError> {
        self.same_as(other)
    }

    fn deep_copy(&self) -> Result<Value, HostError> {
        Ok(self.clone().into_value())
    }

    fn to_csv(&self, separator: char) -> Result<String, HostError> {
        let mut csv = format!("{separator}{}\n", self.name);
        for (label, value) in self.labels.iter().zip(&self.values) {
            csv.push_str(&format!("{}{separator}{}\n", label.to_str()?, value.to_str()?));
        }
        Ok(csv)
    }
}

/// A pandas `RangeIndex`.
#[derive(Debug, Clone)]
pub struct MockRangeIndex {
    pub stop: i64,
}

impl HostObject for MockRangeIndex {
    fn type_name(&self) -> TypeName {
        TypeName::new("pandas.core.indexes.range", "RangeIndex")
    }

    fn repr(&self) -> Result<String, HostError> {
        Ok(format!("RangeIndex(start=0, stop={}, step=1)", self.stop))
    }

    fn length(&self) -> Option<usize> {
        usize::try_from(self.stop).ok()
    }

    fn as_column(&self) -> Option<&dyn ColumnLike> {
        Some(self)
    }
}

impl ColumnLike for MockRangeIndex {
    fn dtype(&self) -> String {
        "int64".to_string()
    }

    fn itemsize(&self) -> Option<usize> {
        Some(8)
    }

    fn values(&self) -> Result<Vec<Value>, HostError> {
        Ok((0..self.stop).map(Value::Int).collect())
    }

    fn iloc(&self, position: usize) -> Result<Value, HostError> {
        Ok(Value::Int(position as i64))
    }

    fn is_range(&self) -> bool {
        true
    }

    fn equals(&self, other: &Value) -> Result<bool, HostError> {
        match other.as_host().and_then(|host| host.as_column()) {
            Some(column) => same_cells(&self.values()?, &column.values()?),
            None => Ok(false),
        }
    }

    fn deep_copy(&self) -> Result<Value, HostError> {
        Ok(Value::host(self.clone()))
    }

    fn to_csv(&self, separator: char) -> Result<String, HostError> {
        let mut csv = format!("{separator}0\n");
        for i in 0..self.stop {
            csv.push_str(&format!("{i}{separator}{i}\n"));
        }
        Ok(csv)
    }
}

#[derive(Debug, Clone)]
pub struct MockFrame {
    pub library: Library,
    pub columns: Vec<MockSeries>,
    pub legacy: bool,
}

impl MockFrame {
    pub fn pandas(columns: Vec<MockSeries>) -> Self {
        Self {
            library: Library::Pandas,
            columns,
            legacy: false,
        }
    }

    pub fn polars(columns: Vec<MockSeries>) -> Self {
        let columns = columns
            .into_iter()
            .map(|column| MockSeries {
                library: Library::Polars,
                ..column
            })
            .collect();
        Self {
            library: Library::Polars,
            columns,
            legacy: false,
        }
    }

    /// Two integer columns, `a` and `b`, of three rows.
    pub fn sample(library: Library) -> Self {
        let columns = vec![
            MockSeries::pandas("a", (1..=3).map(Value::Int).collect()),
            MockSeries::pandas("b", (4..=6).map(Value::Int).collect()),
        ];
        match library {
            Library::Pandas => Self::pandas(columns),
            Library::Polars => Self::polars(columns),
        }
    }

    pub fn into_value(self) -> Value {
        Value::host(self)
    }

    fn rows(&self) -> usize {
        self.columns.first().map_or(0, |column| column.values.len())
    }

    fn same_as(&self, other: &Value) -> Result<bool, HostError> {
        let Some(frame) = other.as_host().and_then(|host| host.as_frame()) else {
            return Ok(false);
        };
        if frame.shape() != self.shape() {
            return Ok(false);
        }
        for (position, column) in self.columns.iter().enumerate() {
            if !column.same_as(&frame.column_at(position)?)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl HostObject for MockFrame {
    fn type_name(&self) -> TypeName {
        match self.library {
            Library::Pandas => TypeName::new("pandas.core.frame", "DataFrame"),
            Library::Polars => TypeName::new("polars.dataframe.frame", "DataFrame"),
        }
    }

    fn repr(&self) -> Result<String, HostError> {
        Ok(format!("<DataFrame {}x{}>", self.rows(), self.columns.len()))
    }

    /// Frames are mappings from column labels to columns.
    fn protocols(&self) -> Protocols {
        Protocols::MAPPING | Protocols::MUTABLE
    }

    fn length(&self) -> Option<usize> {
        Some(self.rows())
    }

    fn items(&self) -> Result<Vec<Value>, HostError> {
        Ok(self.column_labels())
    }

    fn get_item(&self, key: &Value) -> Result<Value, HostError> {
        self.column(key)
    }

    fn as_frame(&self) -> Option<&dyn FrameLike> {
        Some(self)
    }
}

impl FrameLike for MockFrame {
    fn shape(&self) -> (usize, usize) {
        (self.rows(), self.columns.len())
    }

    fn column_labels(&self) -> Vec<Value> {
        self.columns
            .iter()
            .map(|column| Value::str(&column.name))
            .collect()
    }

    fn column_at(&self, position: usize) -> Result<Value, HostError> {
        self.columns
            .get(position)
            .map(|column| column.clone().into_value())
            .ok_or(HostError::Index {
                type_name: "DataFrame".to_string(),
                index: position as i64,
            })
    }

    fn column(&self, label: &Value) -> Result<Value, HostError> {
        let name = label.to_str()?;
        self.columns
            .iter()
            .find(|column| column.name == name)
            .map(|column| column.clone().into_value())
            .ok_or(HostError::Key {
                key: label.repr()?,
            })
    }

    fn equals(&self, other: &Value) -> Result<bool, HostError> {
        if self.legacy {
            return Err(HostError::missing_attribute("DataFrame", "equals"));
        }
        self.same_as(other)
    }

    fn legacy_equals(&self, other: &Value) -> Result<bool, HostError> {
        self.same_as(other)
    }

    fn deep_copy(&self) -> Result<Value, HostError> {
        Ok(self.clone().into_value())
    }

    fn to_csv(&self, separator: char) -> Result<String, HostError> {
        let header: Vec<&str> = self.columns.iter().map(|column| column.name.as_str()).collect();
        let mut csv = header.join(&separator.to_string());
        csv.push('\n');
        for row in 0..self.rows() {
            let cells: Vec<String> = self
                .columns
                .iter()
                .map(|column| column.values[row].to_str().unwrap_or_default())
                .collect();
            csv.push_str(&cells.join(&separator.to_string()));
            csv.push('\n');
        }
        Ok(csv)
    }

    fn to_html(&self) -> Result<String, HostError> {
        Ok(format!("<table>{}x{}</table>", self.rows(), self.columns.len()))
    }
}

// ============================================================================
// Connections, expressions, mappings
// ============================================================================

#[derive(Debug)]
pub struct MockConnection {
    pub sqlalchemy: bool,
    pub open: Cell<bool>,
}

impl MockConnection {
    pub fn sqlite() -> Self {
        Self {
            sqlalchemy: false,
            open: Cell::new(true),
        }
    }

    pub fn engine() -> Self {
        Self {
            sqlalchemy: true,
            open: Cell::new(true),
        }
    }
}

impl HostObject for MockConnection {
    fn type_name(&self) -> TypeName {
        if self.sqlalchemy {
            TypeName::new("sqlalchemy.engine.base", "Engine")
        } else {
            TypeName::new("sqlite3", "Connection")
        }
    }

    fn repr(&self) -> Result<String, HostError> {
        Ok("<connection>".to_string())
    }

    fn attributes(&self) -> Vec<String> {
        vec![
            "total_changes".to_string(),
            "_private".to_string(),
            "in_transaction".to_string(),
        ]
    }

    fn get_attribute(&self, name: &str) -> Result<Value, HostError> {
        match name {
            "total_changes" => Ok(Value::Int(0)),
            "in_transaction" => Ok(Value::Bool(false)),
            "_private" => Ok(Value::None),
            _ => Err(HostError::missing_attribute("Connection", name)),
        }
    }

    fn as_connection(&self) -> Option<&dyn ConnectionLike> {
        Some(self)
    }
}

impl ConnectionLike for MockConnection {
    fn cursor(&self) -> Result<(), HostError> {
        match (self.sqlalchemy, self.open.get()) {
            (false, true) => Ok(()),
            (false, false) => Err(HostError::Failed("Cannot operate on a closed database.".into())),
            (true, _) => Err(HostError::missing_attribute("Engine", "cursor")),
        }
    }

    fn connect(&self) -> Result<(), HostError> {
        match (self.sqlalchemy, self.open.get()) {
            (true, true) => Ok(()),
            (true, false) => Err(HostError::Failed("connection refused".into())),
            (false, _) => Err(HostError::missing_attribute("Connection", "connect")),
        }
    }
}

/// A node of an ibis expression tree.
#[derive(Debug)]
pub struct MockIbisTable;

impl HostObject for MockIbisTable {
    fn type_name(&self) -> TypeName {
        TypeName::new("ibis.expr.types.relations", "Table")
    }

    fn repr(&self) -> Result<String, HostError> {
        Err(HostError::Failed("expression is not executed".into()))
    }

    fn attributes(&self) -> Vec<String> {
        vec!["columns".to_string(), "schema".to_string()]
    }

    fn is_expression(&self) -> bool {
        true
    }
}

/// A read-only mapping whose lookups fail for some keys.
#[derive(Debug)]
pub struct FlakyMapping {
    pub keys: Vec<Value>,
}

impl HostObject for FlakyMapping {
    fn type_name(&self) -> TypeName {
        TypeName::new("vendor", "FlakyMapping")
    }

    fn repr(&self) -> Result<String, HostError> {
        Ok("FlakyMapping(...)".to_string())
    }

    fn protocols(&self) -> Protocols {
        Protocols::MAPPING
    }

    fn length(&self) -> Option<usize> {
        Some(self.keys.len())
    }

    fn items(&self) -> Result<Vec<Value>, HostError> {
        Ok(self.keys.clone())
    }

    fn get_item(&self, key: &Value) -> Result<Value, HostError> {
        match key {
            Value::Int(n) if n % 2 == 0 => Ok(Value::Int(n * 10)),
            _ => Err(HostError::Key {
                key: key.repr()?,
            }),
        }
    }
}

/// A host sequence that supports in-place mutation, like fastcore's `L`.
#[derive(Debug)]
pub struct MockList(pub Vec<Value>);

impl HostObject for MockList {
    fn type_name(&self) -> TypeName {
        TypeName::new("fastcore.foundation", "L")
    }

    fn repr(&self) -> Result<String, HostError> {
        Ok(format!("(#{}) [{}]", self.0.len(), join(&self.0)))
    }

    fn protocols(&self) -> Protocols {
        Protocols::SEQUENCE | Protocols::MUTABLE
    }

    fn length(&self) -> Option<usize> {
        Some(self.0.len())
    }

    fn items(&self) -> Result<Vec<Value>, HostError> {
        Ok(self.0.clone())
    }

    fn get_item(&self, key: &Value) -> Result<Value, HostError> {
        let index = match key {
            Value::Int(index) => usize::try_from(*index).ok(),
            _ => None,
        };
        index
            .and_then(|index| self.0.get(index).cloned())
            .ok_or_else(|| HostError::Index {
                type_name: "L".to_string(),
                index: -1,
            })
    }
}
