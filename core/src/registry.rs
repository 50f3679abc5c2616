//! Inspector dispatch.
//!
//! [`get_inspector`] is the single entry point. It looks the value up by its
//! simplified qualified name first, then by its kind, and falls back to the
//! generic inspector. Classes are keyed as `"type"` and properties as
//! `"property"`, whatever their own names.

use hashbrown::HashMap;
use lazy_static::lazy_static;
use serde_json::Value as JsonData;
use spyglass_values::Value;
use tracing::debug;

use crate::{
    errors::{InspectError, Result},
    inspectors::{
        ArrayFlavor, ArrayInspector, BooleanInspector, BoxedInspector, BytesInspector,
        ClassInspector, CollectionInspector, ColumnFlavor, ColumnInspector, ConnectionFlavor,
        ConnectionInspector, DefaultInspector, FunctionInspector, IbisExprInspector,
        MapInspector, NoneInspector, NumberInspector, ObjectInspector, PropertyInspector,
        StringInspector, TableFlavor, TableInspector, TimestampInspector,
    },
    json::validate_payload,
    kind::get_kind,
    qualname::simplified_qualname,
};

/// Every inspector variant. Serialization entry points that have no value to
/// wrap yet (`from_json`) are called on the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InspectorClass {
    Default,
    None,
    Boolean,
    Bytes,
    Object,
    Class,
    Property,
    Function,
    Number,
    NumpyNumber,
    String,
    Datetime,
    PandasTimestamp,
    Collection,
    NumpyNdarray,
    TorchTensor,
    Map,
    PandasSeries,
    PandasIndex,
    PolarsSeries,
    PandasDataFrame,
    PolarsDataFrame,
    SqliteConnection,
    SqlAlchemyEngine,
    IbisExpr,
}

/// numpy scalar types, all displayed through the number they wrap.
const NUMPY_NUMERIC_SCALARS: [&str; 31] = [
    "numpy.int8",
    "numpy.uint8",
    "numpy.int16",
    "numpy.uint16",
    "numpy.int32",
    "numpy.uint32",
    "numpy.int64",
    "numpy.uint64",
    "numpy.intp",
    "numpy.uintp",
    "numpy.float16",
    "numpy.float32",
    "numpy.float64",
    "numpy.float96",
    "numpy.complex64",
    "numpy.complex128",
    "numpy.short",
    "numpy.ushort",
    "numpy.intc",
    "numpy.uintc",
    "numpy.long",
    "numpy.ulong",
    "numpy.longlong",
    "numpy.ulonglong",
    "numpy.half",
    "numpy.single",
    "numpy.double",
    "numpy.longdouble",
    "numpy.csingle",
    "numpy.cdouble",
    "numpy.clongdouble",
];

lazy_static! {
    /// Qualified type names and kind names share one namespace.
    static ref INSPECTOR_CLASSES: HashMap<&'static str, InspectorClass> = {
        use InspectorClass::*;

        let mut classes = HashMap::new();
        for name in ["pandas.DataFrame", "geopandas.GeoDataFrame"] {
            classes.insert(name, PandasDataFrame);
        }
        for name in ["pandas.Series", "geopandas.GeoSeries"] {
            classes.insert(name, PandasSeries);
        }
        for name in [
            "pandas.Index",
            "pandas.DatetimeIndex",
            "pandas.RangeIndex",
            "pandas.MultiIndex",
            "pandas.Int64Index",
        ] {
            classes.insert(name, PandasIndex);
        }
        classes.insert("pandas._libs.tslibs.timestamps.Timestamp", PandasTimestamp);
        for name in NUMPY_NUMERIC_SCALARS {
            classes.insert(name, NumpyNumber);
        }
        classes.insert("numpy.ndarray", NumpyNdarray);
        classes.insert("torch.Tensor", TorchTensor);
        classes.insert("polars.DataFrame", PolarsDataFrame);
        classes.insert("polars.Series", PolarsSeries);
        classes.insert("datetime.datetime", Datetime);
        // Older sqlite3 modules report a bare `Connection`.
        classes.insert("Connection", SqliteConnection);
        classes.insert("sqlite3.Connection", SqliteConnection);
        classes.insert("sqlalchemy.engine.base.Engine", SqlAlchemyEngine);
        classes.insert("ibis.Expr", IbisExpr);

        classes.insert("boolean", Boolean);
        classes.insert("bytes", Bytes);
        classes.insert("class", Class);
        classes.insert("collection", Collection);
        classes.insert("empty", None);
        classes.insert("function", Function);
        classes.insert("map", Map);
        classes.insert("number", Number);
        classes.insert("other", Object);
        classes.insert("property", Property);
        classes.insert("string", String);
        classes
    };
}

impl InspectorClass {
    pub fn name(self) -> &'static str {
        match self {
            InspectorClass::Default => "DefaultInspector",
            InspectorClass::None => "NoneInspector",
            InspectorClass::Boolean => "BooleanInspector",
            InspectorClass::Bytes => "BytesInspector",
            InspectorClass::Object => "ObjectInspector",
            InspectorClass::Class => "ClassInspector",
            InspectorClass::Property => "PropertyInspector",
            InspectorClass::Function => "FunctionInspector",
            InspectorClass::Number => "NumberInspector",
            InspectorClass::NumpyNumber => "NumpyNumberInspector",
            InspectorClass::String => "StringInspector",
            InspectorClass::Datetime => "DatetimeInspector",
            InspectorClass::PandasTimestamp => "PandasTimestampInspector",
            InspectorClass::Collection => "CollectionInspector",
            InspectorClass::NumpyNdarray => "NumpyNdarrayInspector",
            InspectorClass::TorchTensor => "TorchTensorInspector",
            InspectorClass::Map => "MapInspector",
            InspectorClass::PandasSeries => "PandasSeriesInspector",
            InspectorClass::PandasIndex => "PandasIndexInspector",
            InspectorClass::PolarsSeries => "PolarsSeriesInspector",
            InspectorClass::PandasDataFrame => "PandasDataFrameInspector",
            InspectorClass::PolarsDataFrame => "PolarsDataFrameInspector",
            InspectorClass::SqliteConnection => "SqliteConnectionInspector",
            InspectorClass::SqlAlchemyEngine => "SqlAlchemyEngineInspector",
            InspectorClass::IbisExpr => "IbisExprInspector",
        }
    }

    /// Wrap `value`. `None` when the value lacks the host capability the
    /// variant needs (an array view for array inspectors, and so on).
    pub fn inspect<'a>(self, value: &'a Value) -> Option<BoxedInspector<'a>> {
        let inspector: BoxedInspector<'a> = match self {
            InspectorClass::Default => Box::new(DefaultInspector::new(value)),
            InspectorClass::None => Box::new(NoneInspector::new(value)),
            InspectorClass::Boolean => Box::new(BooleanInspector::new(value)),
            InspectorClass::Bytes => Box::new(BytesInspector::new(value)),
            InspectorClass::Object => Box::new(ObjectInspector::new(value)),
            InspectorClass::Class => Box::new(ClassInspector::new(value)),
            InspectorClass::Property => Box::new(PropertyInspector::new(value)),
            InspectorClass::Function => Box::new(FunctionInspector::new(value)),
            InspectorClass::Number => Box::new(NumberInspector::new(value)),
            InspectorClass::NumpyNumber => Box::new(NumberInspector::library_scalar(value)),
            InspectorClass::String => Box::new(StringInspector::new(value)),
            InspectorClass::Datetime | InspectorClass::PandasTimestamp => {
                Box::new(TimestampInspector::new(value))
            }
            InspectorClass::Collection => Box::new(CollectionInspector::new(value)),
            InspectorClass::NumpyNdarray => Box::new(ArrayInspector::new(value, ArrayFlavor::Numpy)?),
            InspectorClass::TorchTensor => Box::new(ArrayInspector::new(value, ArrayFlavor::Torch)?),
            InspectorClass::Map => Box::new(MapInspector::new(value)),
            InspectorClass::PandasSeries => {
                Box::new(ColumnInspector::new(value, ColumnFlavor::PandasSeries)?)
            }
            InspectorClass::PandasIndex => {
                Box::new(ColumnInspector::new(value, ColumnFlavor::PandasIndex)?)
            }
            InspectorClass::PolarsSeries => {
                Box::new(ColumnInspector::new(value, ColumnFlavor::PolarsSeries)?)
            }
            InspectorClass::PandasDataFrame => {
                Box::new(TableInspector::new(value, TableFlavor::Pandas)?)
            }
            InspectorClass::PolarsDataFrame => {
                Box::new(TableInspector::new(value, TableFlavor::Polars)?)
            }
            InspectorClass::SqliteConnection => {
                Box::new(ConnectionInspector::new(value, ConnectionFlavor::Sqlite)?)
            }
            InspectorClass::SqlAlchemyEngine => {
                Box::new(ConnectionInspector::new(value, ConnectionFlavor::SqlAlchemyEngine)?)
            }
            InspectorClass::IbisExpr => Box::new(IbisExprInspector::new(value)),
        };
        Some(inspector)
    }

    /// Decode an untrusted `{"type": ..., "data": ...}` payload. The envelope
    /// is checked before any type-specific decoding.
    pub fn from_json(self, payload: &JsonData) -> Result<Value> {
        let payload = validate_payload(payload)?;
        self.value_from_json(&payload.type_name, &payload.data)
    }

    pub fn value_from_json(self, type_name: &str, data: &JsonData) -> Result<Value> {
        match self {
            InspectorClass::Boolean => BooleanInspector::value_from_json(type_name, data),
            InspectorClass::Bytes => BytesInspector::value_from_json(type_name, data),
            InspectorClass::Class => ClassInspector::value_from_json(type_name, data),
            InspectorClass::Number | InspectorClass::NumpyNumber => {
                NumberInspector::value_from_json(type_name, data)
            }
            InspectorClass::String => StringInspector::value_from_json(type_name, data),
            InspectorClass::Datetime => TimestampInspector::datetime_from_json(type_name, data),
            InspectorClass::PandasTimestamp => {
                TimestampInspector::pandas_timestamp_from_json(type_name, data)
            }
            InspectorClass::Collection => CollectionInspector::value_from_json(type_name, data),
            _ => Err(InspectError::unsupported("value_from_json", type_name)),
        }
    }
}

/// The inspector class registered under `key`, a qualified type name or a
/// kind name.
pub fn lookup_inspector_class(key: &str) -> Option<InspectorClass> {
    INSPECTOR_CLASSES.get(key).copied()
}

/// The registry key `value` is looked up by before falling back to its kind.
pub fn dispatch_key(value: &Value) -> String {
    match value {
        Value::Class(_) => "type".to_string(),
        Value::Property(_) => "property".to_string(),
        _ => simplified_qualname(value),
    }
}

/// The inspector for `value`.
pub fn get_inspector(value: &Value) -> BoxedInspector<'_> {
    let key = dispatch_key(value);
    if let Some(class) = lookup_inspector_class(&key) {
        match class.inspect(value) {
            Some(inspector) => return inspector,
            None => debug!(key, inspector = class.name(), "value lacks the capability, dispatching by kind"),
        }
    }

    let kind = get_kind(value);
    if let Some(inspector) = lookup_inspector_class(kind.as_str()).and_then(|class| class.inspect(value)) {
        return inspector;
    }

    debug!(key, %kind, "no inspector registered, using the default");
    Box::new(DefaultInspector::new(value))
}
