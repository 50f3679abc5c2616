use pretty_assertions::assert_eq;
use spyglass_values::{Class, Function, HostError, HostObject, TypeName, Value};

use crate::qualname::{get_qualname, simplified_qualname, type_qualname};

#[derive(Debug)]
struct Opaque {
    type_name: TypeName,
    expression: bool,
}

impl Opaque {
    fn value(module: &str, qualname: &str) -> Value {
        Value::host(Opaque {
            type_name: TypeName::new(module, qualname),
            expression: false,
        })
    }

    fn expression(module: &str, qualname: &str) -> Value {
        Value::host(Opaque {
            type_name: TypeName::new(module, qualname),
            expression: true,
        })
    }
}

impl HostObject for Opaque {
    fn type_name(&self) -> TypeName {
        self.type_name.clone()
    }

    fn repr(&self) -> Result<String, HostError> {
        Ok(format!("<{}>", self.type_name.qualname))
    }

    fn is_expression(&self) -> bool {
        self.expression
    }
}

#[test]
fn test_builtins_have_no_module() {
    assert_eq!(get_qualname(&Value::Int(1)), "int");
    assert_eq!(get_qualname(&Value::str("s")), "str");
    assert_eq!(get_qualname(&Value::dict([])), "dict");
}

#[test]
fn test_classes_and_functions_are_named_by_themselves() {
    let class = Value::class(Class::new("shapes.geometry", "Circle"));
    assert_eq!(get_qualname(&class), "shapes.geometry.Circle");
    assert_eq!(type_qualname(&class), "type");

    let function = Value::function(Function::new("__main__", "area", "(r)"));
    assert_eq!(get_qualname(&function), "area");
    assert_eq!(type_qualname(&function), "function");

    let method = Value::function(Function::new("shapes", "Circle.area", "(self)"));
    assert_eq!(get_qualname(&method), "shapes.Circle.area");
}

#[test]
fn test_properties_are_named_by_their_getter() {
    let property = Value::property(Function::new("shapes", "Circle.radius", "(self)"));
    assert_eq!(get_qualname(&property), "shapes.Circle.radius");
    assert_eq!(type_qualname(&property), "property");
}

#[test]
fn test_empty_qualname_is_object() {
    assert_eq!(get_qualname(&Opaque::value("somewhere", "")), "object");
}

#[test]
fn test_library_paths_are_simplified() {
    let cases = [
        ("pandas.core.frame", "DataFrame", "pandas.DataFrame"),
        ("pandas.core.series", "Series", "pandas.Series"),
        ("pandas.core.indexes.range", "RangeIndex", "pandas.RangeIndex"),
        ("pandas.core.indexes.numeric", "Int64Index", "pandas.Index"),
        ("polars.dataframe.frame", "DataFrame", "polars.DataFrame"),
        ("polars.internals.series.series", "Series", "polars.Series"),
        ("geopandas.geodataframe", "GeoDataFrame", "geopandas.GeoDataFrame"),
    ];
    for (module, qualname, expected) in cases {
        assert_eq!(simplified_qualname(&Opaque::value(module, qualname)), expected);
    }
}

#[test]
fn test_unknown_paths_are_kept() {
    let value = Opaque::value("numpy", "ndarray");
    assert_eq!(simplified_qualname(&value), "numpy.ndarray");
}

#[test]
fn test_ibis_expressions_collapse() {
    let table = Opaque::expression("ibis.expr.types.relations", "Table");
    assert_eq!(simplified_qualname(&table), "ibis.Expr");

    let backend = Opaque::value("ibis.backends.duckdb", "Backend");
    assert_eq!(simplified_qualname(&backend), "ibis.backends.duckdb.Backend");
}
