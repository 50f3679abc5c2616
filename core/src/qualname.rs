//! Qualified names and their display simplifications.

use hashbrown::HashMap;
use lazy_static::lazy_static;
use spyglass_values::Value;

lazy_static! {
    /// Internal module paths of well-known library types, mapped to the names
    /// users import them by.
    static ref SIMPLER_NAMES: HashMap<&'static str, &'static str> = HashMap::from([
        ("geopandas.geoseries.GeoSeries", "geopandas.GeoSeries"),
        ("geopandas.geodataframe.GeoDataFrame", "geopandas.GeoDataFrame"),
        ("pandas.core.frame.DataFrame", "pandas.DataFrame"),
        ("pandas.core.series.Series", "pandas.Series"),
        ("polars.dataframe.frame.DataFrame", "polars.DataFrame"),
        ("polars.series.series.Series", "polars.Series"),
        ("polars.internals.series.series.Series", "polars.Series"),
        ("polars.internals.dataframe.frame.DataFrame", "polars.DataFrame"),
        ("pandas.core.indexes.base.Index", "pandas.Index"),
        ("pandas.core.indexes.datetimes.DatetimeIndex", "pandas.DatetimeIndex"),
        ("pandas.core.indexes.range.RangeIndex", "pandas.RangeIndex"),
        ("pandas.core.indexes.multi.MultiIndex", "pandas.MultiIndex"),
        // Deprecated since pandas 1.4.
        ("pandas.core.indexes.numeric.Int64Index", "pandas.Index"),
    ]);

    /// Per-package renaming hooks, keyed by top-level package.
    static ref PACKAGE_REMAPPERS: HashMap<&'static str, fn(&Value, String) -> String> =
        HashMap::from([("ibis", remap_ibis as fn(&Value, String) -> String)]);
}

/// Every ibis expression node collapses to `ibis.Expr`.
fn remap_ibis(value: &Value, qualname: String) -> String {
    match value.as_host() {
        Some(host) if host.is_expression() => "ibis.Expr".to_string(),
        _ => qualname,
    }
}

/// Qualified name of `value`. Classes, functions and properties are named by
/// themselves (a property by its getter); everything else by its type. The
/// module is omitted for `builtins` and `__main__`.
pub fn get_qualname(value: &Value) -> String {
    let name = match value {
        Value::Class(class) => class.name(),
        Value::Function(function) => function.name(),
        Value::Property(property) => property.getter.name(),
        _ => value.type_name(),
    };
    if name.qualname.is_empty() {
        return "object".to_string();
    }
    name.qualified()
}

/// Qualified name of the type of `value`, even for classes and functions.
pub fn type_qualname(value: &Value) -> String {
    value.type_name().qualified()
}

/// [`get_qualname`] with internal library paths replaced by their public names.
pub fn simplified_qualname(value: &Value) -> String {
    let qualname = get_qualname(value);

    if let Some(simpler) = SIMPLER_NAMES.get(qualname.as_str()) {
        return simpler.to_string();
    }

    let top_path = qualname.split('.').next().unwrap_or_default();
    match PACKAGE_REMAPPERS.get(top_path) {
        Some(remap) => remap(value, qualname),
        None => qualname,
    }
}
