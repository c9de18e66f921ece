//! Builders for the remote query-language clauses.

use geotable_core::SortBy;
use serde_json::{Map, Value};

/// Encode ordered equality filters as the JSON-object filter string.
///
/// Later values win when a field repeats. An empty input encodes as `{}`,
/// which matches all rows.
pub(crate) fn filter_clause(filters: &[(String, Value)]) -> String {
    let mut object = Map::new();
    for (field, value) in filters {
        object.insert(field.clone(), value.clone());
    }
    Value::Object(object).to_string()
}

/// Join sort keys into the remote's comma-separated order clause.
///
/// Input order is precedence order.
pub(crate) fn order_clause(sortby: &[SortBy]) -> String {
    sortby
        .iter()
        .map(|key| format!("{} {}", key.property, key.order.as_str()))
        .collect::<Vec<_>>()
        .join(",")
}
