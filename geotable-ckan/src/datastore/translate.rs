//! Row-to-feature translation.
//!
//! One remote row becomes one [`Feature`]: the configured id field supplies
//! the identifier, the two coordinate fields supply the point geometry, and
//! everything else becomes `properties`. The input row is read, never
//! mutated.

use geo::Coord;
use geotable_core::{Feature, Geometry, ProviderError};
use serde_json::{Map, Value};

/// Field names reserved for feature identity and geometry.
///
/// Reserved fields are excluded from `properties` whether or not geometry
/// was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReservedFields<'a> {
    pub id_field: &'a str,
    pub x_field: &'a str,
    pub y_field: &'a str,
}

impl ReservedFields<'_> {
    fn contains(&self, name: &str) -> bool {
        name == self.id_field || name == self.x_field || name == self.y_field
    }
}

/// Translate one remote row into a feature.
pub(crate) fn make_feature(
    row: &Map<String, Value>,
    reserved: &ReservedFields<'_>,
    skip_geometry: bool,
) -> Result<Feature, ProviderError> {
    let id = required(row, reserved.id_field)?.clone();

    let geometry = if skip_geometry {
        None
    } else {
        let x = coordinate(row, reserved.x_field)?;
        let y = coordinate(row, reserved.y_field)?;
        Some(Geometry::point(Coord { x, y }))
    };

    let properties = row
        .iter()
        .filter(|(name, _)| !reserved.contains(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    Ok(Feature {
        id,
        geometry,
        properties,
    })
}

fn required<'a>(row: &'a Map<String, Value>, field: &str) -> Result<&'a Value, ProviderError> {
    row.get(field).ok_or_else(|| ProviderError::MissingField {
        field: field.to_owned(),
    })
}

/// Coerce a coordinate cell to `f64`.
///
/// The datastore serves numeric columns as either JSON numbers or numeric
/// strings; anything else is a hard error.
fn coordinate(row: &Map<String, Value>, field: &str) -> Result<f64, ProviderError> {
    let value = required(row, field)?;
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ProviderError::InvalidCoordinate {
        field: field.to_owned(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    const RESERVED: ReservedFields<'static> = ReservedFields {
        id_field: "id",
        x_field: "x",
        y_field: "y",
    };

    #[fixture]
    fn sample_row() -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("id".to_owned(), json!(5));
        row.insert("x".to_owned(), json!("1.5"));
        row.insert("y".to_owned(), json!("2.5"));
        row.insert("name".to_owned(), json!("foo"));
        row
    }

    #[rstest]
    fn builds_point_feature_from_row(sample_row: Map<String, Value>) {
        let feature = make_feature(&sample_row, &RESERVED, false).unwrap();

        assert_eq!(feature.id, json!(5));
        assert_eq!(
            feature.geometry,
            Some(Geometry::Point {
                coordinates: [1.5, 2.5]
            })
        );
        assert_eq!(feature.properties.len(), 1);
        assert_eq!(feature.properties["name"], json!("foo"));
    }

    #[rstest]
    fn skipped_geometry_still_reserves_coordinate_fields(sample_row: Map<String, Value>) {
        let feature = make_feature(&sample_row, &RESERVED, true).unwrap();

        assert_eq!(feature.geometry, None);
        assert!(!feature.properties.contains_key("x"));
        assert!(!feature.properties.contains_key("y"));
        assert!(!feature.properties.contains_key("id"));
        assert!(feature.properties.contains_key("name"));
    }

    #[rstest]
    fn accepts_json_number_coordinates(mut sample_row: Map<String, Value>) {
        sample_row.insert("x".to_owned(), json!(1.5));
        sample_row.insert("y".to_owned(), json!(2));

        let feature = make_feature(&sample_row, &RESERVED, false).unwrap();
        assert_eq!(
            feature.geometry,
            Some(Geometry::Point {
                coordinates: [1.5, 2.0]
            })
        );
    }

    #[rstest]
    fn non_numeric_coordinate_is_a_hard_error(mut sample_row: Map<String, Value>) {
        sample_row.insert("x".to_owned(), json!("east-ish"));

        let err = make_feature(&sample_row, &RESERVED, false).unwrap_err();
        assert_eq!(
            err,
            ProviderError::InvalidCoordinate {
                field: "x".to_owned(),
                value: "\"east-ish\"".to_owned(),
            }
        );
    }

    #[rstest]
    fn missing_id_field_is_reported(mut sample_row: Map<String, Value>) {
        sample_row.remove("id");

        let err = make_feature(&sample_row, &RESERVED, false).unwrap_err();
        assert_eq!(
            err,
            ProviderError::MissingField {
                field: "id".to_owned(),
            }
        );
    }

    #[rstest]
    fn input_row_is_left_untouched(sample_row: Map<String, Value>) {
        let before = sample_row.clone();
        let _ = make_feature(&sample_row, &RESERVED, false).unwrap();
        assert_eq!(sample_row, before);
    }
}
