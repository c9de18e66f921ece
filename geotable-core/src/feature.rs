//! GeoJSON-shaped output types.
//!
//! Providers reshape backend rows into [`Feature`] values and assemble them
//! into a [`FeatureCollection`]. Only point geometry is supported: providers
//! derive it from a pair of scalar coordinate columns rather than a native
//! geometry column.

use geo::Coord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Geometry of a single feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position.
    Point {
        /// Position as `[x, y]`.
        coordinates: [f64; 2],
    },
}

impl Geometry {
    /// Build a point geometry from a coordinate.
    ///
    /// # Examples
    ///
    /// ```
    /// use geo::Coord;
    /// use geotable_core::Geometry;
    ///
    /// let point = Geometry::point(Coord { x: 1.5, y: 2.5 });
    /// assert_eq!(point, Geometry::Point { coordinates: [1.5, 2.5] });
    /// ```
    #[must_use]
    pub fn point(coord: Coord<f64>) -> Self {
        Self::Point {
            coordinates: [coord.x, coord.y],
        }
    }
}

/// One feature: identifier, optional point geometry and properties.
///
/// The identifier and coordinate values are extracted from dedicated row
/// fields; those fields never appear in `properties`, whether or not
/// geometry was requested. A skipped geometry serializes as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature {
    /// Feature identifier, taken from the configured id field.
    pub id: Value,
    /// Point geometry, or `None` when geometry was skipped.
    pub geometry: Option<Geometry>,
    /// Remaining fields of the source row.
    pub properties: Map<String, Value>,
}

/// An ordered sequence of features with a result-mode count.
///
/// Exactly one of `number_returned` and `number_matched` is populated,
/// enforced by the two constructors: [`FeatureCollection::results`] carries
/// the features it returned, [`FeatureCollection::hits`] carries only the
/// match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    /// Features in result order; empty in hits mode.
    pub features: Vec<Feature>,
    /// Number of features returned (results mode only).
    #[serde(rename = "numberReturned", skip_serializing_if = "Option::is_none")]
    pub number_returned: Option<u64>,
    /// Number of matching rows (hits mode only).
    #[serde(rename = "numberMatched", skip_serializing_if = "Option::is_none")]
    pub number_matched: Option<u64>,
}

impl FeatureCollection {
    /// Build a results-mode collection from the returned features.
    #[must_use]
    pub fn results(features: Vec<Feature>) -> Self {
        let number_returned = features.len() as u64;
        Self {
            features,
            number_returned: Some(number_returned),
            number_matched: None,
        }
    }

    /// Build a hits-mode collection carrying only the match count.
    #[must_use]
    pub fn hits(number_matched: u64) -> Self {
        Self {
            features: Vec::new(),
            number_returned: None,
            number_matched: Some(number_matched),
        }
    }
}
