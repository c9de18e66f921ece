//! Caller-side request model.
//!
//! A [`QueryIntent`] captures everything a caller can ask of a provider:
//! paging, result mode, equality filters, sorting, projection and geometry
//! handling. Construction is builder-style; defaults mirror the provider
//! interface (offset 0, limit 10, results mode).

use std::str::FromStr;

use geo::Rect;
use serde_json::Value;
use thiserror::Error;

/// Whether a query returns feature payloads or only a match count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultType {
    /// Return translated features.
    #[default]
    Results,
    /// Return only the number of matching rows.
    Hits,
}

/// Sort direction for a single sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending, written `+` in the provider interface.
    Ascending,
    /// Descending, written `-` in the provider interface.
    Descending,
}

/// Error returned when parsing an unknown sort-direction symbol.
///
/// Unknown symbols are rejected rather than defaulted: a caller writing
/// `"x"` for a direction has violated the interface contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort direction {0:?}, expected \"+\" or \"-\"")]
pub struct SortOrderParseError(String);

impl SortOrder {
    /// Remote query-language token for this direction.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = SortOrderParseError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        match symbol {
            "+" => Ok(Self::Ascending),
            "-" => Ok(Self::Descending),
            other => Err(SortOrderParseError(other.to_owned())),
        }
    }
}

/// One sort key: a property name and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBy {
    /// Property to sort on.
    pub property: String,
    /// Direction for this key.
    pub order: SortOrder,
}

impl SortBy {
    /// Construct a sort key.
    #[must_use]
    pub fn new(property: impl Into<String>, order: SortOrder) -> Self {
        Self {
            property: property.into(),
            order,
        }
    }
}

/// A caller's query: paging, result mode, filters, sorting and projection.
///
/// Bounding box, datetime and free-text filters are accepted for interface
/// compatibility; providers that cannot translate them into backend clauses
/// ignore them.
///
/// # Examples
///
/// ```
/// use geotable_core::{QueryIntent, SortBy, SortOrder};
/// use serde_json::json;
///
/// let intent = QueryIntent::new()
///     .with_limit(50)
///     .with_filter("borough", json!("Brooklyn"))
///     .with_sort_key(SortBy::new("name", SortOrder::Ascending));
///
/// assert_eq!(intent.limit, 50);
/// assert_eq!(intent.filters.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryIntent {
    /// Index of the first row to return.
    pub offset: u64,
    /// Maximum number of features to return.
    pub limit: u64,
    /// Result mode.
    pub result_type: ResultType,
    /// Optional bounding box in `(x, y)` coordinate order.
    pub bbox: Option<Rect<f64>>,
    /// Optional datetime filter (timestamp or extent).
    pub datetime: Option<String>,
    /// Equality filters as ordered `(field, value)` pairs.
    pub filters: Vec<(String, Value)>,
    /// Sort keys in precedence order.
    pub sortby: Vec<SortBy>,
    /// Property names to fetch in addition to the provider's projection.
    pub select_properties: Vec<String>,
    /// Skip geometry construction when set.
    pub skip_geometry: bool,
    /// Optional free-text search term.
    pub text: Option<String>,
}

impl Default for QueryIntent {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
            result_type: ResultType::default(),
            bbox: None,
            datetime: None,
            filters: Vec::new(),
            sortby: Vec::new(),
            select_properties: Vec::new(),
            skip_geometry: false,
            text: None,
        }
    }
}

impl QueryIntent {
    /// Create an intent with default paging (offset 0, limit 10).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the paging offset.
    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the maximum number of features to return.
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Set the result mode.
    #[must_use]
    pub fn with_result_type(mut self, result_type: ResultType) -> Self {
        self.result_type = result_type;
        self
    }

    /// Set a bounding box.
    #[must_use]
    pub fn with_bbox(mut self, bbox: Rect<f64>) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Set a datetime filter.
    #[must_use]
    pub fn with_datetime(mut self, datetime: impl Into<String>) -> Self {
        self.datetime = Some(datetime.into());
        self
    }

    /// Append an equality filter.
    #[must_use]
    pub fn with_filter(mut self, field: impl Into<String>, value: Value) -> Self {
        self.filters.push((field.into(), value));
        self
    }

    /// Append a sort key; earlier keys take precedence.
    #[must_use]
    pub fn with_sort_key(mut self, key: SortBy) -> Self {
        self.sortby.push(key);
        self
    }

    /// Set the property names to fetch in addition to the provider's own
    /// projection.
    #[must_use]
    pub fn with_select_properties(mut self, properties: Vec<String>) -> Self {
        self.select_properties = properties;
        self
    }

    /// Skip geometry construction.
    #[must_use]
    pub fn with_skip_geometry(mut self, skip: bool) -> Self {
        self.skip_geometry = skip;
        self
    }

    /// Set a free-text search term.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}
