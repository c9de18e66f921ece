//! Wire types for the CKAN `datastore_search` action.
//!
//! Requests are plain URL query pairs; responses arrive as a JSON envelope
//! of the shape
//! `{ "result": { "fields": [...], "total": n, "limit": n, "records": [...] } }`.
//! A response that fails to decode into these types is surfaced as a
//! query error by the transport.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Query parameters for one `datastore_search` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Target resource identifier.
    pub resource_id: String,
    /// Paging cursor.
    pub offset: u64,
    /// Requested page size; the remote may apply a smaller cap of its own.
    pub limit: u64,
    /// Comma-joined projection of field names.
    pub fields: Option<String>,
    /// JSON-object-string equality filter.
    pub filters: Option<String>,
    /// Comma-joined `"<field> <asc|desc>"` tokens.
    pub sort: Option<String>,
    /// Ask the remote to report the dataset's total row count.
    pub include_total: bool,
}

impl SearchParams {
    /// Parameters for one page of `resource_id`.
    #[must_use]
    pub fn new(resource_id: impl Into<String>, offset: u64, limit: u64) -> Self {
        Self {
            resource_id: resource_id.into(),
            offset,
            limit,
            fields: None,
            filters: None,
            sort: None,
            include_total: false,
        }
    }

    /// Render the parameters as URL query pairs.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("resource_id", self.resource_id.clone()),
            ("offset", self.offset.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(fields) = &self.fields {
            query.push(("fields", fields.clone()));
        }
        if let Some(filters) = &self.filters {
            query.push(("filters", filters.clone()));
        }
        if let Some(sort) = &self.sort {
            query.push(("sort", sort.clone()));
        }
        if self.include_total {
            query.push(("include_total", "true".to_owned()));
        }
        query
    }
}

/// Top-level response envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchEnvelope {
    /// Payload of the search action.
    pub result: SearchResult,
}

/// Payload of one `datastore_search` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    /// Field descriptors for the resource's columns.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    /// Total row count; present when `include_total` was requested.
    #[serde(default)]
    pub total: Option<u64>,
    /// The per-call row cap the remote applied to this request.
    pub limit: u64,
    /// Rows as flat field-to-value mappings.
    #[serde(default)]
    pub records: Vec<Map<String, Value>>,
}

/// Remote-reported metadata for one column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDescriptor {
    /// Column name.
    pub id: String,
    /// Column type tag, e.g. `"text"` or `"numeric"`.
    #[serde(rename = "type")]
    pub kind: String,
}
