//! CKAN datastore provider: schema discovery, request assembly and the
//! incremental fetch loop.

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::sync::OnceLock;

use geotable_core::{
    Feature, FeatureCollection, FeatureProvider, ProviderError, QueryIntent, ResultType,
};
use serde_json::Value;

use super::api::SearchParams;
use super::clauses::{filter_clause, order_clause};
use super::translate::{ReservedFields, make_feature};
use super::transport::DatastoreTransport;

/// Configuration for [`CkanProvider`].
///
/// All values identify the remote resource and its column roles; they are
/// supplied once at construction and never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CkanProviderConfig {
    /// Opaque identifier of the remote tabular resource.
    pub resource_id: String,
    /// Column holding the feature identifier.
    pub id_field: String,
    /// Column holding the x (longitude) coordinate.
    pub x_field: String,
    /// Column holding the y (latitude) coordinate.
    pub y_field: String,
    /// Fixed property projection; empty means all columns.
    pub properties: Vec<String>,
}

impl CkanProviderConfig {
    /// Configuration for `resource_id` with the given identity and
    /// coordinate columns.
    #[must_use]
    pub fn new(
        resource_id: impl Into<String>,
        id_field: impl Into<String>,
        x_field: impl Into<String>,
        y_field: impl Into<String>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            id_field: id_field.into(),
            x_field: x_field.into(),
            y_field: y_field.into(),
            properties: Vec::new(),
        }
    }

    /// Restrict fetched columns to a fixed projection.
    ///
    /// The id and coordinate columns are always fetched in addition, since
    /// they are needed to build features.
    #[must_use]
    pub fn with_properties(mut self, properties: Vec<String>) -> Self {
        self.properties = properties;
        self
    }
}

/// Cached result of schema discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Column type tags keyed by column name.
    pub fields: HashMap<String, String>,
    /// Total row count reported by the remote at discovery time.
    ///
    /// Not refreshed for the provider's lifetime, even if the remote
    /// dataset grows or shrinks afterwards.
    pub total: u64,
}

/// Feature provider over a CKAN-style `datastore_search` API.
///
/// The remote caps the rows returned per call independent of the requested
/// limit, so one query may fan out into several sequential calls: the fetch
/// loop advances an offset cursor and appends translated pages until the
/// caller's page is filled, the dataset's known size is reached, or an
/// empty page signals the end of the data.
///
/// Schema discovery runs once per provider instance, on first use, behind a
/// [`OnceLock`]. If concurrent callers race on the first query, both may
/// issue the discovery request; only one result is kept.
#[derive(Debug)]
pub struct CkanProvider<T> {
    transport: T,
    config: CkanProviderConfig,
    schema: OnceLock<Schema>,
}

impl<T: DatastoreTransport> CkanProvider<T> {
    /// Create a provider over the given transport.
    #[must_use]
    pub fn new(transport: T, config: CkanProviderConfig) -> Self {
        Self {
            transport,
            config,
            schema: OnceLock::new(),
        }
    }

    /// Column descriptors and total row count for the configured resource.
    ///
    /// Issues the one-time discovery request if it has not run yet.
    ///
    /// # Errors
    ///
    /// Fails when the discovery call fails or its response is malformed.
    pub fn schema(&self) -> Result<&Schema, ProviderError> {
        self.ensure_schema()
    }

    fn ensure_schema(&self) -> Result<&Schema, ProviderError> {
        if let Some(schema) = self.schema.get() {
            return Ok(schema);
        }
        let fetched = self.fetch_schema()?;
        Ok(self.schema.get_or_init(|| fetched))
    }

    /// One-row discovery request carrying the total count and the column
    /// descriptors.
    fn fetch_schema(&self) -> Result<Schema, ProviderError> {
        let mut params = SearchParams::new(&self.config.resource_id, 0, 1);
        params.include_total = true;
        if !self.config.properties.is_empty() {
            params.fields = Some(self.projection(&[]));
        }

        log::debug!("discovering schema for resource {}", self.config.resource_id);
        let envelope = self.transport.search(&params)?;

        let fields = envelope
            .result
            .fields
            .into_iter()
            .map(|descriptor| (descriptor.id, descriptor.kind))
            .collect();
        let total = envelope.result.total.ok_or_else(|| ProviderError::Query {
            message: format!(
                "discovery response for resource {} is missing a total row count",
                self.config.resource_id
            ),
        })?;

        Ok(Schema { fields, total })
    }

    /// Comma-joined union of the fixed projection, the caller's selection
    /// and the reserved id/coordinate columns, sorted for a stable request.
    fn projection(&self, select_properties: &[String]) -> String {
        let mut names: BTreeSet<&str> = self.config.properties.iter().map(String::as_str).collect();
        names.extend(select_properties.iter().map(String::as_str));
        names.insert(self.config.id_field.as_str());
        names.insert(self.config.x_field.as_str());
        names.insert(self.config.y_field.as_str());
        names.into_iter().collect::<Vec<_>>().join(",")
    }

    fn reserved(&self) -> ReservedFields<'_> {
        ReservedFields {
            id_field: &self.config.id_field,
            x_field: &self.config.x_field,
            y_field: &self.config.y_field,
        }
    }

    fn load(
        &self,
        intent: &QueryIntent,
        identifier: Option<&str>,
    ) -> Result<FeatureCollection, ProviderError> {
        let schema = self.ensure_schema()?;

        let mut params = SearchParams::new(&self.config.resource_id, intent.offset, intent.limit);
        if !self.config.properties.is_empty() || !intent.select_properties.is_empty() {
            params.fields = Some(self.projection(&intent.select_properties));
        }

        if let Some(identifier) = identifier {
            // Exact-match lookup on the id column. Sorting and hit counts do
            // not apply to a single-identifier fetch.
            let filter = [(self.config.id_field.clone(), Value::from(identifier))];
            params.filters = Some(filter_clause(&filter));
        } else {
            if !intent.filters.is_empty() || intent.bbox.is_some() {
                // Point data has no native spatial filter path: a bounding
                // box only triggers sending the equality filters.
                params.filters = Some(filter_clause(&intent.filters));
            }
            if intent.result_type == ResultType::Hits {
                params.include_total = true;
            }
            if !intent.sortby.is_empty() {
                params.sort = Some(order_clause(&intent.sortby));
            }
        }

        let first = self.transport.search(&params)?;

        if identifier.is_none() && intent.result_type == ResultType::Hits {
            let total = first.result.total.ok_or_else(|| ProviderError::Query {
                message: "hits response is missing a total row count".to_owned(),
            })?;
            return Ok(FeatureCollection::hits(total));
        }

        let reserved = self.reserved();
        let mut features = first
            .result
            .records
            .iter()
            .map(|record| make_feature(record, &reserved, intent.skip_geometry))
            .collect::<Result<Vec<_>, _>>()?;

        // The fetch target is pinned to the first response's reported cap
        // (bounded by the dataset's known size); later responses' caps are
        // not consulted.
        let step = features.len() as u64;
        let target = first.result.limit.min(schema.total);

        if step > 0 {
            while (features.len() as u64) < target {
                params.offset += step;
                log::debug!("fetching next page at offset {}", params.offset);
                let next = self.transport.search(&params)?;
                let mut batch = next
                    .result
                    .records
                    .iter()
                    .map(|record| make_feature(record, &reserved, intent.skip_geometry))
                    .collect::<Result<Vec<_>, _>>()?;
                if batch.is_empty() {
                    // End of data before the target was reached.
                    break;
                }
                features.append(&mut batch);
            }
        }

        // Whole pages are appended above, so the accumulation can overshoot
        // the caller's limit; trim before assembly.
        features.truncate(usize::try_from(intent.limit).unwrap_or(usize::MAX));
        Ok(FeatureCollection::results(features))
    }
}

impl<T: DatastoreTransport> FeatureProvider for CkanProvider<T> {
    fn query(&self, intent: &QueryIntent) -> Result<FeatureCollection, ProviderError> {
        self.load(intent, None)
    }

    fn get(&self, identifier: &str) -> Result<Feature, ProviderError> {
        let collection = self.load(&QueryIntent::default(), Some(identifier))?;
        collection
            .features
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound {
                identifier: identifier.to_owned(),
            })
    }
}
