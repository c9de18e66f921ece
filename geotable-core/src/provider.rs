//! The feature-provider boundary and its error taxonomy.
//!
//! Providers translate a [`QueryIntent`] into backend queries and reshape
//! the results into a [`FeatureCollection`]. Failures abort the whole call:
//! there is no partial-result mode, and features accumulated before a
//! mid-query failure are discarded.

use thiserror::Error;

use crate::{Feature, FeatureCollection, QueryIntent};

/// Errors surfaced by [`FeatureProvider`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The remote response could not be parsed into the expected structure.
    #[error("malformed backend response: {message}")]
    Query {
        /// Description of the parse failure.
        message: String,
    },
    /// The remote call returned a client or server error status.
    #[error("request to {url} failed with HTTP status {status}")]
    Connection {
        /// Request URL.
        url: String,
        /// HTTP status code received.
        status: u16,
    },
    /// The remote call failed before a status was received.
    #[error("network error for {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Description of the transport failure.
        message: String,
    },
    /// A single-feature lookup matched no rows.
    #[error("feature {identifier:?} not found")]
    NotFound {
        /// Identifier that matched nothing.
        identifier: String,
    },
    /// A row was missing its id field or a coordinate field.
    #[error("row is missing required field {field:?}")]
    MissingField {
        /// Name of the absent field.
        field: String,
    },
    /// A coordinate field held a value that is not a number.
    #[error("field {field:?} is not a coordinate: {value}")]
    InvalidCoordinate {
        /// Name of the coordinate field.
        field: String,
        /// Offending value, rendered as JSON.
        value: String,
    },
}

/// Query features from a backing datastore.
pub trait FeatureProvider {
    /// Run a query and assemble a feature collection.
    ///
    /// In hits mode the collection carries only the match count and no
    /// features are materialised.
    ///
    /// # Errors
    ///
    /// Any backend failure aborts the call; see [`ProviderError`].
    fn query(&self, intent: &QueryIntent) -> Result<FeatureCollection, ProviderError>;

    /// Fetch the single feature with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] when no row matches, in addition
    /// to the backend failures of [`FeatureProvider::query`].
    fn get(&self, identifier: &str) -> Result<Feature, ProviderError>;
}
