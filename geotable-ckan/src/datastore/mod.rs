//! Feature provider over a CKAN-style `datastore_search` API.
//!
//! This module provides [`CkanProvider`], an implementation of
//! [`geotable_core::FeatureProvider`] that translates query intent into
//! `datastore_search` parameters and reshapes the remote's tabular rows
//! into point features.
//!
//! # Architecture
//!
//! The [`FeatureProvider`](geotable_core::FeatureProvider) trait is
//! synchronous. [`HttpTransport`] bridges the async HTTP calls to the sync
//! [`DatastoreTransport`] seam by blocking on a Tokio runtime internally;
//! the provider's fetch loop issues one transport call per remote page,
//! strictly in sequence. The remote caps the rows returned per call
//! independent of the requested limit, so a single query may fan out into
//! several sequential calls until the caller's page is filled.
//!
//! # Example
//!
//! ```no_run
//! use geotable_ckan::datastore::{CkanProvider, CkanProviderConfig, HttpTransport};
//! use geotable_core::{FeatureProvider, QueryIntent};
//!
//! let transport =
//!     HttpTransport::new("https://demo.ckan.org/api/3/action/datastore_search")?;
//! let config = CkanProviderConfig::new("d9fe24fa", "_id", "longitude", "latitude");
//! let provider = CkanProvider::new(transport, config);
//!
//! let collection = provider.query(&QueryIntent::new().with_limit(50))?;
//! println!("returned {:?}", collection.number_returned);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod api;
mod clauses;
mod provider;
mod translate;
mod transport;

#[doc(hidden)]
pub mod test_support;

pub use api::{FieldDescriptor, SearchEnvelope, SearchParams, SearchResult};
pub use provider::{CkanProvider, CkanProviderConfig, Schema};
pub use transport::{
    DEFAULT_USER_AGENT, DatastoreTransport, HttpTransport, HttpTransportConfig,
    TransportBuildError,
};
