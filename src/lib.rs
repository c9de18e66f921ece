//! Facade crate for the geotable feature engine.
//!
//! This crate re-exports the core feature-collection types and exposes the
//! CKAN datastore provider behind a feature flag.

#![forbid(unsafe_code)]

pub use geotable_core::{
    Feature, FeatureCollection, FeatureProvider, Geometry, ProviderError, QueryIntent, ResultType,
    SortBy, SortOrder, SortOrderParseError,
};

#[cfg(feature = "provider-ckan")]
pub use geotable_ckan::datastore::{
    CkanProvider, CkanProviderConfig, DatastoreTransport, HttpTransport, HttpTransportConfig,
    Schema, TransportBuildError,
};
