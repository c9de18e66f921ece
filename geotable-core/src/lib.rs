//! Core boundary types for the geotable feature engine.
//!
//! This crate defines the feature-query boundary shared by all providers:
//! GeoJSON-shaped output types ([`Feature`], [`FeatureCollection`]), the
//! caller-side request model ([`QueryIntent`]), the [`FeatureProvider`]
//! trait, and the [`ProviderError`] taxonomy. It performs no I/O; adapter
//! crates implement the trait against concrete backends.

#![forbid(unsafe_code)]

mod feature;
mod provider;
mod query;

#[cfg(feature = "test-support")]
pub mod test_support;

pub use feature::{Feature, FeatureCollection, Geometry};
pub use provider::{FeatureProvider, ProviderError};
pub use query::{QueryIntent, ResultType, SortBy, SortOrder, SortOrderParseError};
