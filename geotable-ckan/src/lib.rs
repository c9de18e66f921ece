//! CKAN datastore adapter for the geotable feature engine.
//!
//! This crate implements [`geotable_core::FeatureProvider`] against a
//! CKAN-style `datastore_search` API: see [`datastore::CkanProvider`].

#![forbid(unsafe_code)]

pub mod datastore;
