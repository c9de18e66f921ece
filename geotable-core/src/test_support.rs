//! Test utilities for the feature-provider boundary.
//!
//! This module provides [`StaticFeatureProvider`], a deterministic
//! [`FeatureProvider`] serving a fixed feature list, for exercising
//! provider-consuming code without a backend.

use serde_json::Value;

use crate::{
    Feature, FeatureCollection, FeatureProvider, ProviderError, QueryIntent, ResultType,
};

/// In-memory `FeatureProvider` serving a fixed feature list.
///
/// Queries apply offset and limit to the stored list in order; hits-mode
/// queries report the full list length. Lookups match a feature whose id
/// renders to the requested identifier.
#[derive(Debug, Clone, Default)]
pub struct StaticFeatureProvider {
    features: Vec<Feature>,
}

impl StaticFeatureProvider {
    /// Create a provider serving `features` in the given order.
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }
}

fn id_matches(id: &Value, identifier: &str) -> bool {
    match id {
        Value::String(text) => text == identifier,
        other => other.to_string() == identifier,
    }
}

impl FeatureProvider for StaticFeatureProvider {
    fn query(&self, intent: &QueryIntent) -> Result<FeatureCollection, ProviderError> {
        if intent.result_type == ResultType::Hits {
            return Ok(FeatureCollection::hits(self.features.len() as u64));
        }
        let offset = usize::try_from(intent.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(intent.limit).unwrap_or(usize::MAX);
        let features = self
            .features
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok(FeatureCollection::results(features))
    }

    fn get(&self, identifier: &str) -> Result<Feature, ProviderError> {
        self.features
            .iter()
            .find(|feature| id_matches(&feature.id, identifier))
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                identifier: identifier.to_owned(),
            })
    }
}
