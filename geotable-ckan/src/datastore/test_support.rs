//! Test utilities for the datastore provider.
//!
//! This module provides [`StubTransport`], a scripted test double for
//! [`DatastoreTransport`] that replays pre-configured responses and records
//! every request, so pagination and schema-discovery behaviour can be
//! asserted without a running CKAN service.

use std::cell::RefCell;
use std::collections::VecDeque;

use geotable_core::ProviderError;
use serde_json::{Map, Value};

use super::api::{FieldDescriptor, SearchEnvelope, SearchParams, SearchResult};
use super::transport::DatastoreTransport;

/// Scripted [`DatastoreTransport`] for testing.
///
/// Responses are served in the order they were queued. Once the script is
/// exhausted, further calls receive an empty terminal page, which ends any
/// fetch loop. Every call's parameters are recorded and can be inspected
/// afterwards.
///
/// Tests that need to keep a handle on the stub after handing it to a
/// provider can pass `&StubTransport` or wrap it in `Rc`; both implement
/// [`DatastoreTransport`] via blanket impls.
#[derive(Debug, Default)]
pub struct StubTransport {
    script: RefCell<VecDeque<Result<SearchEnvelope, ProviderError>>>,
    calls: RefCell<Vec<SearchParams>>,
}

impl StubTransport {
    /// Create a stub with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful page response.
    pub fn push_page(&self, envelope: SearchEnvelope) {
        self.script.borrow_mut().push_back(Ok(envelope));
    }

    /// Queue a failed call.
    pub fn push_error(&self, error: ProviderError) {
        self.script.borrow_mut().push_back(Err(error));
    }

    /// Number of calls issued so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Parameters of every call issued so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<SearchParams> {
        self.calls.borrow().clone()
    }
}

impl DatastoreTransport for StubTransport {
    fn search(&self, params: &SearchParams) -> Result<SearchEnvelope, ProviderError> {
        self.calls.borrow_mut().push(params.clone());
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(page(Vec::new(), params.limit, None)))
    }
}

/// Build a response envelope from rows.
#[must_use]
pub fn page(records: Vec<Map<String, Value>>, limit: u64, total: Option<u64>) -> SearchEnvelope {
    SearchEnvelope {
        result: SearchResult {
            fields: Vec::new(),
            total,
            limit,
            records,
        },
    }
}

/// Build a discovery response carrying field descriptors and a total count.
#[must_use]
pub fn discovery_page(fields: &[(&str, &str)], total: u64, limit: u64) -> SearchEnvelope {
    SearchEnvelope {
        result: SearchResult {
            fields: fields
                .iter()
                .map(|(id, kind)| FieldDescriptor {
                    id: (*id).to_owned(),
                    kind: (*kind).to_owned(),
                })
                .collect(),
            total: Some(total),
            limit,
            records: Vec::new(),
        },
    }
}

/// Build one row from field/value pairs.
#[must_use]
pub fn row(entries: &[(&str, Value)]) -> Map<String, Value> {
    entries
        .iter()
        .map(|(field, value)| ((*field).to_owned(), value.clone()))
        .collect()
}
