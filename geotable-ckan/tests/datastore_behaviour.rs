//! Behavioural tests for the datastore fetch loop.
//!
//! These tests drive [`CkanProvider`] through [`StubTransport`] to verify
//! pagination, termination and error propagation without a CKAN service.

use geo::{Coord, Rect};
use geotable_ckan::datastore::test_support::{StubTransport, discovery_page, page, row};
use geotable_ckan::datastore::{CkanProvider, CkanProviderConfig};
use geotable_core::{FeatureProvider, ProviderError, QueryIntent, ResultType};
use serde_json::{Map, Value, json};

fn record(id: u64) -> Map<String, Value> {
    row(&[
        ("id", json!(id)),
        ("x", json!("1.0")),
        ("y", json!("2.0")),
        ("name", json!(format!("poi-{id}"))),
    ])
}

fn records(ids: std::ops::Range<u64>) -> Vec<Map<String, Value>> {
    ids.map(record).collect()
}

/// Stub scripted with a discovery response reporting `total` rows.
fn transport_with_total(total: u64) -> StubTransport {
    let transport = StubTransport::new();
    transport.push_page(discovery_page(
        &[
            ("id", "int"),
            ("x", "numeric"),
            ("y", "numeric"),
            ("name", "text"),
        ],
        total,
        1,
    ));
    transport
}

fn provider(transport: &StubTransport) -> CkanProvider<&StubTransport> {
    CkanProvider::new(
        transport,
        CkanProviderConfig::new("resource-1", "id", "x", "y"),
    )
}

#[test]
fn loop_accumulates_pages_until_the_requested_limit_is_met() {
    // The remote echoes the requested limit (5) but caps each page at 2 rows.
    let transport = transport_with_total(250);
    transport.push_page(page(records(0..2), 5, None));
    transport.push_page(page(records(2..4), 5, None));
    transport.push_page(page(records(4..6), 5, None));

    let provider = provider(&transport);
    let collection = provider
        .query(&QueryIntent::new().with_limit(5))
        .unwrap();

    assert_eq!(collection.number_returned, Some(5));
    assert_eq!(collection.features.len(), 5);
    assert_eq!(collection.features[4].id, json!(4));

    // discovery + three data pages, offsets advancing by the observed
    // first-page size
    let calls = transport.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[1].offset, 0);
    assert_eq!(calls[2].offset, 2);
    assert_eq!(calls[3].offset, 4);
}

#[test]
fn number_returned_never_exceeds_the_requested_limit() {
    // Pages of two rows can overshoot an odd limit; the result is trimmed.
    let transport = transport_with_total(250);
    transport.push_page(page(records(0..2), 3, None));
    transport.push_page(page(records(2..4), 3, None));

    let provider = provider(&transport);
    let collection = provider
        .query(&QueryIntent::new().with_limit(3))
        .unwrap();

    assert_eq!(collection.number_returned, Some(3));
    assert_eq!(collection.features.len(), 3);
}

#[test]
fn loop_stops_at_an_empty_terminal_page() {
    let transport = transport_with_total(250);
    transport.push_page(page(records(0..2), 10, None));
    transport.push_page(page(records(2..3), 10, None));
    // The script is now exhausted: the next call returns an empty page.

    let provider = provider(&transport);
    let collection = provider
        .query(&QueryIntent::new().with_limit(10))
        .unwrap();

    assert_eq!(collection.number_returned, Some(3));
    assert_eq!(transport.call_count(), 4);
}

#[test]
fn fetch_target_is_bounded_by_the_cached_total() {
    // The dataset holds only 3 rows; the reported per-call cap of 10 must
    // not cause over-fetching.
    let transport = transport_with_total(3);
    transport.push_page(page(records(0..2), 10, None));
    transport.push_page(page(records(2..3), 10, None));

    let provider = provider(&transport);
    let collection = provider
        .query(&QueryIntent::new().with_limit(10))
        .unwrap();

    assert_eq!(collection.number_returned, Some(3));
    // discovery + two data pages; the loop stops at the total, not the cap
    assert_eq!(transport.call_count(), 3);
}

#[test]
fn zero_limit_yields_an_empty_collection_without_paging() {
    let transport = transport_with_total(250);
    transport.push_page(page(Vec::new(), 0, None));

    let provider = provider(&transport);
    let collection = provider
        .query(&QueryIntent::new().with_limit(0))
        .unwrap();

    assert_eq!(collection.number_returned, Some(0));
    assert!(collection.features.is_empty());
    assert_eq!(transport.call_count(), 2);
    assert_eq!(transport.calls()[1].limit, 0);
}

#[test]
fn offset_past_the_end_yields_an_empty_collection() {
    let transport = transport_with_total(3);
    transport.push_page(page(Vec::new(), 10, None));

    let provider = provider(&transport);
    let collection = provider
        .query(&QueryIntent::new().with_offset(500).with_limit(10))
        .unwrap();

    assert_eq!(collection.number_returned, Some(0));
    assert_eq!(transport.call_count(), 2);
    assert_eq!(transport.calls()[1].offset, 500);
}

#[test]
fn mid_loop_failure_discards_accumulated_features() {
    let transport = transport_with_total(250);
    transport.push_page(page(records(0..2), 10, None));
    transport.push_error(ProviderError::Connection {
        url: "http://example.com/datastore_search".to_owned(),
        status: 502,
    });

    let provider = provider(&transport);
    let err = provider
        .query(&QueryIntent::new().with_limit(10))
        .unwrap_err();

    assert!(matches!(err, ProviderError::Connection { status: 502, .. }));
}

#[test]
fn first_call_failure_aborts_the_query() {
    let transport = StubTransport::new();
    transport.push_error(ProviderError::Network {
        url: "http://example.com/datastore_search".to_owned(),
        message: "connection refused".to_owned(),
    });

    let provider = provider(&transport);
    let err = provider.query(&QueryIntent::new()).unwrap_err();

    // The failure surfaces from schema discovery, before any data call.
    assert!(matches!(err, ProviderError::Network { .. }));
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn discovery_without_a_total_is_a_query_error() {
    // A well-formed discovery response that omits the row count leaves the
    // fetch loop without a target.
    let transport = StubTransport::new();
    transport.push_page(page(Vec::new(), 1, None));

    let provider = provider(&transport);
    let err = provider.query(&QueryIntent::new()).unwrap_err();

    assert!(matches!(err, ProviderError::Query { .. }));
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn hits_response_without_a_total_is_a_query_error() {
    let transport = transport_with_total(250);
    transport.push_page(page(Vec::new(), 10, None));

    let provider = provider(&transport);
    let err = provider
        .query(&QueryIntent::new().with_result_type(ResultType::Hits))
        .unwrap_err();

    assert!(matches!(err, ProviderError::Query { .. }));
}

#[test]
fn hits_mode_translates_no_rows() {
    let transport = transport_with_total(250);
    transport.push_page(page(records(0..2), 10, Some(250)));

    let provider = provider(&transport);
    let collection = provider
        .query(&QueryIntent::new().with_result_type(ResultType::Hits))
        .unwrap();

    assert!(collection.features.is_empty());
    assert_eq!(collection.number_matched, Some(250));
    assert_eq!(collection.number_returned, None);
    // no paging loop in hits mode
    assert_eq!(transport.call_count(), 2);
}

#[test]
fn bounding_box_triggers_the_filter_clause_but_adds_no_spatial_clause() {
    let transport = transport_with_total(3);
    transport.push_page(page(records(0..1), 1, None));

    let provider = provider(&transport);
    let bbox = Rect::new(Coord { x: -1.0, y: -1.0 }, Coord { x: 1.0, y: 1.0 });
    let _ = provider
        .query(&QueryIntent::new().with_bbox(bbox).with_limit(1))
        .unwrap();

    // point data has no spatial filter path; the clause is the empty match-all
    assert_eq!(transport.calls()[1].filters.as_deref(), Some("{}"));
}

#[test]
fn skip_geometry_removes_coordinates_everywhere() {
    let transport = transport_with_total(3);
    transport.push_page(page(records(0..1), 1, None));

    let provider = provider(&transport);
    let collection = provider
        .query(&QueryIntent::new().with_limit(1).with_skip_geometry(true))
        .unwrap();

    let feature = &collection.features[0];
    assert_eq!(feature.geometry, None);
    assert!(!feature.properties.contains_key("x"));
    assert!(!feature.properties.contains_key("y"));
    assert_eq!(feature.properties["name"], json!("poi-0"));
}

#[test]
fn get_returns_the_single_matching_feature() {
    let transport = transport_with_total(3);
    transport.push_page(page(records(2..3), 1, None));

    let provider = provider(&transport);
    let feature = provider.get("2").unwrap();

    assert_eq!(feature.id, json!(2));
    assert_eq!(
        transport.calls()[1].filters.as_deref(),
        Some(r#"{"id":"2"}"#)
    );
}

#[test]
fn get_on_an_unknown_identifier_fails_with_not_found() {
    let transport = transport_with_total(3);
    transport.push_page(page(Vec::new(), 1, None));

    let provider = provider(&transport);
    let err = provider.get("missing-id").unwrap_err();

    assert_eq!(
        err,
        ProviderError::NotFound {
            identifier: "missing-id".to_owned(),
        }
    );
}
