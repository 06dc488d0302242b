//! Integration tests for NerdGraph templates and cursor pagination.

use mqlens::catalog::Provider;
use mqlens::graph::templates::cluster_search;
use mqlens::graph::{
    cluster_lookup_query, entity_count_query, entity_search_page, related_entities_query,
    CursorPager, EntityFilter, GraphError,
};
use mqlens::model::MetricType;
use serde_json::{json, Value};

// ============================================================================
// Templates
// ============================================================================

#[test]
fn test_entity_counts_cover_both_providers() {
    let query = entity_count_query("ACCOUNT_ID", Some("COUNT"));

    assert!(query.query.contains("awsEntitySearch: entitySearch(query: $awsQuery)"));
    assert!(query
        .query
        .contains("confluentCloudEntitySearch: entitySearch(query: $confluentCloudQuery)"));
    assert_eq!(query.variables["awsQuery"], cluster_search(Provider::AwsMsk));
    assert_eq!(query.variables["facet"], "ACCOUNT_ID");
}

#[test]
fn test_cluster_lookup_queries_both_paths() {
    let query = cluster_lookup_query(
        1234567,
        &[EntityFilter::new(MetricType::Broker, ["1"])],
    );

    assert_eq!(query.variables["accountId"], 1234567);
    assert_eq!(
        query.variables["pollingQuery"],
        "SELECT uniques(provider.clusterName) FROM AwsMskBrokerSample WHERE \
         (provider.brokerId) IN ('1') LIMIT MAX"
    );
    assert_eq!(
        query.variables["streamingQuery"],
        "SELECT uniques(aws.kafka.ClusterName) FROM Metric WHERE \
         (aws.kafka.BrokerID) IN ('1') LIMIT MAX"
    );
    assert!(query.query.contains("polling: nrql(query: $pollingQuery)"));
    assert!(query.query.contains("streaming: nrql(query: $streamingQuery)"));
}

#[test]
fn test_lookup_values_are_quoted() {
    let query = cluster_lookup_query(1, &[EntityFilter::new(MetricType::Topic, ["o'brien"])]);
    let polling = query.variables["pollingQuery"].as_str().unwrap();
    assert!(polling.contains(r"(provider.topic) IN ('o\'brien')"));
}

#[test]
fn test_related_entities_body() {
    let guids = vec!["MXxJTkZSQXxOQXwx".to_string(), "MXxJTkZSQXxOQXwy".to_string()];
    let query = related_entities_query(&guids, Some("abc"));

    let body: Value = serde_json::from_str(&query.to_json().unwrap()).unwrap();
    assert_eq!(
        body["variables"],
        json!({
            "entityGuids": ["MXxJTkZSQXxOQXwx", "MXxJTkZSQXxOQXwy"],
            "cursor": "abc",
        })
    );
    assert!(body["query"].as_str().unwrap().contains("CONSUMES, PRODUCES"));
    assert!(body["query"].as_str().unwrap().contains("nextCursor"));
}

#[test]
fn test_templates_are_deterministic() {
    let a = entity_search_page("type = 'AWSMSKCLUSTER'", Some("c1"));
    let b = entity_search_page("type = 'AWSMSKCLUSTER'", Some("c1"));
    assert_eq!(a, b);
    assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
}

// ============================================================================
// Pagination
// ============================================================================

/// Simulated backend: returns the next cursor for the cursor it was sent.
fn fake_backend(pages: &[Option<&str>], cursor: Option<&str>) -> Option<String> {
    let index = match cursor {
        None => 0,
        Some(c) => pages.iter().position(|p| *p == Some(c)).map_or(pages.len(), |i| i + 1),
    };
    pages.get(index).copied().flatten().map(str::to_string)
}

#[test]
fn test_pagination_loop_terminates() {
    let pages = [Some("p1"), Some("p2"), None];
    let mut pager = CursorPager::new();
    let mut sent: Vec<Value> = vec![];

    while let Some(query) =
        pager.next_query(|cursor| entity_search_page("domain = 'INFRA'", cursor))
    {
        let cursor = query.variables["cursor"].as_str().map(str::to_string);
        sent.push(query.variables["cursor"].clone());
        pager.advance(fake_backend(&pages, cursor.as_deref())).unwrap();
    }

    assert_eq!(sent, vec![Value::Null, json!("p1"), json!("p2")]);
    assert_eq!(pager.pages(), 3);
    assert!(pager.is_done());
}

#[test]
fn test_pagination_rejects_cursor_regression() {
    let mut pager = CursorPager::new();
    pager.advance(Some("p1".into())).unwrap();
    pager.advance(Some("p2".into())).unwrap();

    let err = pager.advance(Some("p1".into())).unwrap_err();
    assert!(matches!(err, GraphError::CursorRegressed { cursor } if cursor == "p1"));
    assert!(pager
        .next_query(|cursor| related_entities_query(&[], cursor))
        .is_none());
}
