//! Integration tests for filter classification and correlated subqueries.

use mqlens::filter::{classify, Classification, Correlator, FilterKind};
use mqlens::model::{FilterClause, MetricType};
use mqlens::nrql::Dialect;

fn clauses(texts: &[&str]) -> Vec<FilterClause> {
    texts.iter().map(|t| FilterClause::raw(*t)).collect()
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_broker_attribute_is_cross_tier_only_below_broker() {
    let clause = FilterClause::in_list("provider.brokerId", ["1"]);
    assert_eq!(
        classify(&clause, MetricType::Cluster, Dialect::MskPolling),
        FilterKind::CrossTier(MetricType::Broker)
    );
    assert_eq!(
        classify(&clause, MetricType::Broker, Dialect::MskPolling),
        FilterKind::SameTier
    );
    assert_eq!(
        classify(&clause, MetricType::Topic, Dialect::MskPolling),
        FilterKind::SameTier
    );
}

#[test]
fn test_broker_host_counts_as_broker_attribute() {
    let clause = FilterClause::raw("(provider.brokerHost) IN ('b-1.example')");
    assert_eq!(
        classify(&clause, MetricType::Cluster, Dialect::MskPolling),
        FilterKind::CrossTier(MetricType::Broker)
    );
}

#[test]
fn test_lowercase_in_keyword_is_recognised() {
    let clause = FilterClause::raw("(aws.kafka.Topic) in ('orders')");
    assert_eq!(clause.attribute(), Some("aws.kafka.Topic"));
    assert_eq!(
        classify(&clause, MetricType::Broker, Dialect::MskMetricStream),
        FilterKind::CrossTier(MetricType::Topic)
    );
}

#[test]
fn test_classification_is_a_partition() {
    let input = clauses(&[
        "(provider.clusterName) IN ('a')",
        "(provider.topic) IN ('t')",
        "(tags.team) IN ('data')",
        "not a clause",
    ]);
    let c = Classification::new(&input, MetricType::Cluster, Dialect::MskPolling);

    assert_eq!(c.same_tier.len() + c.cross_tier.len() + c.tag.len(), input.len());
    assert!(Classification::new(&[], MetricType::Topic, Dialect::Confluent).is_empty());
}

// ============================================================================
// Correlation
// ============================================================================

#[test]
fn test_empty_input_is_idempotent() {
    for dialect in Dialect::all() {
        for tier in MetricType::all() {
            for navigator in [false, true] {
                let correlator = Correlator::new(dialect).navigator(navigator);
                assert_eq!(correlator.correlate(tier, &[]), "");
            }
        }
    }
}

#[test]
fn test_multiple_fine_filters_make_one_subquery() {
    let correlator = Correlator::new(Dialect::MskMetricStream);
    let out = correlator.correlate(
        MetricType::Cluster,
        &clauses(&[
            "(aws.kafka.BrokerID) IN ('1', '2')",
            "(aws.kafka.Topic) IN ('orders')",
            "(aws.kafka.BrokerID) IN ('3')",
        ]),
    );

    assert_eq!(out.matches("SELECT").count(), 1);
    assert_eq!(
        out,
        "(aws.kafka.ClusterName) IN (SELECT uniques(aws.kafka.ClusterName) FROM Metric WHERE \
         (aws.kafka.BrokerID) IN ('1', '2') AND (aws.kafka.Topic) IN ('orders') AND \
         (aws.kafka.BrokerID) IN ('3'))"
    );
}

#[test]
fn test_navigator_and_membership_shapes_differ() {
    let filters = clauses(&["(provider.topic) IN ('orders')"]);

    let membership = Correlator::new(Dialect::MskPolling).correlate(MetricType::Cluster, &filters);
    assert!(membership.contains("SELECT uniques(provider.clusterName)"));
    assert!(!membership.contains("LIMIT"));

    let navigator = Correlator::new(Dialect::MskPolling)
        .navigator(true)
        .correlate(MetricType::Cluster, &filters);
    assert!(navigator.contains("SELECT provider.clusterName FROM"));
    assert!(!navigator.contains("uniques("));
    assert!(navigator.ends_with("LIMIT MAX)"));
}

#[test]
fn test_tags_and_cross_tier_together() {
    let out = Correlator::new(Dialect::MskPolling).correlate(
        MetricType::Cluster,
        &clauses(&["(tags.env) IN ('prod')", "(provider.brokerId) IN ('1')"]),
    );

    assert_eq!(
        out,
        "(provider.clusterName) IN (SELECT uniques(provider.clusterName) FROM AwsMskBrokerSample \
         WHERE (provider.brokerId) IN ('1')) AND (provider.clusterName) IN (SELECT \
         uniques(provider.clusterName) FROM AwsMskClusterSample WHERE (tags.env) IN ('prod'))"
    );
}

#[test]
fn test_same_tier_only_is_plain_conjunction() {
    let out = Correlator::new(Dialect::Confluent).correlate(
        MetricType::Topic,
        &clauses(&["(topic) IN ('orders')", "(kafka.id) IN ('lkc-1')"]),
    );
    assert_eq!(out, "(topic) IN ('orders') AND (kafka.id) IN ('lkc-1')");
}

#[test]
fn test_correlation_is_deterministic() {
    let filters = clauses(&["(provider.topic) IN ('a')", "(tags.x) IN ('y')"]);
    let correlator = Correlator::new(Dialect::MskPolling);
    let first = correlator.correlate(MetricType::Cluster, &filters);
    for _ in 0..5 {
        assert_eq!(correlator.correlate(MetricType::Cluster, &filters), first);
    }
}
