//! Integration tests for the end-to-end request → NRQL pipeline.

use insta::assert_snapshot;
use mqlens::build::{build_query, BuildError, CompiledQuery, QueryBuilder, QueryRequest};
use mqlens::catalog::{Catalog, CatalogKey, CollectionMethod, MetricId, Provider};
use mqlens::compile::{CompileOptions, Compiler};
use mqlens::model::{MetricType, PrecomputedStatics, QueryModel, TimeRange};
use mqlens::nrql::Dialect;

// ============================================================================
// Degenerate inputs
// ============================================================================

#[test]
fn test_unsupported_provider_is_empty_object() {
    let compiled = build_query(&QueryRequest::new("X", MetricId::TotalClusters)).unwrap();

    assert_eq!(compiled, CompiledQuery::empty());
    assert!(compiled.is_empty());
    assert_eq!(serde_json::to_string(&compiled).unwrap(), "{}");
}

#[test]
fn test_unknown_metric_for_provider_is_an_error() {
    let err = build_query(&QueryRequest::new(
        "CONFLUENT_CLOUD",
        MetricId::BrokerIncomingThroughput,
    ))
    .unwrap_err();

    assert!(matches!(
        err,
        BuildError::UnknownMetric {
            provider: Provider::ConfluentCloud,
            method: CollectionMethod::MetricStream,
            metric: MetricId::BrokerIncomingThroughput,
        }
    ));
}

#[test]
fn test_no_filters_no_where() {
    let compiled = build_query(&QueryRequest::new("AWS_MSK", MetricId::TotalClusters)).unwrap();
    assert_snapshot!(compiled.nrql, @"SELECT uniqueCount(provider.clusterName) AS 'Total clusters' FROM AwsMskClusterSample");
}

#[test]
fn test_empty_request_matches_template_compilation() {
    for (key, template) in Catalog::builtin().iter() {
        let dialect = Dialect::for_provider(key.provider, key.method).unwrap();
        let request = QueryRequest::new(key.provider.as_str(), key.metric)
            .prefer_streaming(key.method == CollectionMethod::MetricStream);

        let built = build_query(&request).unwrap();
        let substituted = template.map_select_exprs(&|expr: &str| {
            expr.replace("{cluster_filters}", "")
                .replace("{broker_filters}", "")
                .replace("{topic_filters}", "")
                .replace("{total_clusters}", "0")
                .replace("{total_brokers}", "0")
                .replace("{total_topics}", "0")
        });
        let expected = Compiler::new(dialect).compile(&substituted);

        assert_eq!(built.nrql, expected, "{key}");
    }
}

// ============================================================================
// Streaming total clusters
// ============================================================================

#[test]
fn test_streaming_total_clusters_with_broker_filter() {
    let request = QueryRequest::new("AWS_MSK", MetricId::TotalClusters)
        .prefer_streaming(true)
        .filter("(aws.kafka.BrokerID) IN ('9')");
    let compiled = build_query(&request).unwrap();

    assert_eq!(compiled.dialect, Some(Dialect::MskMetricStream));
    assert!(compiled.nrql.contains(
        "filter(uniqueCount(aws.kafka.ClusterName), WHERE metricName = \
         'aws.kafka.ActiveControllerCount' AND (aws.kafka.ClusterName) IN (SELECT \
         uniques(aws.kafka.ClusterName) FROM Metric WHERE (aws.kafka.BrokerID) IN ('9')))"
    ));
    assert!(!compiled.nrql.contains("WHERE WHERE"));
    assert!(!compiled.nrql.contains("WHERE AND"));
    assert_eq!(compiled.nrql.matches("SELECT uniques(").count(), 1);

    assert_snapshot!(compiled.nrql, @"SELECT filter(uniqueCount(aws.kafka.ClusterName), WHERE metricName = 'aws.kafka.ActiveControllerCount' AND (aws.kafka.ClusterName) IN (SELECT uniques(aws.kafka.ClusterName) FROM Metric WHERE (aws.kafka.BrokerID) IN ('9'))) AS 'Total clusters' FROM Metric");
}

#[test]
fn test_placeholder_templates_do_not_repeat_filters_outside() {
    let request = QueryRequest::new("AWS_MSK", MetricId::AverageTopicThroughput)
        .prefer_streaming(true)
        .filter("(aws.kafka.BrokerID) IN ('9')")
        .filter("(tags.env) IN ('prod')")
        .statics(PrecomputedStatics {
            total_topics: 4,
            ..PrecomputedStatics::default()
        });
    let compiled = build_query(&request).unwrap();

    assert_eq!(compiled.nrql.matches("(aws.kafka.BrokerID) IN ('9')").count(), 1);
    assert_eq!(compiled.nrql.matches("(tags.env) IN ('prod')").count(), 1);
    assert!(compiled.nrql.ends_with(") / 4 AS 'Average topic throughput' FROM Metric"));
}

#[test]
fn test_streaming_placeholder_empty_without_filters() {
    let request = QueryRequest::new("AWS_MSK", MetricId::TotalBrokers).prefer_streaming(true);
    let compiled = build_query(&request).unwrap();

    assert_snapshot!(compiled.nrql, @"SELECT filter(uniqueCount(aws.kafka.ClusterName, aws.kafka.BrokerID), WHERE metricName = 'aws.kafka.BytesInPerSec.byBroker') AS 'Total brokers' FROM Metric");
}

// ============================================================================
// Merge behaviour
// ============================================================================

#[test]
fn test_statics_and_time_range() {
    let request = QueryRequest::new("AWS_MSK", MetricId::HealthyClusters)
        .statics(PrecomputedStatics {
            total_clusters: 7,
            ..PrecomputedStatics::default()
        })
        .time_range(TimeRange::last_minutes(60));
    let compiled = build_query(&request).unwrap();

    assert!(compiled.nrql.starts_with("SELECT 7 - filter(count(*), WHERE "));
    assert!(compiled.nrql.ends_with(" SINCE 60 MINUTES AGO"));
    assert_eq!(compiled.nrql.matches("SINCE").count(), 1);
}

#[test]
fn test_extra_facets_are_appended() {
    let request = QueryRequest::new("AWS_MSK", MetricId::BrokerIncomingThroughput)
        .facet("provider.brokerHost");
    let compiled = build_query(&request).unwrap();

    assert!(compiled
        .nrql
        .contains("FACET provider.clusterName, provider.brokerId, provider.brokerHost"));
}

#[test]
fn test_tag_filters_are_correlated_before_merge() {
    let request = QueryRequest::new("AWS_MSK", MetricId::TopicIncomingThroughput)
        .filter("(tags.env) IN ('prod')");
    let compiled = build_query(&request).unwrap();

    assert!(compiled.nrql.contains(
        "WHERE (provider.clusterName) IN (SELECT uniques(provider.clusterName) FROM \
         AwsMskClusterSample WHERE (tags.env) IN ('prod'))"
    ));
}

#[test]
fn test_navigator_request_changes_subquery_shape() {
    let base = QueryRequest::new("AWS_MSK", MetricId::TotalClusters)
        .filter("(provider.topic) IN ('orders')");

    let membership = build_query(&base).unwrap();
    assert!(membership
        .nrql
        .contains("SELECT uniques(provider.clusterName) FROM AwsMskTopicSample"));

    let navigator = build_query(&base.clone().navigator(true)).unwrap();
    assert!(navigator.nrql.contains("SELECT provider.clusterName FROM AwsMskTopicSample"));
    assert!(navigator.nrql.contains("LIMIT MAX)"));
}

#[test]
fn test_builder_options_apply() {
    let request = QueryRequest::new("AWS_MSK", MetricId::BrokerIncomingThroughput)
        .filter("(provider.brokerId) IN ('1')")
        .filter("(provider.clusterName) IN ('prod')");

    let legacy = build_query(&request).unwrap();
    assert!(legacy.nrql.contains("IN ('1')(provider.clusterName)"));

    let strict = QueryBuilder::default()
        .with_options(CompileOptions::default().with_strict_and_join(true))
        .build(&request)
        .unwrap();
    assert!(strict.nrql.contains("IN ('1') AND (provider.clusterName)"));
}

#[test]
fn test_custom_catalog() {
    let key = CatalogKey::new(
        Provider::ConfluentCloud,
        CollectionMethod::MetricStream,
        MetricId::TotalTopics,
    );
    let catalog = Catalog::from_entries([(
        key,
        QueryModel::from_collection("Metric")
            .select_expr("uniqueCount(topic) / {total_clusters}")
            .metric_type(MetricType::Topic),
    )])
    .unwrap();

    let request = QueryRequest::new("confluent", MetricId::TotalTopics).statics(PrecomputedStatics {
        total_clusters: 2,
        ..PrecomputedStatics::default()
    });
    let compiled = QueryBuilder::new(&catalog).build(&request).unwrap();

    assert_eq!(compiled.nrql, "SELECT uniqueCount(topic) / 2 FROM Metric");
    assert_eq!(compiled.metric, Some(MetricId::TotalTopics));
}

#[test]
fn test_build_is_deterministic() {
    let request = QueryRequest::new("AWS_MSK", MetricId::ClusterOverview)
        .prefer_streaming(true)
        .filter("(aws.kafka.Topic) IN ('orders')")
        .filter("(tags.team) IN ('data')");

    let first = build_query(&request).unwrap();
    let second = build_query(&request).unwrap();
    assert_eq!(first, second);
}
