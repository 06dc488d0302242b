//! Integration tests for IR → NRQL compilation.

use insta::assert_snapshot;
use mqlens::compile::{compile, CompileOptions, Compiler};
use mqlens::model::{FilterClause, MetricType, QueryModel, TimeRange};
use mqlens::nrql::{Dialect, Limit, OrderByExpr};

fn topic_bytes() -> QueryModel {
    QueryModel::from_collection("AwsMskTopicSample")
        .select_expr("average(provider.bytesInPerSec.Sum) AS 'bytesIn'")
        .facet("provider.topic")
        .metric_type(MetricType::Topic)
}

// ============================================================================
// Flat queries
// ============================================================================

#[test]
fn test_full_clause_order() {
    let ir = topic_bytes()
        .filter("(provider.clusterName) IN ('prod')")
        .order_by(OrderByExpr::desc("bytesIn"))
        .limit(Limit::Count(5))
        .timeseries();

    let nrql = Compiler::new(Dialect::MskPolling)
        .time_range(TimeRange::between(1_700_000_000_000, 1_700_000_600_000))
        .compile(&ir);

    assert_snapshot!(nrql, @"SELECT average(provider.bytesInPerSec.Sum) AS 'bytesIn' FROM AwsMskTopicSample WHERE (provider.clusterName) IN ('prod') FACET provider.topic SINCE 1700000000000 UNTIL 1700000600000 ORDER BY bytesIn DESC LIMIT 5 TIMESERIES");
}

#[test]
fn test_caller_filters_come_first() {
    let ir = topic_bytes().filter("(provider.topic) IN ('orders')");
    let nrql = compile(
        &ir,
        Dialect::MskPolling,
        false,
        &[FilterClause::raw("(provider.clusterName) IN ('prod')")],
    );

    let caller = nrql.find("provider.clusterName").unwrap();
    let own = nrql.find("(provider.topic) IN").unwrap();
    assert!(caller < own);
}

#[test]
fn test_confluent_joins_with_and() {
    let ir = QueryModel::from_collection("Metric")
        .select_expr("rate(sum(confluent.kafka.server.received_bytes), 1 second)")
        .filter("(kafka.id) IN ('lkc-1')")
        .filter("(topic) IN ('orders')")
        .metric_type(MetricType::Topic);

    let nrql = Compiler::new(Dialect::Confluent).compile(&ir);
    assert!(nrql.contains("WHERE (kafka.id) IN ('lkc-1') AND (topic) IN ('orders')"));
}

#[test]
fn test_confluent_cluster_tier_rewrites_topic_per_clause() {
    let ir = QueryModel::from_collection("Metric")
        .select_expr("uniqueCount(kafka.id)")
        .filter("(topic) IN ('orders')")
        .metric_type(MetricType::Cluster);

    let nrql = Compiler::new(Dialect::Confluent).compile(&ir);
    assert_snapshot!(nrql, @"SELECT uniqueCount(kafka.id) FROM Metric WHERE (kafka.id) IN (SELECT uniques(kafka.id) FROM Metric WHERE (topic) IN ('orders'))");
}

// ============================================================================
// Legacy concatenation
// ============================================================================

#[test]
fn test_legacy_concatenation_is_dialect_scoped() {
    let filters = [
        FilterClause::raw("(provider.brokerId) IN ('1')"),
        FilterClause::raw("(provider.clusterName) IN ('prod')"),
    ];
    let ir = QueryModel::from_collection("AwsMskBrokerSample")
        .select_expr("count(*)")
        .metric_type(MetricType::Broker);

    let legacy = compile(&ir, Dialect::MskPolling, false, &filters);
    assert!(
        legacy.ends_with("WHERE (provider.brokerId) IN ('1')(provider.clusterName) IN ('prod')")
    );

    let strict = Compiler::new(Dialect::MskPolling)
        .with_options(CompileOptions::default().with_strict_and_join(true))
        .compile(&ir.with_filters_prepended(&filters));
    assert!(strict
        .ends_with("WHERE (provider.brokerId) IN ('1') AND (provider.clusterName) IN ('prod')"));
}

// ============================================================================
// Nesting
// ============================================================================

#[test]
fn test_nested_rollup_with_cross_tier_filter() {
    let inner = QueryModel::from_collection("AwsMskClusterSample")
        .select_expr("latest(provider.activeControllerCount.Sum) AS 'activeControllers'")
        .facet("provider.clusterName")
        .limit(Limit::Max)
        .metric_type(MetricType::Cluster);
    let ir = QueryModel::nested(inner)
        .select_expr("filter(count(*), WHERE activeControllers != 1) AS 'Unhealthy clusters'")
        .filter("(provider.topic) IN ('orders')");

    let nrql = Compiler::new(Dialect::MskPolling)
        .time_range(TimeRange::last_minutes(30))
        .compile(&ir);

    assert_snapshot!(nrql, @"SELECT filter(count(*), WHERE activeControllers != 1) AS 'Unhealthy clusters' FROM (SELECT latest(provider.activeControllerCount.Sum) AS 'activeControllers' FROM AwsMskClusterSample WHERE (provider.clusterName) IN (SELECT uniques(provider.clusterName) FROM AwsMskTopicSample WHERE (provider.topic) IN ('orders')) FACET provider.clusterName LIMIT MAX) SINCE 30 MINUTES AGO");
}

#[test]
fn test_deeply_nested_filters_reach_the_leaf() {
    let leaf = QueryModel::from_collection("Metric")
        .select_expr("average(aws.kafka.BytesInPerSec.byBroker) AS 'b'")
        .facet("aws.kafka.BrokerID")
        .limit(Limit::Max)
        .metric_type(MetricType::Broker);
    let middle = QueryModel::nested(leaf).select_expr("sum(b) AS 'b'");
    let root = QueryModel::nested(middle)
        .select_expr("max(b)")
        .filter("(aws.kafka.ClusterName) IN ('prod')");

    let nrql = Compiler::new(Dialect::MskMetricStream).compile(&root);

    assert_eq!(nrql.matches("WHERE").count(), 1);
    assert!(nrql.contains("FROM Metric WHERE (aws.kafka.ClusterName) IN ('prod') FACET"));
}

#[test]
fn test_navigator_subquery_shape_end_to_end() {
    let ir = QueryModel::from_collection("AwsMskClusterSample")
        .select_expr("uniqueCount(provider.clusterName)")
        .metric_type(MetricType::Cluster);

    let nrql = compile(
        &ir,
        Dialect::MskPolling,
        true,
        &[FilterClause::in_list("provider.brokerId", ["1"])],
    );

    assert_snapshot!(nrql, @"SELECT uniqueCount(provider.clusterName) FROM AwsMskClusterSample WHERE (provider.clusterName) IN (SELECT provider.clusterName FROM AwsMskBrokerSample WHERE (provider.brokerId) IN ('1') LIMIT MAX)");
}

#[test]
fn test_compilation_is_deterministic() {
    let ir = topic_bytes().filter("(tags.env) IN ('prod')");
    let compiler = Compiler::new(Dialect::MskPolling).time_range(TimeRange::last_minutes(5));
    let outputs: Vec<String> = (0..4).map(|_| compiler.compile(&ir)).collect();
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}
