//! Confluent Cloud templates (`Metric`, `confluent.kafka.server.*`).
//!
//! Confluent reports cluster and topic metrics only, so broker metrics and
//! controller/partition health entries are absent.

use super::{rollup, MetricId};
use crate::model::{MetricType, QueryModel};
use crate::nrql::{Limit, OrderByExpr};

const METRIC: &str = "Metric";

const OVERLOADED: &str = "load > 0.8";

fn cluster_load() -> QueryModel {
    QueryModel::from_collection(METRIC)
        .select_expr("latest(confluent.kafka.server.cluster_load_percent) AS 'load'")
        .facet("kafka.id")
        .limit(Limit::Max)
        .metric_type(MetricType::Cluster)
}

fn cluster_rate(metric: &str, title: &str) -> QueryModel {
    QueryModel::from_collection(METRIC)
        .select_expr(&format!("rate(sum({metric}), 1 second) AS '{title}'"))
        .facet("kafka.id")
        .timeseries()
        .metric_type(MetricType::Cluster)
}

fn topic_rate(metric: &str, title: &str) -> QueryModel {
    QueryModel::from_collection(METRIC)
        .select_expr(&format!("rate(sum({metric}), 1 second) AS '{title}'"))
        .facet("topic")
        .timeseries()
        .metric_type(MetricType::Topic)
}

pub(super) fn entries() -> Vec<(MetricId, QueryModel)> {
    vec![
        (
            MetricId::TotalClusters,
            QueryModel::from_collection(METRIC)
                .select_expr("uniqueCount(kafka.id) AS 'Total clusters'")
                .filter("(metricName) IN ('confluent.kafka.server.received_bytes')")
                .metric_type(MetricType::Cluster),
        ),
        (
            MetricId::UnhealthyClusters,
            rollup(
                cluster_load(),
                &format!("filter(count(*), WHERE {OVERLOADED}) AS 'Unhealthy clusters'"),
            ),
        ),
        (
            MetricId::HealthyClusters,
            rollup(
                cluster_load(),
                &format!(
                    "{{total_clusters}} - filter(count(*), WHERE {OVERLOADED}) AS 'Healthy clusters'"
                ),
            ),
        ),
        (
            MetricId::TotalTopics,
            QueryModel::from_collection(METRIC)
                .select_expr("uniqueCount(kafka.id, topic) AS 'Total topics'")
                .filter("(metricName) IN ('confluent.kafka.server.received_bytes')")
                .metric_type(MetricType::Topic),
        ),
        (
            MetricId::TotalPartitions,
            rollup(
                QueryModel::from_collection(METRIC)
                    .select_expr("latest(confluent.kafka.server.partition_count) AS 'partitions'")
                    .facet("kafka.id")
                    .limit(Limit::Max)
                    .metric_type(MetricType::Cluster),
                "sum(partitions) AS 'Total partitions'",
            ),
        ),
        (
            MetricId::ClusterIncomingThroughput,
            cluster_rate("confluent.kafka.server.received_bytes", "Incoming throughput"),
        ),
        (
            MetricId::ClusterOutgoingThroughput,
            cluster_rate("confluent.kafka.server.sent_bytes", "Outgoing throughput"),
        ),
        (
            MetricId::ClusterMessageRate,
            cluster_rate("confluent.kafka.server.received_records", "Messages per second"),
        ),
        (
            MetricId::TopicIncomingThroughput,
            topic_rate("confluent.kafka.server.received_bytes", "Incoming throughput"),
        ),
        (
            MetricId::TopicOutgoingThroughput,
            topic_rate("confluent.kafka.server.sent_bytes", "Outgoing throughput"),
        ),
        (
            MetricId::TopTopicsByIncomingThroughput,
            QueryModel::from_collection(METRIC)
                .select_expr(
                    "rate(sum(confluent.kafka.server.received_bytes), 1 second) AS 'bytesIn'",
                )
                .facet("topic")
                .order_by(OrderByExpr::desc("bytesIn"))
                .limit(Limit::Count(10))
                .metric_type(MetricType::Topic),
        ),
        (
            MetricId::AverageTopicThroughput,
            QueryModel::from_collection(METRIC)
                .select_expr(
                    "rate(sum(confluent.kafka.server.received_bytes), 1 second) / {total_topics} AS 'Average topic throughput'",
                )
                .metric_type(MetricType::Topic),
        ),
    ]
}
