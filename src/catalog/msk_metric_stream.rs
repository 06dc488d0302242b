//! AWS MSK templates for CloudWatch metric streams (`Metric`).
//!
//! Several entries filter inside `filter(...)` projections and so take their
//! caller filters as precomputed, already-correlated fragments through the
//! `{cluster_filters}`, `{broker_filters}` and `{topic_filters}` placeholders.

use super::{rollup, MetricId};
use crate::model::{MetricType, QueryModel};
use crate::nrql::{Limit, OrderByExpr};

const METRIC: &str = "Metric";

const UNHEALTHY: &str = "activeControllers != 1 OR offlinePartitions > 0";

fn cluster_state() -> QueryModel {
    QueryModel::from_collection(METRIC)
        .select_expr("latest(aws.kafka.ActiveControllerCount) AS 'activeControllers'")
        .select_expr("latest(aws.kafka.OfflinePartitionsCount) AS 'offlinePartitions'")
        .facet("aws.kafka.ClusterName")
        .limit(Limit::Max)
        .metric_type(MetricType::Cluster)
}

fn per_broker(metric: &str, alias: &str) -> QueryModel {
    QueryModel::from_collection(METRIC)
        .select_expr(&format!("average({metric}) AS '{alias}'"))
        .facet("aws.kafka.ClusterName")
        .facet("aws.kafka.BrokerID")
        .limit(Limit::Max)
        .metric_type(MetricType::Broker)
}

fn broker_series(metric: &str, title: &str) -> QueryModel {
    QueryModel::from_collection(METRIC)
        .select_expr(&format!("average({metric}) AS '{title}'"))
        .facet("aws.kafka.ClusterName")
        .facet("aws.kafka.BrokerID")
        .timeseries()
        .metric_type(MetricType::Broker)
}

fn topic_series(metric: &str, title: &str) -> QueryModel {
    QueryModel::from_collection(METRIC)
        .select_expr(&format!("sum({metric}) AS '{title}'"))
        .facet("aws.kafka.Topic")
        .timeseries()
        .metric_type(MetricType::Topic)
}

pub(super) fn entries() -> Vec<(MetricId, QueryModel)> {
    vec![
        (
            MetricId::TotalClusters,
            QueryModel::from_collection(METRIC)
                .select_expr(
                    "filter(uniqueCount(aws.kafka.ClusterName), WHERE metricName = 'aws.kafka.ActiveControllerCount'{cluster_filters}) AS 'Total clusters'",
                )
                .metric_type(MetricType::Cluster),
        ),
        (
            MetricId::UnhealthyClusters,
            rollup(
                cluster_state(),
                &format!("filter(count(*), WHERE {UNHEALTHY}) AS 'Unhealthy clusters'"),
            ),
        ),
        (
            MetricId::HealthyClusters,
            rollup(
                cluster_state(),
                &format!(
                    "{{total_clusters}} - filter(count(*), WHERE {UNHEALTHY}) AS 'Healthy clusters'"
                ),
            ),
        ),
        (
            MetricId::TotalBrokers,
            QueryModel::from_collection(METRIC)
                .select_expr(
                    "filter(uniqueCount(aws.kafka.ClusterName, aws.kafka.BrokerID), WHERE metricName = 'aws.kafka.BytesInPerSec.byBroker'{broker_filters}) AS 'Total brokers'",
                )
                .metric_type(MetricType::Broker),
        ),
        (
            MetricId::TotalTopics,
            QueryModel::from_collection(METRIC)
                .select_expr(
                    "filter(uniqueCount(aws.kafka.ClusterName, aws.kafka.Topic), WHERE metricName = 'aws.kafka.BytesInPerSec.byTopic'{topic_filters}) AS 'Total topics'",
                )
                .metric_type(MetricType::Topic),
        ),
        (
            MetricId::TotalPartitions,
            rollup(
                QueryModel::from_collection(METRIC)
                    .select_expr("latest(aws.kafka.GlobalPartitionCount) AS 'partitions'")
                    .facet("aws.kafka.ClusterName")
                    .limit(Limit::Max)
                    .metric_type(MetricType::Cluster),
                "sum(partitions) AS 'Total partitions'",
            ),
        ),
        (
            MetricId::ClusterIncomingThroughput,
            rollup(
                per_broker("aws.kafka.BytesInPerSec.byBroker", "bytesIn"),
                "sum(bytesIn) AS 'Incoming throughput'",
            ),
        ),
        (
            MetricId::ClusterOutgoingThroughput,
            rollup(
                per_broker("aws.kafka.BytesOutPerSec.byBroker", "bytesOut"),
                "sum(bytesOut) AS 'Outgoing throughput'",
            ),
        ),
        (
            MetricId::ClusterMessageRate,
            rollup(
                per_broker("aws.kafka.MessagesInPerSec.byBroker", "messagesIn"),
                "sum(messagesIn) AS 'Messages per second'",
            ),
        ),
        (
            MetricId::BrokerIncomingThroughput,
            broker_series("aws.kafka.BytesInPerSec.byBroker", "Incoming throughput"),
        ),
        (
            MetricId::BrokerOutgoingThroughput,
            broker_series("aws.kafka.BytesOutPerSec.byBroker", "Outgoing throughput"),
        ),
        (
            MetricId::TopicIncomingThroughput,
            topic_series("aws.kafka.BytesInPerSec.byTopic", "Incoming throughput"),
        ),
        (
            MetricId::TopicOutgoingThroughput,
            topic_series("aws.kafka.BytesOutPerSec.byTopic", "Outgoing throughput"),
        ),
        (
            MetricId::TopTopicsByIncomingThroughput,
            QueryModel::from_collection(METRIC)
                .select_expr("average(aws.kafka.BytesInPerSec.byTopic) AS 'bytesIn'")
                .facet("aws.kafka.Topic")
                .order_by(OrderByExpr::desc("bytesIn"))
                .limit(Limit::Count(10))
                .metric_type(MetricType::Topic),
        ),
        (
            MetricId::TopBrokersByIncomingThroughput,
            QueryModel::from_collection(METRIC)
                .select_expr("average(aws.kafka.BytesInPerSec.byBroker) AS 'bytesIn'")
                .facet("aws.kafka.ClusterName")
                .facet("aws.kafka.BrokerID")
                .order_by(OrderByExpr::desc("bytesIn"))
                .limit(Limit::Count(10))
                .metric_type(MetricType::Broker),
        ),
        (
            MetricId::ActiveControllers,
            QueryModel::from_collection(METRIC)
                .select_expr("latest(aws.kafka.ActiveControllerCount) AS 'Active controllers'")
                .facet("aws.kafka.ClusterName")
                .limit(Limit::Max)
                .metric_type(MetricType::Cluster),
        ),
        (
            MetricId::OfflinePartitions,
            QueryModel::from_collection(METRIC)
                .select_expr("latest(aws.kafka.OfflinePartitionsCount) AS 'Offline partitions'")
                .facet("aws.kafka.ClusterName")
                .limit(Limit::Max)
                .metric_type(MetricType::Cluster),
        ),
        (
            MetricId::UnderReplicatedPartitions,
            QueryModel::from_collection(METRIC)
                .select_expr(
                    "sum(aws.kafka.UnderReplicatedPartitions) AS 'Under replicated partitions'",
                )
                .facet("aws.kafka.ClusterName")
                .timeseries()
                .metric_type(MetricType::Broker),
        ),
        (
            MetricId::AverageTopicThroughput,
            QueryModel::from_collection(METRIC)
                .select_expr(
                    "filter(sum(aws.kafka.BytesInPerSec.byTopic), WHERE metricName = 'aws.kafka.BytesInPerSec.byTopic'{topic_filters}) / {total_topics} AS 'Average topic throughput'",
                )
                .metric_type(MetricType::Topic),
        ),
        (
            MetricId::ClusterOverview,
            QueryModel::from_collection(METRIC)
                .select_nested(
                    QueryModel::from_collection(METRIC)
                        .select_expr("uniqueCount(aws.kafka.ClusterName, aws.kafka.BrokerID)")
                        .metric_type(MetricType::Broker),
                    Some("Brokers"),
                )
                .select_nested(
                    QueryModel::from_collection(METRIC)
                        .select_expr("uniqueCount(aws.kafka.ClusterName, aws.kafka.Topic)")
                        .metric_type(MetricType::Topic),
                    Some("Topics"),
                )
                .metric_type(MetricType::Cluster),
        ),
    ]
}
