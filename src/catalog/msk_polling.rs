//! AWS MSK templates for the polling integration (`AwsMsk*Sample`).

use super::{rollup, MetricId};
use crate::model::{MetricType, QueryModel};
use crate::nrql::{Limit, OrderByExpr};

const CLUSTER: &str = "AwsMskClusterSample";
const BROKER: &str = "AwsMskBrokerSample";
const TOPIC: &str = "AwsMskTopicSample";

const UNHEALTHY: &str = "activeControllers != 1 OR offlinePartitions > 0";

/// Latest controller and partition state per cluster.
fn cluster_state() -> QueryModel {
    QueryModel::from_collection(CLUSTER)
        .select_expr("latest(provider.activeControllerCount.Sum) AS 'activeControllers'")
        .select_expr("latest(provider.offlinePartitionsCount.Sum) AS 'offlinePartitions'")
        .facet("provider.clusterName")
        .limit(Limit::Max)
        .metric_type(MetricType::Cluster)
}

/// Per-broker average of a rate attribute, ready to be summed per cluster.
fn per_broker(attribute: &str, alias: &str) -> QueryModel {
    QueryModel::from_collection(BROKER)
        .select_expr(&format!("average({attribute}) AS '{alias}'"))
        .facet("provider.clusterName")
        .facet("provider.brokerId")
        .limit(Limit::Max)
        .metric_type(MetricType::Broker)
}

fn broker_series(attribute: &str, title: &str) -> QueryModel {
    QueryModel::from_collection(BROKER)
        .select_expr(&format!("average({attribute}) AS '{title}'"))
        .facet("provider.clusterName")
        .facet("provider.brokerId")
        .timeseries()
        .metric_type(MetricType::Broker)
}

fn topic_series(attribute: &str, title: &str) -> QueryModel {
    QueryModel::from_collection(TOPIC)
        .select_expr(&format!("sum({attribute}) AS '{title}'"))
        .facet("provider.topic")
        .timeseries()
        .metric_type(MetricType::Topic)
}

pub(super) fn entries() -> Vec<(MetricId, QueryModel)> {
    vec![
        (
            MetricId::TotalClusters,
            QueryModel::from_collection(CLUSTER)
                .select_expr("uniqueCount(provider.clusterName) AS 'Total clusters'")
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
            rollup(
                QueryModel::from_collection(BROKER)
                    .select_expr("uniqueCount(provider.brokerId) AS 'brokers'")
                    .facet("provider.clusterName")
                    .limit(Limit::Max)
                    .metric_type(MetricType::Broker),
                "sum(brokers) AS 'Total brokers'",
            ),
        ),
        (
            MetricId::TotalTopics,
            rollup(
                QueryModel::from_collection(TOPIC)
                    .select_expr("uniqueCount(provider.topic) AS 'topics'")
                    .facet("provider.clusterName")
                    .limit(Limit::Max)
                    .metric_type(MetricType::Topic),
                "sum(topics) AS 'Total topics'",
            ),
        ),
        (
            MetricId::TotalPartitions,
            rollup(
                QueryModel::from_collection(CLUSTER)
                    .select_expr("latest(provider.globalPartitionCount.Average) AS 'partitions'")
                    .facet("provider.clusterName")
                    .limit(Limit::Max)
                    .metric_type(MetricType::Cluster),
                "sum(partitions) AS 'Total partitions'",
            ),
        ),
        (
            MetricId::ClusterIncomingThroughput,
            rollup(
                per_broker("provider.bytesInPerSec.Average", "bytesIn"),
                "sum(bytesIn) AS 'Incoming throughput'",
            ),
        ),
        (
            MetricId::ClusterOutgoingThroughput,
            rollup(
                per_broker("provider.bytesOutPerSec.Average", "bytesOut"),
                "sum(bytesOut) AS 'Outgoing throughput'",
            ),
        ),
        (
            MetricId::ClusterMessageRate,
            rollup(
                per_broker("provider.messagesInPerSec.Average", "messagesIn"),
                "sum(messagesIn) AS 'Messages per second'",
            ),
        ),
        (
            MetricId::BrokerIncomingThroughput,
            broker_series("provider.bytesInPerSec.Average", "Incoming throughput"),
        ),
        (
            MetricId::BrokerOutgoingThroughput,
            broker_series("provider.bytesOutPerSec.Average", "Outgoing throughput"),
        ),
        (
            MetricId::TopicIncomingThroughput,
            topic_series("provider.bytesInPerSec.Sum", "Incoming throughput"),
        ),
        (
            MetricId::TopicOutgoingThroughput,
            topic_series("provider.bytesOutPerSec.Sum", "Outgoing throughput"),
        ),
        (
            MetricId::TopTopicsByIncomingThroughput,
            QueryModel::from_collection(TOPIC)
                .select_expr("average(provider.bytesInPerSec.Sum) AS 'bytesIn'")
                .facet("provider.topic")
                .order_by(OrderByExpr::desc("bytesIn"))
                .limit(Limit::Count(10))
                .metric_type(MetricType::Topic),
        ),
        (
            MetricId::TopBrokersByIncomingThroughput,
            QueryModel::from_collection(BROKER)
                .select_expr("average(provider.bytesInPerSec.Average) AS 'bytesIn'")
                .facet("provider.clusterName")
                .facet("provider.brokerId")
                .order_by(OrderByExpr::desc("bytesIn"))
                .limit(Limit::Count(10))
                .metric_type(MetricType::Broker),
        ),
        (
            MetricId::ActiveControllers,
            QueryModel::from_collection(CLUSTER)
                .select_expr("latest(provider.activeControllerCount.Sum) AS 'Active controllers'")
                .facet("provider.clusterName")
                .limit(Limit::Max)
                .metric_type(MetricType::Cluster),
        ),
        (
            MetricId::OfflinePartitions,
            QueryModel::from_collection(CLUSTER)
                .select_expr("latest(provider.offlinePartitionsCount.Sum) AS 'Offline partitions'")
                .facet("provider.clusterName")
                .limit(Limit::Max)
                .metric_type(MetricType::Cluster),
        ),
        (
            MetricId::UnderReplicatedPartitions,
            QueryModel::from_collection(BROKER)
                .select_expr(
                    "sum(provider.underReplicatedPartitions.Sum) AS 'Under replicated partitions'",
                )
                .facet("provider.clusterName")
                .timeseries()
                .metric_type(MetricType::Broker),
        ),
        (
            MetricId::AverageTopicThroughput,
            QueryModel::from_collection(TOPIC)
                .select_expr(
                    "sum(provider.bytesInPerSec.Sum) / {total_topics} AS 'Average topic throughput'",
                )
                .metric_type(MetricType::Topic),
        ),
        (
            MetricId::ClusterOverview,
            QueryModel::from_collection(CLUSTER)
                .select_nested(
                    QueryModel::from_collection(BROKER)
                        .select_expr("uniqueCount(provider.clusterName, provider.brokerId)")
                        .metric_type(MetricType::Broker),
                    Some("Brokers"),
                )
                .select_nested(
                    QueryModel::from_collection(TOPIC)
                        .select_expr("uniqueCount(provider.clusterName, provider.topic)")
                        .metric_type(MetricType::Topic),
                    Some("Topics"),
                )
                .metric_type(MetricType::Cluster),
        ),
    ]
}
