//! Metric identifiers shown on the dashboard.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ParseError;

/// Logical metric id. Providers populate a subset of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    TotalClusters,
    UnhealthyClusters,
    HealthyClusters,
    TotalBrokers,
    TotalTopics,
    TotalPartitions,
    ClusterIncomingThroughput,
    ClusterOutgoingThroughput,
    ClusterMessageRate,
    BrokerIncomingThroughput,
    BrokerOutgoingThroughput,
    TopicIncomingThroughput,
    TopicOutgoingThroughput,
    TopTopicsByIncomingThroughput,
    TopBrokersByIncomingThroughput,
    ActiveControllers,
    OfflinePartitions,
    UnderReplicatedPartitions,
    AverageTopicThroughput,
    ClusterOverview,
}

impl MetricId {
    pub const ALL: [MetricId; 20] = [
        MetricId::TotalClusters,
        MetricId::UnhealthyClusters,
        MetricId::HealthyClusters,
        MetricId::TotalBrokers,
        MetricId::TotalTopics,
        MetricId::TotalPartitions,
        MetricId::ClusterIncomingThroughput,
        MetricId::ClusterOutgoingThroughput,
        MetricId::ClusterMessageRate,
        MetricId::BrokerIncomingThroughput,
        MetricId::BrokerOutgoingThroughput,
        MetricId::TopicIncomingThroughput,
        MetricId::TopicOutgoingThroughput,
        MetricId::TopTopicsByIncomingThroughput,
        MetricId::TopBrokersByIncomingThroughput,
        MetricId::ActiveControllers,
        MetricId::OfflinePartitions,
        MetricId::UnderReplicatedPartitions,
        MetricId::AverageTopicThroughput,
        MetricId::ClusterOverview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricId::TotalClusters => "total_clusters",
            MetricId::UnhealthyClusters => "unhealthy_clusters",
            MetricId::HealthyClusters => "healthy_clusters",
            MetricId::TotalBrokers => "total_brokers",
            MetricId::TotalTopics => "total_topics",
            MetricId::TotalPartitions => "total_partitions",
            MetricId::ClusterIncomingThroughput => "cluster_incoming_throughput",
            MetricId::ClusterOutgoingThroughput => "cluster_outgoing_throughput",
            MetricId::ClusterMessageRate => "cluster_message_rate",
            MetricId::BrokerIncomingThroughput => "broker_incoming_throughput",
            MetricId::BrokerOutgoingThroughput => "broker_outgoing_throughput",
            MetricId::TopicIncomingThroughput => "topic_incoming_throughput",
            MetricId::TopicOutgoingThroughput => "topic_outgoing_throughput",
            MetricId::TopTopicsByIncomingThroughput => "top_topics_by_incoming_throughput",
            MetricId::TopBrokersByIncomingThroughput => "top_brokers_by_incoming_throughput",
            MetricId::ActiveControllers => "active_controllers",
            MetricId::OfflinePartitions => "offline_partitions",
            MetricId::UnderReplicatedPartitions => "under_replicated_partitions",
            MetricId::AverageTopicThroughput => "average_topic_throughput",
            MetricId::ClusterOverview => "cluster_overview",
        }
    }
}

impl FromStr for MetricId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ParseError::UnknownMetric(s.to_string()))
    }
}

impl std::fmt::Display for MetricId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
