//! AWS MSK, CloudWatch metric stream.
//!
//! Every tier lands in the `Metric` event type; tiers are told apart by the
//! CloudWatch dimensions copied onto each data point (`aws.kafka.*`).

use super::NrqlDialect;
use crate::catalog::{CollectionMethod, Provider};
use crate::model::MetricType;

/// AWS MSK metric-stream dialect.
#[derive(Debug, Clone, Copy)]
pub struct MskMetricStream;

impl NrqlDialect for MskMetricStream {
    fn name(&self) -> &'static str {
        "msk_metric_stream"
    }

    fn provider(&self) -> Provider {
        Provider::AwsMsk
    }

    fn collection_method(&self) -> CollectionMethod {
        CollectionMethod::MetricStream
    }

    fn source(&self, _tier: MetricType) -> Option<&'static str> {
        Some("Metric")
    }

    fn identity(&self, tier: MetricType) -> Option<&'static str> {
        Some(match tier {
            MetricType::Cluster => "aws.kafka.ClusterName",
            MetricType::Broker => "aws.kafka.BrokerID",
            MetricType::Topic => "aws.kafka.Topic",
        })
    }

    fn broker_attributes(&self) -> &'static [&'static str] {
        &["aws.kafka.BrokerID"]
    }

    fn topic_attributes(&self) -> &'static [&'static str] {
        &["aws.kafka.Topic"]
    }

    fn requires_tier_correlation(&self) -> bool {
        true
    }
}
