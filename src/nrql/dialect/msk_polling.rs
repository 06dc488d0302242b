//! AWS MSK, polling integration.
//!
//! The polling integration writes one sample event type per entity tier:
//! - `AwsMskClusterSample`, `AwsMskBrokerSample`, `AwsMskTopicSample`
//! - attributes live under the `provider.` namespace
//! - topic samples also carry the broker id, so broker filters apply to them directly

use super::NrqlDialect;
use crate::catalog::{CollectionMethod, Provider};
use crate::model::MetricType;

/// AWS MSK polling dialect.
#[derive(Debug, Clone, Copy)]
pub struct MskPolling;

impl NrqlDialect for MskPolling {
    fn name(&self) -> &'static str {
        "msk_polling"
    }

    fn provider(&self) -> Provider {
        Provider::AwsMsk
    }

    fn collection_method(&self) -> CollectionMethod {
        CollectionMethod::Polling
    }

    fn source(&self, tier: MetricType) -> Option<&'static str> {
        Some(match tier {
            MetricType::Cluster => "AwsMskClusterSample",
            MetricType::Broker => "AwsMskBrokerSample",
            MetricType::Topic => "AwsMskTopicSample",
        })
    }

    fn identity(&self, tier: MetricType) -> Option<&'static str> {
        Some(match tier {
            MetricType::Cluster => "provider.clusterName",
            MetricType::Broker => "provider.brokerId",
            MetricType::Topic => "provider.topic",
        })
    }

    fn broker_attributes(&self) -> &'static [&'static str] {
        &["provider.brokerId", "provider.brokerHost"]
    }

    fn topic_attributes(&self) -> &'static [&'static str] {
        &["provider.topic"]
    }

    fn requires_tier_correlation(&self) -> bool {
        true
    }

    fn concatenates_where_clauses(&self) -> bool {
        true
    }
}
