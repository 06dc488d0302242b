//! Confluent Cloud metrics export.
//!
//! Confluent exposes cluster and topic metrics only; there is no broker tier.

use super::NrqlDialect;
use crate::catalog::{CollectionMethod, Provider};
use crate::model::MetricType;

/// Confluent Cloud dialect.
#[derive(Debug, Clone, Copy)]
pub struct Confluent;

impl NrqlDialect for Confluent {
    fn name(&self) -> &'static str {
        "confluent"
    }

    fn provider(&self) -> Provider {
        Provider::ConfluentCloud
    }

    fn collection_method(&self) -> CollectionMethod {
        CollectionMethod::MetricStream
    }

    fn source(&self, tier: MetricType) -> Option<&'static str> {
        match tier {
            MetricType::Broker => None,
            MetricType::Cluster | MetricType::Topic => Some("Metric"),
        }
    }

    fn identity(&self, tier: MetricType) -> Option<&'static str> {
        match tier {
            MetricType::Cluster => Some("kafka.id"),
            MetricType::Broker => None,
            MetricType::Topic => Some("topic"),
        }
    }

    fn broker_attributes(&self) -> &'static [&'static str] {
        &[]
    }

    fn topic_attributes(&self) -> &'static [&'static str] {
        &["topic"]
    }
}
