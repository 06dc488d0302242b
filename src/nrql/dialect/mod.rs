//! NRQL dialect definitions and attribute namespaces.
//!
//! The same logical metric is recorded under different event types and
//! attribute names depending on how the telemetry was collected. Each
//! dialect implements `NrqlDialect` to describe its namespace:
//!
//! | Dialect | Cluster | Broker | Topic |
//! |---------|---------|--------|-------|
//! | `MskPolling` | `AwsMskClusterSample` / `provider.clusterName` | `AwsMskBrokerSample` / `provider.brokerId` | `AwsMskTopicSample` / `provider.topic` |
//! | `MskMetricStream` | `Metric` / `aws.kafka.ClusterName` | `Metric` / `aws.kafka.BrokerID` | `Metric` / `aws.kafka.Topic` |
//! | `Confluent` | `Metric` / `kafka.id` | - | `Metric` / `topic` |
//!
//! # Usage
//!
//! ```ignore
//! use mqlens::nrql::dialect::{Dialect, NrqlDialect};
//! use mqlens::model::MetricType;
//!
//! let dialect = Dialect::MskPolling;
//! assert_eq!(dialect.source(MetricType::Broker), Some("AwsMskBrokerSample"));
//! ```

mod confluent;
pub mod helpers;
mod msk_metric_stream;
mod msk_polling;

pub use confluent::Confluent;
pub use msk_metric_stream::MskMetricStream;
pub use msk_polling::MskPolling;

use serde::{Deserialize, Serialize};

use crate::catalog::{CollectionMethod, Provider};
use crate::model::MetricType;

/// NRQL dialect trait - describes one provider/collection-method namespace.
///
/// The default implementations cover the common case; dialects override
/// only what differs.
pub trait NrqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    fn provider(&self) -> Provider;

    fn collection_method(&self) -> CollectionMethod;

    // =========================================================================
    // Attribute namespace
    // =========================================================================

    /// Event type holding data for the given tier, if the dialect has one.
    fn source(&self, tier: MetricType) -> Option<&'static str>;

    /// Attribute identifying an entity of the given tier.
    fn identity(&self, tier: MetricType) -> Option<&'static str>;

    /// Attribute names that only exist on broker-level data.
    fn broker_attributes(&self) -> &'static [&'static str];

    /// Attribute names that only exist on topic-level data.
    fn topic_attributes(&self) -> &'static [&'static str];

    /// Whether an attribute is free-form entity tag metadata.
    fn is_tag_attribute(&self, attribute: &str) -> bool {
        helpers::is_tag_attribute(attribute)
    }

    // =========================================================================
    // WHERE assembly
    // =========================================================================

    /// Whether cluster-level queries route every filter through the
    /// correlated-subquery builder instead of rewriting clause by clause.
    fn requires_tier_correlation(&self) -> bool {
        false
    }

    /// Legacy quirk: WHERE clauses are glued together without `AND`.
    ///
    /// Kept for output compatibility with existing dashboards; see
    /// `CompileOptions::strict_and_join` to turn it off.
    fn concatenates_where_clauses(&self) -> bool {
        false
    }

    // =========================================================================
    // Quoting
    // =========================================================================

    /// Quote an attribute name, backticking names NRQL can't parse bare.
    fn quote_attribute(&self, attribute: &str) -> String {
        helpers::quote_backtick_if_needed(attribute)
    }
}

/// Supported dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    #[default]
    MskPolling,
    MskMetricStream,
    Confluent,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn NrqlDialect {
        match self {
            Dialect::MskPolling => &MskPolling,
            Dialect::MskMetricStream => &MskMetricStream,
            Dialect::Confluent => &Confluent,
        }
    }

    /// Resolve the dialect for a provider and collection method.
    ///
    /// Returns `None` for combinations no integration produces.
    pub fn for_provider(provider: Provider, method: CollectionMethod) -> Option<Dialect> {
        match (provider, method) {
            (Provider::AwsMsk, CollectionMethod::Polling) => Some(Dialect::MskPolling),
            (Provider::AwsMsk, CollectionMethod::MetricStream) => Some(Dialect::MskMetricStream),
            (Provider::ConfluentCloud, CollectionMethod::MetricStream) => Some(Dialect::Confluent),
            (Provider::ConfluentCloud, CollectionMethod::Polling) => None,
        }
    }

    pub fn all() -> [Dialect; 3] {
        [Dialect::MskPolling, Dialect::MskMetricStream, Dialect::Confluent]
    }
}

// Implement NrqlDialect for Dialect enum by delegating to concrete types
impl NrqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn provider(&self) -> Provider {
        self.dialect().provider()
    }

    fn collection_method(&self) -> CollectionMethod {
        self.dialect().collection_method()
    }

    fn source(&self, tier: MetricType) -> Option<&'static str> {
        self.dialect().source(tier)
    }

    fn identity(&self, tier: MetricType) -> Option<&'static str> {
        self.dialect().identity(tier)
    }

    fn broker_attributes(&self) -> &'static [&'static str] {
        self.dialect().broker_attributes()
    }

    fn topic_attributes(&self) -> &'static [&'static str] {
        self.dialect().topic_attributes()
    }

    fn is_tag_attribute(&self, attribute: &str) -> bool {
        self.dialect().is_tag_attribute(attribute)
    }

    fn requires_tier_correlation(&self) -> bool {
        self.dialect().requires_tier_correlation()
    }

    fn concatenates_where_clauses(&self) -> bool {
        self.dialect().concatenates_where_clauses()
    }

    fn quote_attribute(&self, attribute: &str) -> String {
        self.dialect().quote_attribute(attribute)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
