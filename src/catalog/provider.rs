//! Telemetry providers and collection methods.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ParseError;

/// A Kafka telemetry provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "AWS_MSK")]
    AwsMsk,
    #[serde(rename = "CONFLUENT_CLOUD")]
    ConfluentCloud,
}

impl Provider {
    /// Wire name used by the dashboard.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::AwsMsk => "AWS_MSK",
            Provider::ConfluentCloud => "CONFLUENT_CLOUD",
        }
    }

    pub fn all() -> [Provider; 2] {
        [Provider::AwsMsk, Provider::ConfluentCloud]
    }
}

impl FromStr for Provider {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws_msk" | "aws-msk" | "msk" => Ok(Provider::AwsMsk),
            "confluent_cloud" | "confluent-cloud" | "confluent" => Ok(Provider::ConfluentCloud),
            _ => Err(ParseError::UnknownProvider(s.to_string())),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How telemetry reached the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionMethod {
    /// Periodic API polling, one sample event type per tier.
    Polling,
    /// Dimensional metrics pushed by a metric stream.
    MetricStream,
}

impl CollectionMethod {
    /// Pick the collection method for a provider.
    ///
    /// Confluent Cloud only exports metrics, so the preference only matters
    /// for MSK.
    pub fn resolve(prefer_streaming: bool, provider: Provider) -> CollectionMethod {
        match provider {
            Provider::AwsMsk if prefer_streaming => CollectionMethod::MetricStream,
            Provider::AwsMsk => CollectionMethod::Polling,
            Provider::ConfluentCloud => CollectionMethod::MetricStream,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionMethod::Polling => "polling",
            CollectionMethod::MetricStream => "metric_stream",
        }
    }
}

impl std::fmt::Display for CollectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
