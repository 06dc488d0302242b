//! Integration tests for the builtin metric catalog.
//!
//! Every template is compiled for its own dialect and checked for
//! well-formed output.

use mqlens::build::{build_query, QueryRequest};
use mqlens::catalog::{Catalog, CollectionMethod, Lookup, MetricId, Provider};
use mqlens::compile::Compiler;
use mqlens::model::{MetricType, PrecomputedStatics, Source};
use mqlens::nrql::Dialect;

fn balanced(text: &str) -> bool {
    let mut depth = 0i32;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn test_lookup_by_provider_name() {
    let catalog = Catalog::builtin();

    let found = catalog.lookup("AWS_MSK", CollectionMethod::Polling, MetricId::TotalBrokers);
    assert!(matches!(found, Lookup::Found(_)));
    assert_eq!(
        found.template(),
        catalog.get(Provider::AwsMsk, CollectionMethod::Polling, MetricId::TotalBrokers)
    );

    assert_eq!(
        catalog.lookup("X", CollectionMethod::Polling, MetricId::TotalBrokers),
        Lookup::UnsupportedProvider
    );
    assert_eq!(
        catalog.lookup(
            "CONFLUENT_CLOUD",
            CollectionMethod::MetricStream,
            MetricId::TotalBrokers
        ),
        Lookup::UnknownMetric
    );
}

#[test]
fn test_provider_names_are_case_insensitive() {
    let catalog = Catalog::builtin();
    let lower = catalog.lookup("aws_msk", CollectionMethod::Polling, MetricId::TotalClusters);
    let upper = catalog.lookup("AWS_MSK", CollectionMethod::Polling, MetricId::TotalClusters);
    assert_eq!(lower, upper);
}

#[test]
fn test_confluent_is_metric_stream_only() {
    let catalog = Catalog::builtin();
    assert!(catalog
        .metrics(Provider::ConfluentCloud, CollectionMethod::Polling)
        .is_empty());

    let metrics = catalog.metrics(Provider::ConfluentCloud, CollectionMethod::MetricStream);
    assert!(metrics.contains(&MetricId::TotalClusters));
    assert!(metrics.contains(&MetricId::TopicIncomingThroughput));
    assert!(!metrics.contains(&MetricId::BrokerIncomingThroughput));
}

#[test]
fn test_template_tiers() {
    let catalog = Catalog::builtin();
    let tier = |metric| {
        catalog
            .get(Provider::AwsMsk, CollectionMethod::Polling, metric)
            .map(|t| t.metric_type)
    };

    assert_eq!(tier(MetricId::TotalClusters), Some(MetricType::Cluster));
    assert_eq!(tier(MetricId::BrokerIncomingThroughput), Some(MetricType::Broker));
    assert_eq!(tier(MetricId::TopicIncomingThroughput), Some(MetricType::Topic));
}

#[test]
fn test_rollups_read_from_nested_queries() {
    let template = Catalog::builtin()
        .get(Provider::AwsMsk, CollectionMethod::Polling, MetricId::HealthyClusters)
        .unwrap();
    assert!(matches!(template.from, Source::Nested(_)));
    assert!(template.is_nested());
}

// ============================================================================
// Every template compiles
// ============================================================================

#[test]
fn test_every_template_compiles_to_one_line() {
    for (key, template) in Catalog::builtin().iter() {
        let dialect = Dialect::for_provider(key.provider, key.method).unwrap();
        let nrql = Compiler::new(dialect).compile(template);

        assert!(nrql.starts_with("SELECT "), "{key}: {nrql}");
        assert!(!nrql.contains('\n'), "{key}: {nrql}");
        assert!(balanced(&nrql), "{key}: unbalanced parentheses in {nrql}");
    }
}

#[test]
fn test_every_built_query_has_no_placeholders_left() {
    let catalog = Catalog::builtin();
    for provider in Provider::all() {
        for prefer_streaming in [false, true] {
            let method = CollectionMethod::resolve(prefer_streaming, provider);
            for metric in catalog.metrics(provider, method) {
                let request = QueryRequest::new(provider.as_str(), metric)
                    .prefer_streaming(prefer_streaming)
                    .filter("(tags.env) IN ('prod')")
                    .statics(PrecomputedStatics {
                        total_clusters: 3,
                        total_brokers: 9,
                        total_topics: 27,
                    });
                let compiled = build_query(&request).unwrap();

                assert!(!compiled.nrql.contains('{'), "{metric}: {}", compiled.nrql);
                assert!(balanced(&compiled.nrql), "{metric}: {}", compiled.nrql);
                assert!(compiled.nrql.contains("(tags.env) IN ('prod')"));
            }
        }
    }
}
