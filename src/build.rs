//! Query orchestration: catalog lookup, filter merge, placeholder
//! substitution and compilation in one call.
//!
//! ```ignore
//! use mqlens::build::{build_query, QueryRequest};
//! use mqlens::catalog::MetricId;
//!
//! let request = QueryRequest::new("AWS_MSK", MetricId::TotalClusters)
//!     .prefer_streaming(true)
//!     .filter("(aws.kafka.BrokerID) IN ('9')");
//! let compiled = build_query(&request)?;
//! println!("{}", compiled.nrql);
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CollectionMethod, MetricId, Provider};
use crate::compile::{CompileOptions, Compiler};
use crate::filter::{classify, Correlator, FilterKind};
use crate::model::{FilterClause, MetricType, PrecomputedStatics, QueryModel, TimeRange};
use crate::nrql::Dialect;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while building a query.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("{provider} has no '{metric}' metric for {method} collection")]
    UnknownMetric {
        provider: Provider,
        method: CollectionMethod,
        metric: MetricId,
    },
}

pub type BuildResult<T> = Result<T, BuildError>;

// ============================================================================
// Request / Result Types
// ============================================================================

/// Everything a dashboard widget sends to get its query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default)]
    pub prefer_streaming: bool,
    /// Provider name as sent by the caller; unrecognised names are allowed.
    pub provider: String,
    pub metric: MetricId,
    #[serde(default)]
    pub filters: Vec<FilterClause>,
    #[serde(default)]
    pub extra_facets: Vec<String>,
    #[serde(default)]
    pub time_range: TimeRange,
    #[serde(default)]
    pub statics: PrecomputedStatics,
    #[serde(default)]
    pub navigator: bool,
}

impl QueryRequest {
    pub fn new(provider: impl Into<String>, metric: MetricId) -> Self {
        Self {
            prefer_streaming: false,
            provider: provider.into(),
            metric,
            filters: vec![],
            extra_facets: vec![],
            time_range: TimeRange::default(),
            statics: PrecomputedStatics::default(),
            navigator: false,
        }
    }

    pub fn prefer_streaming(mut self, prefer: bool) -> Self {
        self.prefer_streaming = prefer;
        self
    }

    pub fn filter(mut self, clause: impl Into<FilterClause>) -> Self {
        self.filters.push(clause.into());
        self
    }

    pub fn facet(mut self, facet: &str) -> Self {
        self.extra_facets.push(facet.to_string());
        self
    }

    pub fn time_range(mut self, range: TimeRange) -> Self {
        self.time_range = range;
        self
    }

    pub fn statics(mut self, statics: PrecomputedStatics) -> Self {
        self.statics = statics;
        self
    }

    pub fn navigator(mut self, navigator: bool) -> Self {
        self.navigator = navigator;
        self
    }
}

/// A compiled metric query.
///
/// The result for an unsupported provider has no fields set and serializes
/// as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompiledQuery {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub nrql: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<MetricId>,
}

impl CompiledQuery {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nrql.is_empty()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builds queries against a catalog with fixed compile options.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    catalog: &'a Catalog,
    options: CompileOptions,
}

impl Default for QueryBuilder<'static> {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

impl<'a> QueryBuilder<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            options: CompileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(&self, request: &QueryRequest) -> BuildResult<CompiledQuery> {
        let Ok(provider) = request.provider.parse::<Provider>() else {
            tracing::warn!(
                provider = %request.provider,
                metric = %request.metric,
                "unsupported provider, returning empty query"
            );
            return Ok(CompiledQuery::empty());
        };

        let method = CollectionMethod::resolve(request.prefer_streaming, provider);
        let unknown = || BuildError::UnknownMetric {
            provider,
            method,
            metric: request.metric,
        };
        let dialect = Dialect::for_provider(provider, method).ok_or_else(unknown)?;
        let template = self
            .catalog
            .get(provider, method, request.metric)
            .ok_or_else(unknown)?;

        let navigator = request.navigator || self.options.navigator;

        for name in zero_statics(template, &request.statics) {
            tracing::warn!(
                metric = %request.metric,
                placeholder = name,
                "template references a total that was not supplied, substituting 0"
            );
        }

        // Fragments are spliced into projections, so they always use the
        // membership shape regardless of navigator context.
        let fragments = TierFragments::new(Correlator::new(dialect), &request.filters);
        let substituted =
            template.map_select_exprs(&|expr: &str| substitute(expr, &fragments, &request.statics));

        // Templates with tier placeholders already carry the caller filters,
        // correlated, inside their projections.
        let mut merged: QueryModel = if takes_filters_via_placeholders(template) {
            substituted
        } else {
            let correlator = Correlator::new(dialect).navigator(navigator);
            let filters: Vec<FilterClause> = request
                .filters
                .iter()
                .map(|clause| match classify(clause, template.metric_type, dialect) {
                    FilterKind::Tag => FilterClause::raw(correlator.rewrite_tag(clause)),
                    FilterKind::SameTier | FilterKind::CrossTier(_) => clause.clone(),
                })
                .collect();
            substituted.with_filters_prepended(&filters)
        };
        merged.facet.extend(request.extra_facets.iter().cloned());

        tracing::debug!(
            %provider,
            %method,
            metric = %request.metric,
            filters = request.filters.len(),
            "building query"
        );

        let nrql = Compiler::new(dialect)
            .with_options(self.options)
            .navigator(navigator)
            .time_range(request.time_range)
            .compile(&merged);

        Ok(CompiledQuery {
            nrql,
            dialect: Some(dialect),
            metric: Some(request.metric),
        })
    }
}

/// Build a query against the builtin catalog with default options.
pub fn build_query(request: &QueryRequest) -> BuildResult<CompiledQuery> {
    QueryBuilder::default().build(request)
}

// ============================================================================
// Placeholders
// ============================================================================

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

static TIER_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(?:cluster|broker|topic)_filters\}")
        .expect("tier placeholder pattern is valid")
});

/// The template splices caller filters in through `{<tier>_filters}`.
fn takes_filters_via_placeholders(template: &QueryModel) -> bool {
    template.any_select_expr(&|expr: &str| TIER_PLACEHOLDER.is_match(expr))
}

/// `{total_*}` placeholders the template references while the caller left
/// them at zero.
fn zero_statics(template: &QueryModel, statics: &PrecomputedStatics) -> Vec<&'static str> {
    ["total_clusters", "total_brokers", "total_topics"]
        .into_iter()
        .filter(|name| statics.get(name) == Some(0))
        .filter(|name| {
            let placeholder = format!("{{{name}}}");
            template.any_select_expr(&|expr: &str| expr.contains(&placeholder))
        })
        .collect()
}

/// Caller filters correlated once per tier.
#[derive(Debug, Clone, Default, PartialEq)]
struct TierFragments {
    cluster: String,
    broker: String,
    topic: String,
}

impl TierFragments {
    fn new(correlator: Correlator, filters: &[FilterClause]) -> Self {
        Self {
            cluster: correlator.correlate(MetricType::Cluster, filters),
            broker: correlator.correlate(MetricType::Broker, filters),
            topic: correlator.correlate(MetricType::Topic, filters),
        }
    }
}

fn and_prefixed(fragment: &str) -> String {
    if fragment.is_empty() {
        String::new()
    } else {
        format!(" AND {fragment}")
    }
}

/// Expand known placeholders; anything else is left as written.
fn substitute(expr: &str, fragments: &TierFragments, statics: &PrecomputedStatics) -> String {
    PLACEHOLDER
        .replace_all(expr, |caps: &Captures| match &caps[1] {
            "cluster_filters" => and_prefixed(&fragments.cluster),
            "broker_filters" => and_prefixed(&fragments.broker),
            "topic_filters" => and_prefixed(&fragments.topic),
            name => statics
                .get(name)
                .map_or_else(|| caps[0].to_string(), |value| value.to_string()),
        })
        .into_owned()
}
