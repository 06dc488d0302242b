//! Provider & metric registry.
//!
//! The catalog maps `(provider, collection method, metric id)` to a
//! [`QueryModel`] template. The builtin catalog is assembled once, validated
//! once, and then only ever read:
//!
//! ```ignore
//! use mqlens::catalog::{Catalog, CollectionMethod, Lookup, MetricId};
//!
//! match Catalog::builtin().lookup("AWS_MSK", CollectionMethod::Polling, MetricId::TotalBrokers) {
//!     Lookup::Found(template) => { /* clone, merge, compile */ }
//!     Lookup::UnsupportedProvider => { /* render an empty widget */ }
//!     Lookup::UnknownMetric => { /* caller asked for something this provider lacks */ }
//! }
//! ```

mod confluent;
mod error;
mod metric;
mod msk_metric_stream;
mod msk_polling;
mod provider;

pub use error::{CatalogError, CatalogResult, ParseError};
pub use metric::MetricId;
pub use provider::{CollectionMethod, Provider};

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::model::{QueryModel, SelectItem, Source};
use crate::nrql::{Dialect, NrqlDialect};

/// Registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CatalogKey {
    pub provider: Provider,
    pub method: CollectionMethod,
    pub metric: MetricId,
}

impl CatalogKey {
    pub fn new(provider: Provider, method: CollectionMethod, metric: MetricId) -> Self {
        Self {
            provider,
            method,
            metric,
        }
    }
}

impl std::fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.provider, self.method, self.metric)
    }
}

/// Result of a string-keyed lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a QueryModel),
    /// Provider name not recognised; callers degrade to an empty result.
    UnsupportedProvider,
    /// Known provider without a template for this metric/method.
    UnknownMetric,
}

impl<'a> Lookup<'a> {
    pub fn template(&self) -> Option<&'a QueryModel> {
        match self {
            Lookup::Found(template) => Some(template),
            Lookup::UnsupportedProvider | Lookup::UnknownMetric => None,
        }
    }
}

/// Immutable table of metric templates.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<CatalogKey, QueryModel>,
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    Catalog::from_entries(builtin_entries()).expect("builtin metric catalog failed validation")
});

fn builtin_entries() -> Vec<(CatalogKey, QueryModel)> {
    let tables = [
        (Dialect::MskPolling, msk_polling::entries()),
        (Dialect::MskMetricStream, msk_metric_stream::entries()),
        (Dialect::Confluent, confluent::entries()),
    ];

    let mut entries = vec![];
    for (dialect, table) in tables {
        for (metric, template) in table {
            let key = CatalogKey::new(dialect.provider(), dialect.collection_method(), metric);
            entries.push((key, template));
        }
    }
    entries
}

impl Catalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Build a catalog, validating every template.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (CatalogKey, QueryModel)>,
    ) -> CatalogResult<Catalog> {
        let mut map = HashMap::new();
        for (key, template) in entries {
            if Dialect::for_provider(key.provider, key.method).is_none() {
                return Err(CatalogError::NoDialect { key });
            }
            validate(&key, &template)?;
            if map.insert(key, template).is_some() {
                return Err(CatalogError::Duplicate(key));
            }
        }
        Ok(Catalog { entries: map })
    }

    /// Typed accessor.
    pub fn get(
        &self,
        provider: Provider,
        method: CollectionMethod,
        metric: MetricId,
    ) -> Option<&QueryModel> {
        self.entries.get(&CatalogKey::new(provider, method, metric))
    }

    /// Look up by the provider name the dashboard sends.
    pub fn lookup(&self, provider: &str, method: CollectionMethod, metric: MetricId) -> Lookup<'_> {
        let Ok(provider) = provider.parse::<Provider>() else {
            return Lookup::UnsupportedProvider;
        };
        match self.get(provider, method, metric) {
            Some(template) => Lookup::Found(template),
            None => Lookup::UnknownMetric,
        }
    }

    /// Metric ids populated for a provider and method, sorted.
    pub fn metrics(&self, provider: Provider, method: CollectionMethod) -> Vec<MetricId> {
        let mut metrics: Vec<MetricId> = self
            .entries
            .keys()
            .filter(|key| key.provider == provider && key.method == method)
            .map(|key| key.metric)
            .collect();
        metrics.sort();
        metrics
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CatalogKey, &QueryModel)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate(key: &CatalogKey, model: &QueryModel) -> CatalogResult<()> {
    if model.select.is_empty() {
        return Err(CatalogError::EmptySelect { key: *key });
    }
    match &model.from {
        Source::Collection(name) if name.trim().is_empty() => {
            return Err(CatalogError::EmptySource { key: *key });
        }
        Source::Collection(_) => {}
        Source::Nested(inner) => validate(key, inner)?,
    }
    for item in &model.select {
        match item {
            SelectItem::Expr(expr) if expr.trim().is_empty() => {
                return Err(CatalogError::EmptySelect { key: *key });
            }
            SelectItem::Expr(_) => {}
            SelectItem::Nested { query, .. } => validate(key, query)?,
        }
    }
    Ok(())
}

/// Aggregate the rows of `inner` with a single outer expression.
fn rollup(inner: QueryModel, outer_expr: &str) -> QueryModel {
    QueryModel::nested(inner).select_expr(outer_expr)
}
