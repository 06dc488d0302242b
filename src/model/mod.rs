//! Query IR - the structured, pre-text form of a metric query.
//!
//! A [`QueryModel`] describes one NRQL query: where it reads from (an event
//! type or another `QueryModel`), what it projects, how it is filtered and
//! which modifiers apply. Catalog templates are `QueryModel` values; the
//! compiler renders them to text.

mod filter;
mod time;

pub use filter::FilterClause;
pub use time::{PrecomputedStatics, TimeRange};

use serde::{Deserialize, Serialize};

use crate::nrql::{Limit, OrderByExpr};

/// Entity tier a query reports on, coarsest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    #[default]
    Cluster,
    Broker,
    Topic,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Cluster => "cluster",
            MetricType::Broker => "broker",
            MetricType::Topic => "topic",
        }
    }

    pub fn all() -> [MetricType; 3] {
        [MetricType::Cluster, MetricType::Broker, MetricType::Topic]
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a query reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    /// An event type such as `AwsMskBrokerSample`.
    Collection(String),
    /// A nested aggregation pass.
    Nested(Box<QueryModel>),
}

/// One SELECT projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectItem {
    /// Aggregation expression text, alias included if any.
    Expr(String),
    /// A nested query rendered in parentheses.
    Nested {
        query: Box<QueryModel>,
        #[serde(default)]
        alias: Option<String>,
    },
}

impl SelectItem {
    pub fn is_nested(&self) -> bool {
        matches!(self, SelectItem::Nested { .. })
    }
}

/// The query IR.
///
/// Structural flags from the dashboard's original configuration objects map
/// as follows: `isNested` is [`QueryModel::is_nested`] and `isSelectNested`
/// is [`QueryModel::is_select_nested`], both derived from the shape; the
/// remaining flags are plain fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct QueryModel {
    pub from: Source,
    pub select: Vec<SelectItem>,
    #[serde(default, rename = "where")]
    pub where_clauses: Vec<FilterClause>,
    #[serde(default)]
    pub facet: Vec<String>,
    #[serde(default)]
    pub order_by: Option<OrderByExpr>,
    #[serde(default)]
    pub limit: Option<Limit>,
    #[serde(default)]
    pub timeseries: bool,
    /// Render WHERE on a node whose projections are nested queries.
    #[serde(default)]
    pub include_select_nested_where: bool,
    #[serde(default)]
    pub metric_type: MetricType,
}

impl QueryModel {
    /// Query reading directly from an event type.
    pub fn from_collection(name: &str) -> Self {
        Self::with_source(Source::Collection(name.into()))
    }

    /// Query aggregating over the rows of another query.
    pub fn nested(inner: QueryModel) -> Self {
        let metric_type = inner.metric_type;
        Self::with_source(Source::Nested(Box::new(inner))).metric_type(metric_type)
    }

    fn with_source(from: Source) -> Self {
        Self {
            from,
            select: vec![],
            where_clauses: vec![],
            facet: vec![],
            order_by: None,
            limit: None,
            timeseries: false,
            include_select_nested_where: false,
            metric_type: MetricType::default(),
        }
    }

    pub fn select_expr(mut self, expr: &str) -> Self {
        self.select.push(SelectItem::Expr(expr.into()));
        self
    }

    pub fn select_nested(mut self, query: QueryModel, alias: Option<&str>) -> Self {
        self.select.push(SelectItem::Nested {
            query: Box::new(query),
            alias: alias.map(String::from),
        });
        self
    }

    pub fn filter(mut self, clause: impl Into<FilterClause>) -> Self {
        self.where_clauses.push(clause.into());
        self
    }

    pub fn facet(mut self, facet: &str) -> Self {
        self.facet.push(facet.into());
        self
    }

    pub fn order_by(mut self, order_by: OrderByExpr) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn timeseries(mut self) -> Self {
        self.timeseries = true;
        self
    }

    pub fn include_select_nested_where(mut self) -> Self {
        self.include_select_nested_where = true;
        self
    }

    pub fn metric_type(mut self, metric_type: MetricType) -> Self {
        self.metric_type = metric_type;
        self
    }

    /// `from` is a nested query.
    pub fn is_nested(&self) -> bool {
        matches!(self.from, Source::Nested(_))
    }

    /// At least one projection is a nested query.
    pub fn is_select_nested(&self) -> bool {
        self.select.iter().any(SelectItem::is_nested)
    }

    /// Whether any literal select expression, at any depth, satisfies `pred`.
    pub fn any_select_expr(&self, pred: &dyn Fn(&str) -> bool) -> bool {
        let in_from = match &self.from {
            Source::Collection(_) => false,
            Source::Nested(inner) => inner.any_select_expr(pred),
        };
        in_from
            || self.select.iter().any(|item| match item {
                SelectItem::Expr(expr) => pred(expr),
                SelectItem::Nested { query, .. } => query.any_select_expr(pred),
            })
    }

    /// A copy of this model with `filters` placed ahead of its own clauses.
    pub fn with_filters_prepended(&self, filters: &[FilterClause]) -> QueryModel {
        let mut merged = self.clone();
        if !filters.is_empty() {
            merged.where_clauses = filters
                .iter()
                .cloned()
                .chain(self.where_clauses.iter().cloned())
                .collect();
        }
        merged
    }

    /// Rewrite every literal select expression, recursing into nested nodes.
    pub fn map_select_exprs(&self, f: &dyn Fn(&str) -> String) -> QueryModel {
        let mut mapped = self.clone();
        mapped.from = match &self.from {
            Source::Collection(name) => Source::Collection(name.clone()),
            Source::Nested(inner) => Source::Nested(Box::new(inner.map_select_exprs(f))),
        };
        mapped.select = self
            .select
            .iter()
            .map(|item| match item {
                SelectItem::Expr(expr) => SelectItem::Expr(f(expr)),
                SelectItem::Nested { query, alias } => SelectItem::Nested {
                    query: Box::new(query.map_select_exprs(f)),
                    alias: alias.clone(),
                },
            })
            .collect();
        mapped
    }
}
