//! Recursive compilation from [`QueryModel`] to NRQL text.
//!
//! ```text
//! QueryModel → nrql::Query (recursive) → TokenStream → NRQL
//! ```
//!
//! # Example
//!
//! ```ignore
//! use mqlens::compile::Compiler;
//! use mqlens::model::{QueryModel, TimeRange};
//! use mqlens::nrql::Dialect;
//!
//! let ir = QueryModel::from_collection("AwsMskBrokerSample")
//!     .select_expr("uniqueCount(provider.brokerId)")
//!     .filter("(provider.clusterName) IN ('prod')");
//!
//! let nrql = Compiler::new(Dialect::MskPolling)
//!     .time_range(TimeRange::last_minutes(30))
//!     .compile(&ir);
//! ```

use serde::{Deserialize, Serialize};

use crate::filter::{classify, Correlator, FilterKind};
use crate::model::{FilterClause, MetricType, QueryModel, SelectItem, Source, TimeRange};
use crate::nrql::{Dialect, FromClause, NrqlDialect, Query, SelectExpr, Since, TokenStream};

// ============================================================================
// Options
// ============================================================================

/// Options for compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Render correlated subqueries in the navigator shape.
    pub navigator: bool,

    /// Always join WHERE clauses with `AND`, including on dialects that
    /// historically concatenate them.
    pub strict_and_join: bool,
}

impl CompileOptions {
    pub fn with_navigator(mut self, navigator: bool) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn with_strict_and_join(mut self, strict: bool) -> Self {
        self.strict_and_join = strict;
        self
    }
}

// ============================================================================
// Compiler
// ============================================================================

/// Renders query IR for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct Compiler {
    dialect: Dialect,
    options: CompileOptions,
    since: Option<Since>,
}

impl Compiler {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            options: CompileOptions::default(),
            since: None,
        }
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn navigator(mut self, navigator: bool) -> Self {
        self.options.navigator = navigator;
        self
    }

    pub fn strict_and_join(mut self, strict: bool) -> Self {
        self.options.strict_and_join = strict;
        self
    }

    /// Time window applied to the outermost query only.
    pub fn time_range(mut self, range: TimeRange) -> Self {
        self.since = range.to_since();
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    /// Compile to NRQL text.
    pub fn compile(&self, ir: &QueryModel) -> String {
        let nrql = self.plan(ir).to_nrql(self.dialect);
        tracing::debug!(
            dialect = %self.dialect,
            tier = %ir.metric_type,
            nrql = %nrql,
            "compiled query"
        );
        nrql
    }

    /// Build the rendered-query tree without serializing it.
    pub fn plan(&self, ir: &QueryModel) -> Query {
        self.plan_at(ir, 0)
    }

    fn plan_at(&self, ir: &QueryModel, depth: usize) -> Query {
        // Nested children see the parent's filters ahead of their own.
        let from = match &ir.from {
            Source::Collection(name) => FromClause::Collection(name.clone()),
            Source::Nested(inner) => FromClause::Subquery(Box::new(
                self.plan_at(&inner.with_filters_prepended(&ir.where_clauses), depth + 1),
            )),
        };

        let select = ir
            .select
            .iter()
            .map(|item| match item {
                SelectItem::Expr(expr) => SelectExpr::raw(expr),
                SelectItem::Nested { query, alias } => {
                    let child = SelectExpr::subquery(
                        self.plan_at(&query.with_filters_prepended(&ir.where_clauses), depth + 1),
                    );
                    match alias {
                        Some(alias) => child.with_alias(alias),
                        None => child,
                    }
                }
            })
            .collect();

        let mut query = Query::new()
            .select(select)
            .from(from)
            .facet(ir.facet.clone())
            .order_by(ir.order_by.clone())
            .limit(ir.limit)
            .timeseries(ir.timeseries);

        if depth == 0 {
            query = query.since(self.since);
        }

        if renders_where(ir) {
            let mut condition = TokenStream::new();
            condition.raw(self.where_body(ir));
            query = query.filter(condition);
        }

        query
    }

    /// WHERE body for a node that owns its filters.
    fn where_body(&self, ir: &QueryModel) -> String {
        let correlator = Correlator::new(self.dialect).navigator(self.options.navigator);

        if ir.metric_type == MetricType::Cluster && self.dialect.requires_tier_correlation() {
            return correlator.correlate(MetricType::Cluster, &ir.where_clauses);
        }

        let parts: Vec<String> = ir
            .where_clauses
            .iter()
            .map(|clause| match classify(clause, ir.metric_type, self.dialect) {
                FilterKind::SameTier => clause.as_str().to_string(),
                FilterKind::CrossTier(fine) => {
                    correlator.rewrite_cross(ir.metric_type, fine, clause)
                }
                FilterKind::Tag => correlator.rewrite_tag(clause),
            })
            .collect();

        parts.join(self.separator())
    }

    fn separator(&self) -> &'static str {
        if self.dialect.concatenates_where_clauses() && !self.options.strict_and_join {
            ""
        } else {
            " AND "
        }
    }
}

/// Nested nodes push their filters down; select-nested nodes do too unless
/// they opt into keeping an outer WHERE.
fn renders_where(ir: &QueryModel) -> bool {
    !ir.where_clauses.is_empty()
        && !ir.is_nested()
        && (!ir.is_select_nested() || ir.include_select_nested_where)
}

/// Compile `ir` with `caller_filters` placed ahead of the root node's own.
pub fn compile(
    ir: &QueryModel,
    dialect: Dialect,
    navigator: bool,
    caller_filters: &[FilterClause],
) -> String {
    Compiler::new(dialect)
        .navigator(navigator)
        .compile(&ir.with_filters_prepended(caller_filters))
}
