//! Correlated-subquery synthesis.
//!
//! A filter on a finer tier than the query reports at is translated into a
//! membership test on the query's own identity attribute:
//!
//! ```text
//! (provider.clusterName) IN (SELECT uniques(provider.clusterName) FROM AwsMskBrokerSample WHERE (provider.brokerId) IN ('1'))
//! ```
//!
//! In navigator context the subquery selects the bare identity with an
//! explicit `LIMIT MAX` instead of a `uniques()` set.

use super::classify::Classification;
use crate::model::{FilterClause, MetricType};
use crate::nrql::{Dialect, FromClause, Limit, NrqlDialect, Query, SelectExpr, Token, TokenStream};

/// Rewrites cross-tier and tag filters into correlated subqueries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correlator {
    dialect: Dialect,
    navigator: bool,
}

impl Correlator {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            navigator: false,
        }
    }

    /// Use the navigator subquery shape.
    pub fn navigator(mut self, navigator: bool) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Full WHERE body for a node at `tier`.
    ///
    /// Finer-tier clauses share ONE subquery (AND-ed inside it, caller
    /// order kept), tags share one cluster-level subquery, and same-tier
    /// clauses follow. Returns an empty string for no clauses.
    pub fn correlate(&self, tier: MetricType, clauses: &[FilterClause]) -> String {
        let classification = Classification::new(clauses, tier, self.dialect);
        self.correlate_classified(tier, &classification)
    }

    pub fn correlate_classified(
        &self,
        tier: MetricType,
        classification: &Classification,
    ) -> String {
        let mut parts: Vec<String> = vec![];

        if let Some(finest) = classification.finest_tier() {
            let inner: Vec<&FilterClause> =
                classification.cross_tier.iter().map(|(_, c)| c).collect();
            parts.push(self.membership(tier, finest, &inner));
        }

        if !classification.tag.is_empty() {
            let inner: Vec<&FilterClause> = classification.tag.iter().collect();
            parts.push(self.tag_membership(&inner));
        }

        parts.extend(
            classification
                .same_tier
                .iter()
                .map(|c| c.as_str().to_string()),
        );

        parts.join(" AND ")
    }

    /// Rewrite a single clause whose attribute lives at tier `fine`.
    pub fn rewrite_cross(
        &self,
        tier: MetricType,
        fine: MetricType,
        clause: &FilterClause,
    ) -> String {
        self.membership(tier, fine, &[clause])
    }

    /// Rewrite a single tag clause.
    pub fn rewrite_tag(&self, clause: &FilterClause) -> String {
        self.tag_membership(&[clause])
    }

    /// `(id(tier)) IN (SELECT … id(tier) FROM source(fine) WHERE …)`.
    ///
    /// Falls back to the plain clauses when the dialect has no namespace for
    /// either tier.
    fn membership(&self, tier: MetricType, fine: MetricType, clauses: &[&FilterClause]) -> String {
        match (self.dialect.identity(tier), self.dialect.source(fine)) {
            (Some(identity), Some(source)) => self.subquery(identity, source, clauses),
            _ => join_and(clauses),
        }
    }

    /// Tags live on cluster entities only, so they always correlate on the
    /// cluster identity through the cluster source.
    fn tag_membership(&self, clauses: &[&FilterClause]) -> String {
        match (
            self.dialect.identity(MetricType::Cluster),
            self.dialect.source(MetricType::Cluster),
        ) {
            (Some(identity), Some(source)) => self.subquery(identity, source, clauses),
            _ => join_and(clauses),
        }
    }

    fn subquery(&self, identity: &str, source: &str, clauses: &[&FilterClause]) -> String {
        let projection = if self.navigator {
            let mut ts = TokenStream::new();
            ts.push(Token::Attr(identity.into()));
            ts
        } else {
            let mut ts = TokenStream::new();
            ts.push(Token::Uniques)
                .lparen()
                .push(Token::Attr(identity.into()))
                .rparen();
            ts
        };

        let mut condition = TokenStream::new();
        condition.raw(join_and(clauses));

        let inner = Query::new()
            .select(vec![SelectExpr::tokens(projection)])
            .from(FromClause::Collection(source.into()))
            .filter(condition)
            .limit(self.navigator.then_some(Limit::Max));

        let mut ts = TokenStream::new();
        ts.lparen()
            .push(Token::Attr(identity.into()))
            .rparen()
            .space()
            .push(Token::In)
            .space()
            .lparen()
            .append(&inner.to_tokens_for_dialect(self.dialect))
            .rparen();
        ts.serialize(self.dialect)
    }
}

fn join_and(clauses: &[&FilterClause]) -> String {
    clauses
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(" AND ")
}
