//! Filter classification by entity tier.

use crate::model::{FilterClause, MetricType};
use crate::nrql::{Dialect, NrqlDialect};

/// How a clause relates to the tier of the node it filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Attribute exists at the node's tier; apply as-is.
    SameTier,
    /// Attribute only exists at a finer tier; needs a correlated subquery.
    CrossTier(MetricType),
    /// Entity tag; always correlated through the cluster source.
    Tag,
}

/// Classify one clause for a node reporting at `tier`.
///
/// Clauses whose attribute can't be extracted, or isn't a known broker,
/// topic or tag attribute, are treated as same-tier.
pub fn classify(clause: &FilterClause, tier: MetricType, dialect: Dialect) -> FilterKind {
    let Some(attribute) = clause.attribute() else {
        return FilterKind::SameTier;
    };

    if dialect.is_tag_attribute(attribute) {
        return FilterKind::Tag;
    }
    if dialect.broker_attributes().iter().any(|a| *a == attribute) && tier < MetricType::Broker {
        return FilterKind::CrossTier(MetricType::Broker);
    }
    if dialect.topic_attributes().iter().any(|a| *a == attribute) && tier < MetricType::Topic {
        return FilterKind::CrossTier(MetricType::Topic);
    }
    FilterKind::SameTier
}

/// Clauses partitioned by kind, each group in caller order.
///
/// Built once per node and handed down explicitly; nothing accumulates
/// across calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub same_tier: Vec<FilterClause>,
    /// Finer-tier clauses with the tier their attribute lives at.
    pub cross_tier: Vec<(MetricType, FilterClause)>,
    pub tag: Vec<FilterClause>,
}

impl Classification {
    pub fn new(clauses: &[FilterClause], tier: MetricType, dialect: Dialect) -> Self {
        let mut classification = Classification::default();
        for clause in clauses {
            match classify(clause, tier, dialect) {
                FilterKind::SameTier => classification.same_tier.push(clause.clone()),
                FilterKind::CrossTier(fine) => {
                    classification.cross_tier.push((fine, clause.clone()))
                }
                FilterKind::Tag => classification.tag.push(clause.clone()),
            }
        }
        classification
    }

    pub fn is_empty(&self) -> bool {
        self.same_tier.is_empty() && self.cross_tier.is_empty() && self.tag.is_empty()
    }

    /// Finest tier referenced by a cross-tier clause.
    pub fn finest_tier(&self) -> Option<MetricType> {
        self.cross_tier.iter().map(|(tier, _)| *tier).max()
    }
}
