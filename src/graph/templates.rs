//! GraphQL documents and their variable sets.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::GraphQuery;
use crate::catalog::Provider;
use crate::model::{FilterClause, MetricType};
use crate::nrql::{Dialect, FromClause, Limit, NrqlDialect, Query, SelectExpr, Token, TokenStream};

const ENTITY_COUNTS: &str = r#"query EntityCounts($awsQuery: String!, $confluentCloudQuery: String!, $facet: EntitySearchCountsFacet!, $orderBy: EntitySearchCountsOrderBy) {
  actor {
    awsEntitySearch: entitySearch(query: $awsQuery) {
      count
      facetedCounts(facets: {facetCriterion: {facet: $facet}, orderBy: $orderBy}) {
        counts {
          count
          facet
        }
      }
    }
    confluentCloudEntitySearch: entitySearch(query: $confluentCloudQuery) {
      count
      facetedCounts(facets: {facetCriterion: {facet: $facet}, orderBy: $orderBy}) {
        counts {
          count
          facet
        }
      }
    }
  }
}"#;

const CLUSTER_LOOKUP: &str = r#"query ClusterLookup($accountId: Int!, $pollingQuery: Nrql!, $streamingQuery: Nrql!) {
  actor {
    account(id: $accountId) {
      polling: nrql(query: $pollingQuery) {
        results
      }
      streaming: nrql(query: $streamingQuery) {
        results
      }
    }
  }
}"#;

const RELATED_ENTITIES: &str = r#"query RelatedEntities($entityGuids: [EntityGuid]!, $cursor: String) {
  actor {
    entities(guids: $entityGuids) {
      guid
      name
      relatedEntities(filter: {relationshipTypes: {include: [CONSUMES, PRODUCES]}, entityDomainTypes: {include: [{domain: "APM", type: "APPLICATION"}]}}, cursor: $cursor) {
        nextCursor
        results {
          type
          source {
            guid
            entity {
              name
            }
          }
          target {
            guid
            entity {
              name
            }
          }
        }
      }
    }
  }
}"#;

const ENTITY_SEARCH: &str = r#"query EntitySearch($query: String!, $cursor: String) {
  actor {
    entitySearch(query: $query) {
      count
      results(cursor: $cursor) {
        nextCursor
        entities {
          guid
          name
          entityType
          reporting
          tags {
            key
            values
          }
        }
      }
    }
  }
}"#;

/// Entity search string matching every cluster entity of `provider`.
pub fn cluster_search(provider: Provider) -> &'static str {
    match provider {
        Provider::AwsMsk => "domain = 'INFRA' AND type = 'AWSMSKCLUSTER'",
        Provider::ConfluentCloud => "domain = 'INFRA' AND type = 'CONFLUENTCLOUDCLUSTER'",
    }
}

/// Cluster counts for both providers in one round trip, faceted by
/// `facet` (e.g. `TYPE` or `ACCOUNT_ID`).
pub fn entity_count_query(facet: &str, order_by: Option<&str>) -> GraphQuery {
    GraphQuery::new(ENTITY_COUNTS)
        .variable("awsQuery", cluster_search(Provider::AwsMsk))
        .variable("confluentCloudQuery", cluster_search(Provider::ConfluentCloud))
        .variable("facet", facet)
        .variable("orderBy", order_by.unwrap_or("COUNT"))
}

/// Values of one entity tier to resolve to owning clusters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFilter {
    pub tier: MetricType,
    pub values: Vec<String>,
}

impl EntityFilter {
    pub fn new<I, S>(tier: MetricType, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tier,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Clusters owning the given brokers/topics, resolved through the polling
/// and metric-stream attribute paths at once.
pub fn cluster_lookup_query(account_id: u64, filters: &[EntityFilter]) -> GraphQuery {
    GraphQuery::new(CLUSTER_LOOKUP)
        .variable("accountId", account_id)
        .variable("pollingQuery", lookup_nrql(Dialect::MskPolling, filters))
        .variable("streamingQuery", lookup_nrql(Dialect::MskMetricStream, filters))
}

/// `SELECT uniques(<cluster id>) FROM <finest source> WHERE ... LIMIT MAX`
fn lookup_nrql(dialect: Dialect, filters: &[EntityFilter]) -> String {
    let finest = filters
        .iter()
        .map(|f| f.tier)
        .max()
        .unwrap_or(MetricType::Cluster);

    let (Some(identity), Some(source)) =
        (dialect.identity(MetricType::Cluster), dialect.source(finest))
    else {
        return String::new();
    };

    let clauses: Vec<String> = filters
        .iter()
        .filter(|f| !f.values.is_empty())
        .filter_map(|f| {
            dialect
                .identity(f.tier)
                .map(|attr| FilterClause::in_list(attr, &f.values).into())
        })
        .collect();

    let mut projection = TokenStream::new();
    projection
        .push(Token::Uniques)
        .lparen()
        .push(Token::Attr(identity.into()))
        .rparen();

    let mut condition = TokenStream::new();
    condition.raw(clauses.join(" AND "));

    Query::new()
        .select(vec![SelectExpr::tokens(projection)])
        .from(FromClause::Collection(source.into()))
        .filter(condition)
        .limit(Some(Limit::Max))
        .to_nrql(dialect)
}

/// One page of APM applications consuming from or producing to the given
/// entities.
pub fn related_entities_query(guids: &[String], cursor: Option<&str>) -> GraphQuery {
    GraphQuery::new(RELATED_ENTITIES)
        .variable("entityGuids", guids.to_vec())
        .variable("cursor", cursor_value(cursor))
}

/// One page of an entity search.
pub fn entity_search_page(query: &str, cursor: Option<&str>) -> GraphQuery {
    GraphQuery::new(ENTITY_SEARCH)
        .variable("query", query)
        .variable("cursor", cursor_value(cursor))
}

fn cursor_value(cursor: Option<&str>) -> Value {
    match cursor {
        Some(cursor) => Value::String(cursor.to_string()),
        None => Value::Null,
    }
}
