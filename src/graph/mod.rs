//! NerdGraph request templates.
//!
//! These are fixed, parameterized GraphQL documents for entity counts,
//! cluster lookups, relationship traversal and paginated entity search.
//! They are independent of the IR compiler; the only NRQL they carry is the
//! cluster lookup, built with the same rendering layer.
//!
//! - [`templates`] - the request builders
//! - [`pagination`] - cursor bookkeeping for paginated templates

pub mod pagination;
pub mod templates;

pub use pagination::CursorPager;
pub use templates::{
    cluster_lookup_query, entity_count_query, entity_search_page, related_entities_query,
    EntityFilter,
};

use serde::Serialize;
use serde_json::{Map, Value};

/// Errors raised while building or paging graph requests.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Cursor '{cursor}' was already returned by an earlier page")]
    CursorRegressed { cursor: String },

    #[error("Pagination already finished")]
    Finished,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// A GraphQL request body: `{"query": ..., "variables": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQuery {
    pub query: String,
    pub variables: Map<String, Value>,
}

impl GraphQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
        }
    }

    pub fn variable(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.variables.insert(name.to_string(), value.into());
        self
    }

    pub fn to_json(&self) -> GraphResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> GraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
