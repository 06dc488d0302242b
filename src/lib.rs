//! # mqlens
//!
//! Compiles Kafka monitoring metric definitions into NRQL and NerdGraph
//! queries.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │      QueryRequest (provider, metric, filters, time)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [catalog]
//! ┌─────────────────────────────────────────────────────────┐
//! │                QueryModel template (IR)                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [build: placeholders + filter merge]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Merged QueryModel                       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compile + filter correlation]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  NRQL (per dialect)                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The entity-graph templates in [`graph`] sit beside this pipeline and
//! produce NerdGraph request bodies.

pub mod build;
pub mod catalog;
pub mod compile;
pub mod config;
pub mod filter;
pub mod graph;
pub mod model;
pub mod nrql;

// Re-export NRQL submodules at crate level
pub use nrql::dialect;
pub use nrql::query;
pub use nrql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::build::{build_query, BuildError, CompiledQuery, QueryBuilder, QueryRequest};
    pub use crate::catalog::{Catalog, CollectionMethod, Lookup, MetricId, Provider};
    pub use crate::compile::{compile, CompileOptions, Compiler};
    pub use crate::filter::{classify, Correlator, FilterKind};
    pub use crate::graph::{CursorPager, GraphError, GraphQuery};
    pub use crate::model::{
        FilterClause, MetricType, PrecomputedStatics, QueryModel, SelectItem, Source, TimeRange,
    };
    pub use crate::nrql::{Dialect, Limit, NrqlDialect, OrderByExpr, SortDir};
}
