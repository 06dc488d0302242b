//! NRQL generation module.
//!
//! - [`query`] - rendered-form query builder
//! - [`token`] - token types for NRQL output
//! - [`dialect`] - per provider/collection-method attribute namespaces

pub mod dialect;
pub mod query;
pub mod token;

pub use dialect::{Dialect, NrqlDialect};
pub use query::{FromClause, Limit, OrderByExpr, Query, SelectExpr, SelectTarget, Since, SortDir};
pub use token::{Token, TokenStream};
