//! Filter classification and cross-tier correlation.
//!
//! - [`classify`] - decide whether a clause applies directly to a node
//! - [`correlate`] - rewrite the ones that don't into correlated subqueries

pub mod classify;
pub mod correlate;

pub use classify::{classify, Classification, FilterKind};
pub use correlate::Correlator;
