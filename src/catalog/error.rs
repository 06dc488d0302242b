//! Catalog error types.

use thiserror::Error;

use super::CatalogKey;

/// Result type for catalog construction.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Problems found while validating catalog entries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// A template (or one of its nested nodes) projects nothing.
    #[error("catalog entry {key} has an empty select list")]
    EmptySelect { key: CatalogKey },

    /// A template (or one of its nested nodes) reads from an empty source name.
    #[error("catalog entry {key} reads from an empty source")]
    EmptySource { key: CatalogKey },

    /// Two templates registered under the same key.
    #[error("duplicate catalog entry {0}")]
    Duplicate(CatalogKey),

    /// The provider is never collected with this method.
    #[error("{key} names a provider/collection method pair with no dialect")]
    NoDialect { key: CatalogKey },
}

/// Errors parsing enumerated names supplied by callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unsupported provider: {0}")]
    UnknownProvider(String),

    #[error("unknown metric id: {0}")]
    UnknownMetric(String),
}
