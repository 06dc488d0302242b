//! Query builder - construct NRQL queries with a fluent API.
//!
//! Clauses are always rendered in grammar order regardless of the order the
//! builder methods were called in:
//!
//! ```text
//! SELECT … FROM … [WHERE …] [FACET …] [SINCE …] [ORDER BY …] [LIMIT …] [TIMESERIES]
//! ```

use serde::{Deserialize, Serialize};

use super::dialect::Dialect;
use super::token::{Token, TokenStream};

// =============================================================================
// Select Expression
// =============================================================================

/// What a SELECT list item projects.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectTarget {
    /// An aggregation expression.
    Expr(TokenStream),
    /// A parenthesized nested query.
    Subquery(Box<Query>),
}

/// A SELECT list item with optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub target: SelectTarget,
    pub alias: Option<String>,
}

impl SelectExpr {
    /// Select a raw aggregation expression such as `latest(provider.brokerId)`.
    pub fn raw(expr: &str) -> Self {
        let mut ts = TokenStream::new();
        ts.raw(expr);
        Self::tokens(ts)
    }

    pub fn tokens(ts: TokenStream) -> Self {
        Self {
            target: SelectTarget::Expr(ts),
            alias: None,
        }
    }

    pub fn subquery(query: Query) -> Self {
        Self {
            target: SelectTarget::Subquery(Box::new(query)),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        match &self.target {
            SelectTarget::Expr(expr) => {
                ts.append(expr);
            }
            SelectTarget::Subquery(query) => {
                ts.lparen()
                    .append(&query.to_tokens_for_dialect(dialect))
                    .rparen();
            }
        }
        if let Some(alias) = &self.alias {
            ts.space()
                .push(Token::As)
                .space()
                .push(Token::Attr(alias.clone()));
        }
        ts
    }
}

// =============================================================================
// FROM
// =============================================================================

/// The FROM clause: an event type or a nested query.
#[derive(Debug, Clone, PartialEq)]
pub enum FromClause {
    Collection(String),
    Subquery(Box<Query>),
}

impl FromClause {
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            FromClause::Collection(name) => {
                ts.push(Token::Attr(name.clone()));
            }
            FromClause::Subquery(query) => {
                ts.lparen()
                    .append(&query.to_tokens_for_dialect(dialect))
                    .rparen();
            }
        }
        ts
    }
}

impl Default for FromClause {
    fn default() -> Self {
        FromClause::Collection(String::new())
    }
}

// =============================================================================
// ORDER BY
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

/// An ORDER BY expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct OrderByExpr {
    pub expr: String,
    #[serde(default)]
    pub dir: Option<SortDir>,
}

impl OrderByExpr {
    pub fn new(expr: &str) -> Self {
        Self {
            expr: expr.into(),
            dir: None,
        }
    }

    pub fn asc(expr: &str) -> Self {
        Self {
            expr: expr.into(),
            dir: Some(SortDir::Asc),
        }
    }

    pub fn desc(expr: &str) -> Self {
        Self {
            expr: expr.into(),
            dir: Some(SortDir::Desc),
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw(self.expr.as_str());
        if let Some(dir) = &self.dir {
            ts.space().push(match dir {
                SortDir::Asc => Token::Asc,
                SortDir::Desc => Token::Desc,
            });
        }
        ts
    }
}

// =============================================================================
// LIMIT
// =============================================================================

/// Row cap. `Max` is the unbounded sentinel used by aggregation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Limit {
    Count(u64),
    Max,
}

impl Limit {
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Limit).space();
        match self {
            Limit::Count(n) => ts.push(Token::LitUint(*n)),
            Limit::Max => ts.push(Token::Max),
        };
        ts
    }
}

// =============================================================================
// SINCE / UNTIL
// =============================================================================

/// Time window for the outermost query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Since {
    /// `SINCE n MINUTES AGO`
    MinutesAgo(u64),
    /// `SINCE begin UNTIL end` in epoch milliseconds.
    Between { begin: i64, end: i64 },
}

impl Since {
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Since).space();
        match self {
            Since::MinutesAgo(minutes) => {
                ts.push(Token::LitUint(*minutes))
                    .space()
                    .push(Token::MinutesAgo);
            }
            Since::Between { begin, end } => {
                ts.push(Token::LitInt(*begin))
                    .space()
                    .push(Token::Until)
                    .space()
                    .push(Token::LitInt(*end));
            }
        }
        ts
    }
}

// =============================================================================
// Query Builder
// =============================================================================

/// A rendered-form NRQL query.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until converted to NRQL with to_nrql() or to_tokens()"]
pub struct Query {
    pub select: Vec<SelectExpr>,
    pub from: FromClause,
    pub where_clause: Option<TokenStream>,
    pub facet: Vec<String>,
    pub since: Option<Since>,
    pub order_by: Option<OrderByExpr>,
    pub limit: Option<Limit>,
    pub timeseries: bool,
}

impl Query {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SELECT list.
    pub fn select(mut self, exprs: Vec<SelectExpr>) -> Self {
        self.select = exprs;
        self
    }

    /// Set the FROM source.
    pub fn from(mut self, from: FromClause) -> Self {
        self.from = from;
        self
    }

    /// Set the WHERE condition. Empty streams are ignored so no bare
    /// `WHERE` is ever emitted.
    pub fn filter(mut self, condition: TokenStream) -> Self {
        self.where_clause = if condition.is_empty() {
            None
        } else {
            Some(condition)
        };
        self
    }

    pub fn facet(mut self, facets: Vec<String>) -> Self {
        self.facet = facets;
        self
    }

    pub fn since(mut self, since: Option<Since>) -> Self {
        self.since = since;
        self
    }

    pub fn order_by(mut self, order_by: Option<OrderByExpr>) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn limit(mut self, limit: Option<Limit>) -> Self {
        self.limit = limit;
        self
    }

    pub fn timeseries(mut self, timeseries: bool) -> Self {
        self.timeseries = timeseries;
        self
    }

    /// Convert to token stream for a specific dialect.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        // SELECT
        ts.push(Token::Select).space();
        for (i, select_expr) in self.select.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.append(&select_expr.to_tokens_for_dialect(dialect));
        }

        // FROM
        ts.space().push(Token::From).space();
        ts.append(&self.from.to_tokens_for_dialect(dialect));

        // WHERE
        if let Some(where_clause) = &self.where_clause {
            ts.space().push(Token::Where).space();
            ts.append(where_clause);
        }

        // FACET
        if !self.facet.is_empty() {
            ts.space().push(Token::Facet).space();
            for (i, facet) in self.facet.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.raw(facet.as_str());
            }
        }

        // SINCE
        if let Some(since) = &self.since {
            ts.space().append(&since.to_tokens());
        }

        // ORDER BY
        if let Some(order_by) = &self.order_by {
            ts.space().push(Token::OrderBy).space();
            ts.append(&order_by.to_tokens());
        }

        // LIMIT
        if let Some(limit) = &self.limit {
            ts.space().append(&limit.to_tokens());
        }

        // TIMESERIES
        if self.timeseries {
            ts.space().push(Token::Timeseries);
        }

        ts
    }

    /// Generate NRQL for a specific dialect.
    pub fn to_nrql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }
}

impl std::fmt::Display for Query {
    /// Formats the query using the default dialect.
    ///
    /// For dialect-specific output, use [`Query::to_nrql`] instead.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_nrql(Dialect::default()))
    }
}
