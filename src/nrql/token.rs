//! NRQL Tokens - the atomic units of query output.
//!
//! Tokens are dialect-agnostic representations that serialize
//! to dialect-specific strings.

use super::dialect::{Dialect, NrqlDialect};

/// NRQL Token - every element the compiler emits.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    And,
    As,
    In,
    Facet,
    Since,
    Until,
    MinutesAgo,
    OrderBy,
    Asc,
    Desc,
    Limit,
    Max,
    Timeseries,
    Uniques,

    // === Punctuation ===
    Comma,
    LParen,
    RParen,

    // === Whitespace ===
    Space,

    // === Dynamic Content ===
    /// Attribute name (identity attributes, facets).
    Attr(String),
    /// Signed integer literal (epoch timestamps).
    LitInt(i64),
    /// Unsigned integer literal (row caps, minute counts).
    LitUint(u64),

    // === Escape Hatch ===
    /// Text passed directly to output.
    ///
    /// Catalog expressions and caller filter clauses travel as raw text;
    /// the compiler never validates them.
    Raw(String),
}

impl Token {
    /// Serialize this token to a string for the given dialect.
    pub fn serialize(&self, dialect: Dialect) -> String {
        match self {
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::As => "AS".into(),
            Token::In => "IN".into(),
            Token::Facet => "FACET".into(),
            Token::Since => "SINCE".into(),
            Token::Until => "UNTIL".into(),
            Token::MinutesAgo => "MINUTES AGO".into(),
            Token::OrderBy => "ORDER BY".into(),
            Token::Asc => "ASC".into(),
            Token::Desc => "DESC".into(),
            Token::Limit => "LIMIT".into(),
            Token::Max => "MAX".into(),
            Token::Timeseries => "TIMESERIES".into(),
            Token::Uniques => "uniques".into(),

            Token::Comma => ",".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            Token::Space => " ".into(),

            Token::Attr(name) => dialect.quote_attribute(name),
            Token::LitInt(n) => n.to_string(),
            Token::LitUint(n) => n.to_string(),

            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to NRQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Serialize all tokens to an NRQL string.
    pub fn serialize(&self, dialect: Dialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
    /// Append verbatim text. Empty text adds nothing.
    pub fn raw(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if !text.is_empty() {
            self.push(Token::Raw(text));
        }
        self
    }
}
