//! Filter clauses of the canonical shape `(attribute) IN (values)`.

use serde::{Deserialize, Serialize};

use crate::nrql::dialect::helpers::quote_string_single;

/// A single WHERE clause as supplied by the dashboard.
///
/// The attribute expression is extracted once when the clause is built and
/// travels with it, so classification never has to re-parse the text.
/// Clauses that don't match the canonical shape keep `attribute == None`
/// and pass through the compiler untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FilterClause {
    text: String,
    attribute: Option<String>,
}

impl FilterClause {
    /// Wrap caller-supplied clause text.
    pub fn raw(text: impl Into<String>) -> Self {
        let text = text.into();
        let attribute = extract_attribute(&text);
        Self { text, attribute }
    }

    /// Build `(attribute) IN ('v1', 'v2')` with quoted values.
    pub fn in_list<I, S>(attribute: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: Vec<String> = values
            .into_iter()
            .map(|v| quote_string_single(v.as_ref()))
            .collect();
        Self {
            text: format!("({}) IN ({})", attribute, values.join(", ")),
            attribute: Some(attribute.to_string()),
        }
    }

    /// The attribute expression this clause constrains, if recognisable.
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<String> for FilterClause {
    fn from(text: String) -> Self {
        FilterClause::raw(text)
    }
}

impl From<&str> for FilterClause {
    fn from(text: &str) -> Self {
        FilterClause::raw(text)
    }
}

impl From<FilterClause> for String {
    fn from(clause: FilterClause) -> Self {
        clause.text
    }
}

impl std::fmt::Display for FilterClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Substring inside the parentheses that precede ` IN `.
fn extract_attribute(text: &str) -> Option<String> {
    let in_pos = text.find(" IN ").or_else(|| text.find(" in "))?;
    let head = &text[..in_pos];
    let open = head.find('(')?;
    let close = head.rfind(')')?;
    if close <= open {
        return None;
    }
    let attribute = head[open + 1..close].trim();
    if attribute.is_empty() {
        None
    } else {
        Some(attribute.to_string())
    }
}
