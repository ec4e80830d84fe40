//! Search query parsing and compilation
//!
//! The raw syntax mixes free text, quoted phrases, and `field:value` filters
//! (including dotted sub-field filters like `license.url:...`). Parsing is a
//! single pass; compilation renders the engine-native full-text query plus a
//! single `&&`-joined filter expression.

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{IndexError, IndexResult};

/// Quoted phrase (verbatim, quotes stripped), then the remainder of the input
/// after an unmatched quote, then any whitespace-delimited token.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)"|"(.*)$|(\S+)"#).expect("token pattern is valid"));

/// A parsed search string: raw full-text terms in input order plus
/// `field -> value` filters.
///
/// Filter keys are unique; when a field repeats, the last occurrence wins
/// (one value per key, multi-value filters are unsupported). Quoted phrases
/// always stay raw terms, even when their content looks like a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    raw_terms: Vec<String>,
    field_filters: Vec<(String, String)>,
}

impl SearchQuery {
    /// Parse a raw search string.
    ///
    /// Token classes in priority order:
    /// 1. `"..."`: one raw term, interior spaces preserved;
    /// 2. `field.sub:value`: dotted filter, split at the first colon, so the
    ///    value may itself contain colons (`license.url:https://x`);
    /// 3. `field:value`: simple filter, exactly one colon and no dot before
    ///    it (so `https://x` becomes the filter `https -> //x`, while a token
    ///    with two or more colons stays a term);
    /// 4. anything else: a raw term.
    pub fn parse(input: &str) -> Self {
        let mut query = SearchQuery::default();

        for capture in TOKEN_RE.captures_iter(input) {
            if let Some(phrase) = capture.get(1).or_else(|| capture.get(2)) {
                if !phrase.as_str().is_empty() {
                    query.raw_terms.push(phrase.as_str().to_string());
                }
                continue;
            }
            let token = match capture.get(3) {
                Some(token) => token.as_str(),
                None => continue,
            };

            match split_filter(token) {
                Some((field, value)) => query.set_filter(field, value),
                None => query.raw_terms.push(token.to_string()),
            }
        }

        query
    }

    /// Raw full-text terms in input order.
    pub fn raw_terms(&self) -> &[String] {
        &self.raw_terms
    }

    /// Filter entries in first-seen field order.
    pub fn field_filters(&self) -> &[(String, String)] {
        &self.field_filters
    }

    /// Value of a filter field, if present.
    pub fn filter(&self, field: &str) -> Option<&str> {
        self.field_filters
            .iter()
            .find(|(key, _)| key == field)
            .map(|(_, value)| value.as_str())
    }

    fn set_filter(&mut self, field: &str, value: &str) {
        if let Some(entry) = self.field_filters.iter_mut().find(|(key, _)| key == field) {
            entry.1 = value.to_string();
        } else {
            self.field_filters
                .push((field.to_string(), value.to_string()));
        }
    }

    /// Render the engine-native query parameters. Empty input compiles to an
    /// empty full-text query and no filter, which the store client maps to
    /// its match-all convention.
    pub fn compile(&self) -> IndexResult<CompiledQuery> {
        let mut expr = FilterExpr::new();
        for (field, value) in &self.field_filters {
            expr.push(FilterClause::matching(field, value));
        }

        Ok(CompiledQuery {
            query: self.raw_terms.join(" "),
            filter_by: if expr.is_empty() {
                None
            } else {
                Some(expr.render()?)
            },
        })
    }
}

/// Classify a bare token as a filter, returning `(field, value)`.
fn split_filter(token: &str) -> Option<(&str, &str)> {
    let idx = token.find(':')?;
    let (field, value) = (&token[..idx], &token[idx + 1..]);
    if field.is_empty() {
        return None;
    }

    if field.contains('.') {
        // dotted form requires a non-empty value
        if value.is_empty() {
            return None;
        }
        return Some((field, value));
    }

    // simple form requires exactly one colon; the value may be empty
    if token.matches(':').count() == 1 {
        return Some((field, value));
    }

    None
}

/// A compiled query ready for the document store: the full-text query text
/// and the rendered filter expression, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledQuery {
    pub query: String,
    pub filter_by: Option<String>,
}

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Token match (`field:value`), used for user-supplied filters
    Match,
    /// Exact match (`field:=value`), used for natural-key lookups
    Exact,
}

/// One `field <op> value` filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

impl FilterClause {
    pub fn matching(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Match,
            value: value.into(),
        }
    }

    pub fn exact(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Exact,
            value: value.into(),
        }
    }

    /// Render this clause in the store's filter syntax, escaping the value.
    /// Values that cannot be escaped and malformed field names are rejected
    /// rather than interpolated.
    pub fn render(&self) -> IndexResult<String> {
        if self.field.is_empty()
            || !self
                .field
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            return Err(IndexError::InvalidFilterValue(format!(
                "invalid filter field name: {:?}",
                self.field
            )));
        }

        let op = match self.op {
            FilterOp::Match => ":",
            FilterOp::Exact => ":=",
        };
        Ok(format!("{}{}{}", self.field, op, escape_value(&self.value)?))
    }
}

/// An ordered, AND-joined list of filter clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpr {
    clauses: Vec<FilterClause>,
}

impl FilterExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, clause: FilterClause) {
        self.clauses.push(clause);
    }

    pub fn with(mut self, clause: FilterClause) -> Self {
        self.push(clause);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// Render all clauses joined with ` && `.
    pub fn render(&self) -> IndexResult<String> {
        let rendered: IndexResult<Vec<String>> =
            self.clauses.iter().map(FilterClause::render).collect();
        Ok(rendered?.join(" && "))
    }
}

/// Backtick-quote values the filter grammar would otherwise misparse. Values
/// containing a backtick cannot be quoted at all and are rejected.
fn escape_value(value: &str) -> IndexResult<String> {
    if value.contains('`') {
        return Err(IndexError::InvalidFilterValue(format!(
            "filter value contains a backtick: {:?}",
            value
        )));
    }

    let needs_quoting = value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, ':' | '&' | '"' | '(' | ')'));
    if needs_quoting {
        Ok(format!("`{}`", value))
    } else {
        Ok(value.to_string())
    }
}
