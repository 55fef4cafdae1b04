//! Search query parser.
//!
//! Parses user-typed query strings into a structured [`SearchQuery`] that maps
//! directly onto the store's three lookups.
//!
//! # Supported syntax
//!
//! **Names** (exact, case-sensitive):
//! - `from:Sneezy`
//! - `to:Alice`
//! - `from:"Snow White"`: quotes group names containing spaces
//!
//! **Date filters** (inclusive):
//! - `date:2010-06-23` / `date:2010-06` / `date:2010`
//! - `date:2008-01-01..2010-12-31` (partial dates accepted on either side)
//! - `before:2010-01-01` / `after:2010-01-01` (exclusive)
//!
//! Terms separated by whitespace must all match.

use chrono::{Months, NaiveDate};

use crate::error::{PostcardError, Result};
use crate::parser::line::parse_date;

/// A single search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// Exact sender name.
    Sender(String),
    /// Exact receiver name.
    Receiver(String),
    /// Inclusive date range.
    DateRange(NaiveDate, NaiveDate),
}

/// A fully parsed search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Terms that must all match. Empty selects every postcard.
    pub terms: Vec<SearchTerm>,
}

impl SearchQuery {
    /// Whether the query selects everything.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether any term filters by date.
    pub fn has_date_term(&self) -> bool {
        self.terms
            .iter()
            .any(|t| matches!(t, SearchTerm::DateRange(..)))
    }
}

/// Parse a query string into a structured [`SearchQuery`].
///
/// Unlike free-text search, every token must be a recognised `field:value`
/// pair; anything else is an [`PostcardError::InvalidQuery`].
pub fn parse_query(input: &str) -> Result<SearchQuery> {
    let mut terms = Vec::new();

    for token in tokenize(input.trim()) {
        let term = if let Some(value) = token.strip_prefix("from:") {
            SearchTerm::Sender(unquote(value, &token)?)
        } else if let Some(value) = token.strip_prefix("to:") {
            SearchTerm::Receiver(unquote(value, &token)?)
        } else if let Some(value) = token.strip_prefix("date:") {
            let (start, end) = parse_date_filter(value)
                .ok_or_else(|| PostcardError::InvalidQuery(format!("bad date '{value}'")))?;
            SearchTerm::DateRange(start, end)
        } else if let Some(value) = token.strip_prefix("before:") {
            let end = parse_date(value)
                .and_then(|d| d.pred_opt())
                .ok_or_else(|| PostcardError::InvalidQuery(format!("bad date '{value}'")))?;
            SearchTerm::DateRange(NaiveDate::MIN, end)
        } else if let Some(value) = token.strip_prefix("after:") {
            let start = parse_date(value)
                .and_then(|d| d.succ_opt())
                .ok_or_else(|| PostcardError::InvalidQuery(format!("bad date '{value}'")))?;
            SearchTerm::DateRange(start, NaiveDate::MAX)
        } else {
            return Err(PostcardError::InvalidQuery(format!(
                "unrecognised term '{token}' (expected from:, to:, date:, before: or after:)"
            )));
        };
        terms.push(term);
    }

    Ok(SearchQuery { terms })
}

/// Strip surrounding double quotes from a name. Empty names are rejected.
fn unquote(value: &str, token: &str) -> Result<String> {
    let name = value
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(value);
    if name.is_empty() {
        return Err(PostcardError::InvalidQuery(format!("empty name in '{token}'")));
    }
    Ok(name.to_string())
}

/// Tokenize input respecting quoted strings.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
            current.push(ch);
        } else if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Parse a date filter value like `2010-06-23`, `2010-06`, `2010`, or a
/// range `2008-01-01..2010-12-31`, into an inclusive `(start, end)` pair.
pub fn parse_date_filter(value: &str) -> Option<(NaiveDate, NaiveDate)> {
    if let Some((start, end)) = value.split_once("..") {
        return Some((parse_flexible_date_start(start)?, parse_flexible_date_end(end)?));
    }
    Some((parse_flexible_date_start(value)?, parse_flexible_date_end(value)?))
}

/// Parse a flexible date, returning the first day of the period.
/// Accepts `YYYY-MM-DD`, `YYYY-MM` (→ first of month), `YYYY` (→ Jan 1).
pub fn parse_flexible_date_start(s: &str) -> Option<NaiveDate> {
    if let Some(d) = parse_date(s) {
        return Some(d);
    }
    let parts: Vec<&str> = s.split('-').collect();
    match parts.as_slice() {
        [year, month] => NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1),
        [year] => NaiveDate::from_ymd_opt(year.parse().ok()?, 1, 1),
        _ => None,
    }
}

/// Parse a flexible date, returning the last day of the period.
/// Accepts `YYYY-MM-DD`, `YYYY-MM` (→ last of month), `YYYY` (→ Dec 31).
pub fn parse_flexible_date_end(s: &str) -> Option<NaiveDate> {
    if let Some(d) = parse_date(s) {
        return Some(d);
    }
    let parts: Vec<&str> = s.split('-').collect();
    match parts.as_slice() {
        [year, month] => {
            // Last day of month: first of next month, minus one day
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?
                .checked_add_months(Months::new(1))?
                .pred_opt()
        }
        [year] => NaiveDate::from_ymd_opt(year.parse().ok()?, 12, 31),
        _ => None,
    }
}
