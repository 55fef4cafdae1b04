//! Search engine: query parsing and index-backed evaluation.

pub mod query;

use std::collections::HashSet;

use crate::store::PostcardStore;

use self::query::{parse_query, SearchQuery, SearchTerm};

/// High-level search: parse the query, evaluate it against the store's
/// indices, and return matching postcard positions.
pub fn execute(
    store: &PostcardStore,
    query_str: &str,
) -> crate::error::Result<(SearchQuery, Vec<usize>)> {
    let query = parse_query(query_str)?;
    let results = evaluate(store, &query);
    Ok((query, results))
}

/// Evaluate an already-parsed query.
///
/// Each term selects one index bucket (or a run of date buckets); the result
/// is their intersection. When a date term is present the result follows its
/// date order, otherwise insertion order. An empty query selects everything.
pub fn evaluate(store: &PostcardStore, query: &SearchQuery) -> Vec<usize> {
    if query.is_empty() {
        return (0..store.count()).collect();
    }

    let mut selections: Vec<Vec<usize>> = query
        .terms
        .iter()
        .map(|term| positions_for(store, term))
        .collect();

    // Lead with the first date term so its ordering carries through.
    let lead = query
        .terms
        .iter()
        .position(|t| matches!(t, SearchTerm::DateRange(..)))
        .unwrap_or(0);
    let base = selections.swap_remove(lead);

    let filters: Vec<HashSet<usize>> = selections
        .into_iter()
        .map(|s| s.into_iter().collect())
        .collect();

    base.into_iter()
        .filter(|pos| filters.iter().all(|f| f.contains(pos)))
        .collect()
}

fn positions_for(store: &PostcardStore, term: &SearchTerm) -> Vec<usize> {
    let index = store.index();
    match term {
        SearchTerm::Sender(name) => index.sender_bucket(name).to_vec(),
        SearchTerm::Receiver(name) => index.receiver_bucket(name).to_vec(),
        SearchTerm::DateRange(start, end) => index.date_positions(*start, *end),
    }
}
