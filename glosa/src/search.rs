//! Free-text matching and result ordering
//!
//! Category and favorites filters are applied by SQL when candidates are
//! fetched. The text predicate and the sort run here because SQLite's
//! `LIKE`/`NOCASE` only fold ASCII, and the glossary is full of accents.

use crate::interface::{GlosaError, Language, Term};

/// Result limit when the caller does not choose one
pub const DEFAULT_SEARCH_LIMIT: u32 = 200;

/// Largest result page a caller may request
pub const MAX_SEARCH_LIMIT: u32 = 250;

/// Trim and lower-case a raw query. An empty result matches every term.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Validate a requested limit and clamp it to `MAX_SEARCH_LIMIT`
pub fn effective_limit(limit: u32) -> Result<usize, GlosaError> {
    if limit == 0 {
        return Err(GlosaError::InvalidInput("search limit must be at least 1".into()));
    }
    Ok(limit.min(MAX_SEARCH_LIMIT) as usize)
}

/// True if `needle` (already normalized) occurs in any searchable field.
pub fn term_matches(term: &Term, needle: &str, source: Language) -> bool {
    if needle.is_empty() {
        return true;
    }
    term.searchable_fields(source)
        .iter()
        .any(|field| !field.is_empty() && field.to_lowercase().contains(needle))
}

/// Sort key shared by search results and favorites
fn es_sort_key(term: &Term) -> (String, String) {
    (term.es.to_lowercase(), term.id.clone())
}

/// Sort terms ascending by case-folded Spanish text, ties broken by id
pub fn sort_terms(terms: &mut [Term]) {
    terms.sort_by_cached_key(es_sort_key);
}

/// Case-insensitive ascending sort for category labels
pub fn sort_labels(labels: &mut [String]) {
    labels.sort_by_cached_key(|label| (label.to_lowercase(), label.clone()));
}

/// Apply the text predicate, sort, and truncate.
pub fn run_query(candidates: Vec<Term>, needle: &str, source: Language, limit: usize) -> Vec<Term> {
    let mut matched: Vec<Term> = candidates
        .into_iter()
        .filter(|term| term_matches(term, needle, source))
        .collect();
    sort_terms(&mut matched);
    matched.truncate(limit);
    matched
}
