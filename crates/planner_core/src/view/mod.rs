//! Derived list views: filtering, search, sorting and totals.
//!
//! # Responsibility
//! - Compute what a list screen shows from the full in-memory collection.
//!
//! # Invariants
//! - Every function here is pure; identical inputs give identical output.
//! - Blank search text never filters anything out.

pub mod expenses;
pub mod people;

/// Lowercased, trimmed search needle; `None` for blank input.
pub(crate) fn search_needle(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

pub(crate) fn contains_needle(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
