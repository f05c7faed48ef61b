//! arXiv search query construction.
//!
//! Each topic phrase becomes a title match OR'd with an abstract match, and
//! every phrase is OR'd together. Results are sorted newest-first and limited
//! to a single page starting at offset 0.

use itertools::Itertools;

/// Build the full query URL for `topics` against `base_url`.
///
/// Spaces inside a phrase are written as `+` and the phrase is quoted, so
/// `"LLM recommendation"` becomes `ti:"LLM+recommendation"+OR+abs:"LLM+recommendation"`.
pub fn build_query(base_url: &str, topics: &[String], max_results: usize) -> String {
    let search_query = topics
        .iter()
        .flat_map(|topic| {
            let phrase = topic.replace(' ', "+");
            [format!("ti:\"{phrase}\""), format!("abs:\"{phrase}\"")]
        })
        .join("+OR+");

    format!(
        "{base_url}?search_query={search_query}\
         &sortBy=submittedDate&sortOrder=descending\
         &start=0&max_results={max_results}"
    )
}
