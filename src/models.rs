//! Data models for fetched papers and the published result document.
//!
//! This module defines the structures serialized to `data/papers.json`:
//! - [`Paper`]: one arXiv publication, annotated with its detected industry source
//! - [`ResultDocument`]: the top-level document rewritten on every run
//!
//! Field names are serialized in camelCase to match the schema expected by the
//! presentation layer that consumes the file.

use serde::{Deserialize, Serialize};

/// A single arXiv publication as published in the result document.
///
/// Every field is a plain string or list so that a missing element in the
/// upstream feed degrades to an empty value instead of a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// Canonical identifier, the `http://arxiv.org/abs/...` URL.
    pub id: String,
    /// Whitespace-collapsed title.
    pub title: String,
    /// Author display names in feed order.
    pub authors: Vec<String>,
    /// Free-text affiliations of all authors, in feed order.
    pub affiliations: Vec<String>,
    /// Whitespace-collapsed abstract.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Submission timestamp, passed through untouched.
    pub published: String,
    /// Last revision timestamp, passed through untouched.
    pub updated: String,
    /// arXiv category codes such as `cs.IR`.
    pub categories: Vec<String>,
    /// Link to the PDF, or empty.
    pub pdf_url: String,
    /// Link to the abstract landing page, or empty.
    pub abs_url: String,
    /// Display name of the detected industry lab, or empty for academic work.
    pub industry_source: String,
}

impl Paper {
    /// Whether a company was detected for this paper.
    pub fn is_industry(&self) -> bool {
        !self.industry_source.is_empty()
    }
}

/// The JSON document written once per run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDocument {
    /// UTC generation time, `YYYY-MM-DDTHH:MM:SSZ`.
    pub last_updated: String,
    /// Match count reported by arXiv; may exceed `papers.len()`.
    pub total_results: u64,
    /// Industry papers first, then academic papers.
    pub papers: Vec<Paper>,
}
