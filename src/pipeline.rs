//! The fetch → parse → classify → dedupe → partition → write pipeline.
//!
//! A run either completes and overwrites the output file, or fails before the
//! write and leaves the previous file untouched. There is no partial output.

use crate::classify::partition_by_source;
use crate::config::Config;
use crate::error::Error;
use crate::feed::parse_feed;
use crate::fetch::{FetchAsync, Route, RouteFallback};
use crate::models::{Paper, ResultDocument};
use crate::outputs::json::write_document;
use crate::query::build_query;
use crate::utils::truncate_for_log;
use chrono::Utc;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// Outcome of a successful run, reported on the final log line.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Upstream match count.
    pub total_results: u64,
    /// Papers written to the document.
    pub written: usize,
    /// Papers with a detected industry source.
    pub industry: usize,
    /// Papers without one.
    pub academic: usize,
    /// Route that delivered the feed.
    pub route: Route,
    /// Fetch attempts made.
    pub attempts: usize,
    /// Where the document was written.
    pub output: PathBuf,
    /// `lastUpdated` value of the document.
    pub last_updated: String,
}

/// Drop repeated ids, keeping the first occurrence. Papers without an id are kept.
pub fn dedupe_by_id(papers: Vec<Paper>) -> Vec<Paper> {
    let before = papers.len();
    let mut seen = HashSet::new();
    let unique: Vec<Paper> = papers
        .into_iter()
        .filter(|p| p.id.is_empty() || seen.insert(p.id.clone()))
        .collect();
    if unique.len() < before {
        warn!(dropped = before - unique.len(), "Dropped duplicate entries");
    }
    unique
}

/// Current UTC time in the document's `lastUpdated` format.
pub fn timestamp_now() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Run the whole pipeline once with `fetcher`.
#[instrument(level = "info", skip_all, fields(output = %config.output_path.display()))]
pub async fn run<T: FetchAsync>(
    config: &Config,
    fetcher: &RouteFallback<T>,
) -> Result<RunSummary, Error> {
    info!("Fetching papers from arXiv...");
    let url = build_query(&config.base_url, &config.topics, config.max_results);
    info!(url = %truncate_for_log(&url, 120), "Built query URL");

    let fetched = fetcher.fetch(&url).await?;
    let page = parse_feed(&fetched.body, config.decode_mode)?;
    info!(total_results = page.total_results, entries = page.papers.len(), "Decoded feed");

    let mut papers = dedupe_by_id(page.papers);
    if papers.len() > config.max_results {
        debug!(
            received = papers.len(),
            max_results = config.max_results,
            "Truncating to page size"
        );
        papers.truncate(config.max_results);
    }

    let (papers, industry) = partition_by_source(papers);
    let academic = papers.len() - industry;
    info!(
        total = papers.len(),
        industry,
        academic,
        "Parsed {} papers ({} industry, {} academic)",
        papers.len(),
        industry,
        academic
    );

    let last_updated = timestamp_now();
    let document = ResultDocument {
        last_updated: last_updated.clone(),
        total_results: page.total_results,
        papers,
    };
    write_document(&document, &config.output_path).await?;

    Ok(RunSummary {
        total_results: page.total_results,
        written: document.papers.len(),
        industry,
        academic,
        route: fetched.route,
        attempts: fetched.attempts,
        output: config.output_path.clone(),
        last_updated,
    })
}
