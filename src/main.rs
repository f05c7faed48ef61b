//! # RecPaperHub
//!
//! Fetches the newest generative-recommendation papers from the arXiv export
//! API, tags papers that come from industry labs, and writes them to
//! `data/papers.json` for the static site that renders the list.
//!
//! ## Usage
//!
//! ```sh
//! rec_paper_hub
//! ```
//!
//! ## Architecture
//!
//! One sequential pass per invocation:
//! 1. **Query**: OR together title and abstract matches for each topic phrase
//! 2. **Fetch**: direct request, then a relay, each retried a fixed number of times
//! 3. **Parse**: decode the Atom feed and detect industry affiliations
//! 4. **Output**: industry papers first, academic papers after, written as JSON
//!
//! If the fetch or the parse fails, nothing is written and the previous
//! `papers.json` stays in place.

use clap::Parser;
use std::error::Error;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod classify;
mod cli;
mod config;
mod error;
mod feed;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod query;
mod utils;

use cli::Cli;
use config::Config;
use fetch::{HttpFetch, RouteFallback};
use utils::ensure_output_dir;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    let config = args.apply(Config::load(args.config.as_deref())?);
    info!(
        max_results = config.max_results,
        retries = config.retries,
        mode = ?config.decode_mode,
        output = %config.output_path.display(),
        "Configuration loaded"
    );

    if let Err(e) = ensure_output_dir(&config.output_path).await {
        error!(
            path = %config.output_path.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let http = HttpFetch::new(&config.user_agent, config.timeout()).map_err(error::Error::Client)?;
    let fetcher = RouteFallback::from_config(http, &config);

    let summary = match pipeline::run(&config, &fetcher).await {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Run aborted; existing output left untouched");
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        papers = summary.written,
        industry = summary.industry,
        academic = summary.academic,
        total_results = summary.total_results,
        route = summary.route.label(),
        attempts = summary.attempts,
        millis = elapsed.as_millis(),
        "Saved to {} ({} papers, updated {})",
        summary.output.display(),
        summary.written,
        summary.last_updated
    );

    Ok(())
}
