//! Command-line interface definitions.
//!
//! Every option is optional. Running the binary with no arguments fetches the
//! built-in topic list and writes `data/papers.json`, which is how the daily
//! CI job invokes it.

use crate::config::Config;
use crate::feed::DecodeMode;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the paper fetcher.
///
/// # Examples
///
/// ```sh
/// # Default run
/// rec_paper_hub
///
/// # Smaller page written elsewhere, without affiliation decoding
/// rec_paper_hub --max-results 20 --output /tmp/papers.json --lite
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to write the result document (default: data/papers.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of results requested from arXiv (default: 50)
    #[arg(short, long)]
    pub max_results: Option<usize>,

    /// Skip author affiliations and comments when decoding entries
    #[arg(long)]
    pub lite: bool,
}

impl Cli {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(max_results) = self.max_results {
            config.max_results = max_results;
        }
        if self.lite {
            config.decode_mode = DecodeMode::Lite;
        }
        config
    }
}
