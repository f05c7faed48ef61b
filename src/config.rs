//! Runtime configuration for the fetch pipeline.
//!
//! Every field has a default, so a run with no configuration file and no CLI
//! overrides queries arXiv for the built-in topic list and writes
//! `data/papers.json`. A YAML file may override any subset of fields:
//!
//! ```yaml
//! max_results: 25
//! retries: 3
//! decode_mode: lite
//! topics:
//!   - generative recommendation
//! ```

use crate::error::Error;
use crate::feed::DecodeMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// arXiv export API endpoint.
pub const ARXIV_API: &str = "https://export.arxiv.org/api/query";

/// Relay used when arXiv cannot be reached directly.
pub const RELAY_URL: &str = "https://api.allorigins.win/raw";

/// Page size requested from arXiv.
pub const MAX_RESULTS: usize = 50;

/// Topic phrases searched in titles and abstracts.
pub const SEARCH_TERMS: &[&str] = &[
    "generative recommendation",
    "generative recommender",
    "LLM recommendation",
    "large language model recommendation",
    "diffusion recommendation",
    "generative retrieval recommendation",
];

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Search API endpoint.
    pub base_url: String,
    /// Relay endpoint; the original URL is passed in its `url` parameter.
    pub relay_url: String,
    /// Phrases OR'd together in the search query.
    pub topics: Vec<String>,
    /// `max_results` sent upstream, and the cap on written papers.
    pub max_results: usize,
    /// Attempts per route.
    pub retries: usize,
    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,
    /// Pause between attempts in milliseconds; 0 disables it.
    pub retry_delay_ms: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Where the result document is written.
    pub output_path: PathBuf,
    /// Whether author affiliations and comments are decoded.
    pub decode_mode: DecodeMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: ARXIV_API.to_string(),
            relay_url: RELAY_URL.to_string(),
            topics: SEARCH_TERMS.iter().map(|t| t.to_string()).collect(),
            max_results: MAX_RESULTS,
            retries: 2,
            timeout_secs: 30,
            retry_delay_ms: 0,
            user_agent: "RecPaperHub/1.0".to_string(),
            output_path: PathBuf::from("data/papers.json"),
            decode_mode: DecodeMode::Full,
        }
    }
}

impl Config {
    /// Load configuration from an optional YAML file, falling back to defaults.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&raw)?;
                info!(path = %path.display(), "Loaded configuration file");
                config
            }
            None => {
                debug!("No configuration file given; using defaults");
                Config::default()
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that both endpoints parse as URLs.
    pub fn validate(&self) -> Result<(), Error> {
        Url::parse(&self.base_url)?;
        Url::parse(&self.relay_url)?;
        Ok(())
    }

    /// Per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base pause between attempts.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
