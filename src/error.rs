//! Error types for the paper pipeline.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! [`FetchError`] describes a single failed attempt and is always recovered by the
//! route/retry loop; [`Error`] is fatal and aborts the run before anything is written.

use std::time::Duration;

/// Failure of one HTTP attempt on one route.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// HTTP transport error (connection, DNS, TLS, body decoding, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The attempt did not complete within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-2xx status
    #[error("Unexpected status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },
}

/// Fatal pipeline errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Every route and attempt failed
    #[error("All fetch attempts failed ({attempts} attempts, last error: {last})")]
    Fetch {
        /// Total attempts made across all routes
        attempts: usize,
        /// The error reported by the final attempt
        last: FetchError,
    },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The fetcher was built without any route
    #[error("No fetch routes configured")]
    NoRoutes,

    /// XML syntax error in the upstream document
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Well-formed XML that is not the expected feed shape
    #[error("Malformed feed: {0}")]
    Malformed(String),

    /// Serializing the result document failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    /// A configured endpoint is not a valid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a malformed-feed error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}
