//! HTTP retrieval with route fallback and bounded retries.
//!
//! arXiv's export API is occasionally unreachable from CI runners, so every
//! fetch tries two routes in order: a direct request, then the same URL passed
//! through a public relay. Each route is attempted a fixed number of times.
//!
//! # Architecture
//!
//! - [`FetchAsync`]: core trait for "GET this URL, give me the body"
//! - [`HttpFetch`]: `reqwest` implementation with a per-attempt timeout
//! - [`RouteFallback`]: decorator that walks the routes and retries any [`FetchAsync`]
//!
//! Total attempts are bounded by `routes × retries`; when all of them fail the
//! fetch returns [`Error::Fetch`] and the caller must not write any output.

use crate::config::Config;
use crate::error::{Error, FetchError};
use rand::{Rng, rng};
use reqwest::Client;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Trait for async retrieval of a response body.
pub trait FetchAsync {
    /// Fetch `url` and return the response body as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// One network path to the upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Request the URL as-is.
    Direct,
    /// Request `endpoint?url=<percent-encoded URL>`.
    Relay {
        /// Relay endpoint without query string.
        endpoint: String,
    },
}

impl Route {
    /// Short label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Route::Direct => "direct",
            Route::Relay { .. } => "proxy",
        }
    }

    /// The URL actually requested for `url` on this route.
    pub fn target(&self, url: &str) -> String {
        match self {
            Route::Direct => url.to_string(),
            Route::Relay { endpoint } => format!("{endpoint}?url={}", urlencoding::encode(url)),
        }
    }
}

/// A successful fetch and how it was obtained.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// Response body.
    pub body: String,
    /// Route that delivered the body.
    pub route: Route,
    /// Attempts made across all routes, including the successful one.
    pub attempts: usize,
}

/// `reqwest`-backed [`FetchAsync`] with a fixed per-attempt timeout.
#[derive(Debug, Clone)]
pub struct HttpFetch {
    client: Client,
    timeout: Duration,
}

impl HttpFetch {
    /// Build a client that identifies itself with `user_agent`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Http(e)
        }
    }
}

impl FetchAsync for HttpFetch {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        resp.text().await.map_err(|e| self.classify(e))
    }
}

/// Walks a list of [`Route`]s, retrying each up to `retries` times.
///
/// When `delay` is non-zero the loop pauses `delay` plus 0-250ms of random
/// jitter between consecutive attempts.
pub struct RouteFallback<T> {
    inner: T,
    routes: Vec<Route>,
    retries: usize,
    delay: Duration,
}

impl<T> RouteFallback<T>
where
    T: FetchAsync,
{
    /// Wrap `inner` with the given routes; `retries` is clamped to at least one.
    pub fn new(inner: T, routes: Vec<Route>, retries: usize, delay: Duration) -> Self {
        Self {
            inner,
            routes,
            retries: retries.max(1),
            delay,
        }
    }

    /// Direct route followed by the configured relay.
    pub fn from_config(inner: T, config: &Config) -> Self {
        let routes = vec![
            Route::Direct,
            Route::Relay {
                endpoint: config.relay_url.clone(),
            },
        ];
        Self::new(inner, routes, config.retries, config.retry_delay())
    }

    /// Fetch `url`, falling through routes until one succeeds.
    #[instrument(level = "info", skip_all)]
    pub async fn fetch(&self, url: &str) -> Result<Fetched, Error> {
        let total_t0 = Instant::now();
        let mut attempts = 0usize;
        let mut last = None;

        for route in &self.routes {
            let target = route.target(url);
            let label = route.label();

            for attempt in 1..=self.retries {
                if attempts > 0 {
                    self.pause().await;
                }
                attempts += 1;
                info!(route = label, attempt, "Trying {label} (attempt {attempt})");

                let attempt_t0 = Instant::now();
                match self.inner.fetch(&target).await {
                    Ok(body) => {
                        info!(
                            route = label,
                            attempt,
                            attempts,
                            bytes = body.len(),
                            elapsed_ms = attempt_t0.elapsed().as_millis(),
                            "Fetch succeeded"
                        );
                        return Ok(Fetched {
                            body,
                            route: route.clone(),
                            attempts,
                        });
                    }
                    Err(e) => {
                        warn!(
                            route = label,
                            attempt,
                            elapsed_ms = attempt_t0.elapsed().as_millis(),
                            error = %e,
                            "{label} attempt {attempt} failed"
                        );
                        last = Some(e);
                    }
                }
            }
        }

        error!(
            attempts,
            elapsed_ms_total = total_t0.elapsed().as_millis(),
            "All fetch attempts failed"
        );
        match last {
            Some(last) => Err(Error::Fetch { attempts, last }),
            None => Err(Error::NoRoutes),
        }
    }

    async fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }
        let jitter_ms: u64 = rng().random_range(0..=250);
        sleep(self.delay + Duration::from_millis(jitter_ms)).await;
    }
}

impl<T> fmt::Debug for RouteFallback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteFallback")
            .field("routes", &self.routes)
            .field("retries", &self.retries)
            .field("delay", &self.delay)
            .finish()
    }
}
