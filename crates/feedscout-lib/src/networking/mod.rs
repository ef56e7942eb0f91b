//! HTTP access to package feeds
//!
//! [`HttpClient`] is the seam the feed adapters talk through. The production
//! implementation is [`NetworkingManager`] (reqwest with a timeout and
//! exponential backoff on HTTP 429); tests use [`MockHttpClient`].

use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{trace, warn};

use crate::primitives::AuthHeader;

#[cfg(any(test, feature = "test-utils"))]
mod mock;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockHttpClient;

/// Networking errors for feed communication
#[derive(Debug, Error)]
pub enum NetworkingError {
    #[error("HTTP request failed: {source}")]
    RequestFailed {
        #[from]
        source: reqwest::Error,
    },

    #[error("Rate limit exceeded after {retries} retries: {url}")]
    RateLimited { url: String, retries: u32 },

    #[error("Transport failure: {message}")]
    Transport { message: String },
}

/// Backoff strategy for rate limiting
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Initial backoff duration
    pub initial: Duration,
    /// Maximum backoff duration
    pub max: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
    /// Retries after the first 429 before giving up
    pub max_retries: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(30),
            multiplier: 2.0,
            max_retries: 4,
        }
    }
}

impl BackoffConfig {
    /// Next delay after `current`, capped at `max`
    pub fn next_delay(&self, current: Duration) -> Duration {
        Duration::from_secs_f64(current.as_secs_f64() * self.multiplier).min(self.max)
    }
}

/// Networking configuration
#[derive(Debug, Clone)]
pub struct NetworkingConfig {
    /// HTTP client timeout in seconds
    pub timeout_seconds: u64,
    /// Backoff applied when a feed answers 429
    pub backoff: BackoffConfig,
}

impl Default for NetworkingConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            backoff: BackoffConfig::default(),
        }
    }
}

/// Status and raw body of a completed request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal GET capability the feed adapters need
pub trait HttpClient: Send + Sync {
    /// Issue a GET, attaching `auth` when present.
    ///
    /// Any status code is a successful call; only transport failures are errors.
    fn get(
        &self,
        url: &str,
        auth: Option<&AuthHeader>,
    ) -> impl Future<Output = Result<HttpResponse, NetworkingError>> + Send;
}

/// reqwest-backed feed client
pub struct NetworkingManager {
    client: Client,
    config: NetworkingConfig,
}

impl NetworkingManager {
    /// Build the HTTP client with the configured timeout
    pub fn new(config: NetworkingConfig) -> Result<Self, NetworkingError> {
        trace!("Initializing networking manager");

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("feedscout/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }
}

impl HttpClient for NetworkingManager {
    async fn get(
        &self,
        url: &str,
        auth: Option<&AuthHeader>,
    ) -> Result<HttpResponse, NetworkingError> {
        let backoff = &self.config.backoff;
        let mut delay = backoff.initial;
        let mut retry_count = 0;

        loop {
            let mut request = self.client.get(url);
            if let Some(auth) = auth {
                request = request.header(auth.name(), auth.value());
            }

            trace!(url, "GET");
            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if retry_count >= backoff.max_retries {
                    return Err(NetworkingError::RateLimited {
                        url: url.to_string(),
                        retries: retry_count,
                    });
                }
                retry_count += 1;

                warn!(
                    "Rate limit hit (429) for {}, backing off for {:?} (retry {}/{})",
                    url, delay, retry_count, backoff.max_retries
                );

                tokio::time::sleep(delay).await;
                delay = backoff.next_delay(delay);
                continue;
            }

            let body = response.bytes().await?.to_vec();
            trace!(url, status = status.as_u16(), bytes = body.len(), "response");

            return Ok(HttpResponse {
                status: status.as_u16(),
                body,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
