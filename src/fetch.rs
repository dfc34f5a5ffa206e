//! Page fetching.
//!
//! The pipeline only needs "give me the HTML behind this URL", expressed by
//! the [`PageFetcher`] trait. [`HttpFetcher`] implements it on top of a shared
//! `reqwest::Client`; tests swap in an in-memory fetcher serving fixtures.
//!
//! Retrying is intentionally absent: a failed request fails the department
//! that issued it.

use crate::config::Settings;
use crate::error::FetchError;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Async source of HTML pages.
pub trait PageFetcher {
    /// Fetch `url` and return the response body as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`PageFetcher`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build the shared client.
    ///
    /// # Arguments
    ///
    /// * `settings` - Supplies the request timeout and user agent
    ///
    /// # Returns
    ///
    /// A fetcher, or the builder error when TLS initialization fails.
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Non-success response");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        debug!(
            %url,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
