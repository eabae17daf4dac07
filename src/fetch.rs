//! Fragment fetching.
//!
//! Everything the site loads over the network (page fragments, the
//! translation resource, gallery items) goes through a [`FragmentSource`].

use crate::retry::{with_retry_if, RetryConfig};
use futures::future::{BoxFuture, FutureExt};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Fetching {locator} failed with HTTP {status}")]
    Status { locator: String, status: u16 },

    #[error("Fetching {locator} failed: {message}")]
    Network { locator: String, message: String },
}

impl FetchError {
    /// Network errors, 5xx and 429 may succeed on another attempt; other
    /// statuses will not.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::Network { .. } => true,
        }
    }
}

/// Source of text resources addressed by locator.
///
/// Returned futures own everything they need, so they can outlive the call
/// and be polled alongside other work.
pub trait FragmentSource: Send + Sync {
    fn fetch(&self, locator: &str) -> BoxFuture<'static, Result<String, FetchError>>;
}

/// Fetches locators relative to a base URL over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFragmentSource {
    client: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl HttpFragmentSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::fragment(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Absolute URL for a locator. Absolute `http(s)` locators are kept as-is.
    pub fn url_for(&self, locator: &str) -> String {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            locator.to_string()
        } else {
            format!("{}/{}", self.base_url, locator.trim_start_matches('/'))
        }
    }
}

impl FragmentSource for HttpFragmentSource {
    fn fetch(&self, locator: &str) -> BoxFuture<'static, Result<String, FetchError>> {
        let client = self.client.clone();
        let retry = self.retry.clone();
        let url = self.url_for(locator);
        let locator = locator.to_string();

        async move {
            with_retry_if(
                &retry,
                &format!("Fetch {}", locator),
                || get_text(&client, &url, &locator),
                FetchError::is_retryable,
            )
            .await
        }
        .boxed()
    }
}

async fn get_text(client: &reqwest::Client, url: &str, locator: &str) -> Result<String, FetchError> {
    debug!("GET {}", url);
    let network = |e: reqwest::Error| FetchError::Network {
        locator: locator.to_string(),
        message: e.to_string(),
    };

    let response = client.get(url).send().await.map_err(network)?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            locator: locator.to_string(),
            status: response.status().as_u16(),
        });
    }

    response.text().await.map_err(network)
}
