//! Stream descriptor fetching.

use tracing::{debug, instrument};

use crate::error::ResolverError;
use crate::{ResolverResult, RESOLVER_BASE_URL};

/// Fetches raw descriptor documents from the resolution endpoint.
///
/// Every fetch opens and releases its own HTTP session; nothing is cached
/// between calls. Retry policy, if any, belongs to the caller.
#[derive(Debug, Clone)]
pub struct DescriptorFetcher {
    base_url: String,
}

impl DescriptorFetcher {
    /// Create a fetcher against the platform resolution endpoint.
    pub fn new() -> Self {
        Self::with_base_url(RESOLVER_BASE_URL)
    }

    /// Create a fetcher against an alternate endpoint base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// The URL queried for a channel.
    pub fn url_for(&self, channel: &str) -> String {
        format!("{}/find/{}.xml?type=any", self.base_url, channel)
    }

    /// Fetch the raw descriptor document for a channel.
    ///
    /// A single blocking GET; any 2xx status yields the full response body,
    /// any other status fails with `HttpStatus`, and connection failures
    /// fail with `Transport`.
    #[instrument(name = "fetch_descriptor", skip(self))]
    pub fn fetch(&self, channel: &str) -> ResolverResult<Vec<u8>> {
        let url = self.url_for(channel);
        debug!(url = %url, "Fetching stream descriptor");

        let client = reqwest::blocking::Client::builder().build()?;
        let response = client.get(&url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolverError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes()?;
        debug!(len = body.len(), "Fetched stream descriptor");

        Ok(body.to_vec())
    }
}

impl Default for DescriptorFetcher {
    fn default() -> Self {
        Self::new()
    }
}
