//! Remote fetcher
//!
//! A thin wrapper around a reqwest client that performs a single GET per
//! call and hands back the final URL and body bytes. Non-success statuses
//! are turned into [`FetchError::Status`] so callers can decide whether to
//! surface or skip them.

mod error;

pub use error::FetchError;

use reqwest::Client as ReqwestClient;
use tracing::{debug, instrument};
use url::Url;

/// A successfully fetched remote resource
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// Final URL after redirects
    pub url: Url,

    /// Raw body bytes
    pub body: Vec<u8>,
}

/// HTTP fetcher for pages and images
#[derive(Clone)]
pub struct Fetcher {
    client: ReqwestClient,
}

impl Fetcher {
    /// Create a new fetcher sending the given user agent
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = ReqwestClient::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    /// Perform a GET request, failing on transport errors and non-success statuses
    #[instrument(skip(self), fields(url = %url), level = "debug")]
    pub async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError> {
        debug!("Sending GET request");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Remote returned non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response.bytes().await?.to_vec();
        debug!(bytes = body.len(), "Fetched resource");

        Ok(FetchedResource {
            url: final_url,
            body,
        })
    }
}
