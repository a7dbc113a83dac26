pub mod pool;
pub mod http;

pub use pool::ClientPool;
pub use http::HttpClient;

use async_trait::async_trait;
use crate::error::Result;

/// A fetched response body together with the URL it was requested from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub body: Vec<u8>,
}

impl FetchedPage {
    pub fn new(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Issues GET requests on behalf of the pipeline.
///
/// Retries, politeness and rate limiting are the implementor's concern; an
/// `Err` means the fetch is given up on.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}
