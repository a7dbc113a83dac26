use async_trait::async_trait;
use rquest_util::Emulation;
use crate::clients::http::HttpClient;
use crate::clients::{FetchedPage, Fetcher};
use crate::config::Settings;
use crate::error::Result;
use crate::utils::retry_with_backoff;
use tracing::debug;

/// Round-robin over clients with different browser fingerprints. Every
/// attempt, retries included, goes out through the next client.
pub struct ClientPool {
    clients: Vec<HttpClient>,
    current: std::sync::atomic::AtomicUsize,
    max_retries: u32,
    base_delay_ms: u64,
}

impl ClientPool {
    pub fn new(settings: &Settings) -> Result<Self> {
        let emulations = vec![
            Emulation::Firefox136,
            Emulation::Chrome133,
            Emulation::Safari18_3,
            Emulation::Edge134,
        ];

        debug!("Creating client pool with {} emulations", emulations.len());

        let clients = emulations.into_iter()
            .map(|emulation| HttpClient::new(settings, emulation))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            clients,
            current: std::sync::atomic::AtomicUsize::new(0),
            max_retries: settings.http.max_retries,
            base_delay_ms: settings.http.base_delay_ms,
        })
    }

    pub fn next_client(&self) -> &HttpClient {
        let current = self.current.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        &self.clients[current % self.clients.len()]
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[async_trait]
impl Fetcher for ClientPool {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        retry_with_backoff(self.max_retries, self.base_delay_ms, || async move {
            self.next_client().get(url).await
        }).await
    }
}
