use chrono::Utc;
use tracing::{debug, error, info, warn};
use crate::clients::Fetcher;
use crate::config::Settings;
use crate::error::{ExtractError, Result};
use crate::services::catalog::CatalogLister;
use crate::services::product::ProductService;
use crate::storage::RecordSink;
use crate::utils::time::sleep_with_jitter;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Detail URLs produced by the listing.
    pub listed: usize,
    pub emitted: usize,
    pub listing_decode_errors: usize,
    pub detail_decode_errors: usize,
    pub unsuccessful: usize,
    pub empty: usize,
    pub fetch_failures: usize,
    pub write_failures: usize,
}

impl RunSummary {
    fn record_skip(&mut self, err: &ExtractError) {
        match err {
            ExtractError::ListingDecode { .. } => self.listing_decode_errors += 1,
            ExtractError::DetailDecode { .. } => self.detail_decode_errors += 1,
            ExtractError::UnsuccessfulResponse { .. } => self.unsuccessful += 1,
            ExtractError::EmptyResult { .. } => self.empty += 1,
        }
    }

    /// Products that were listed but produced no record.
    pub fn skipped(&self) -> usize {
        self.detail_decode_errors + self.unsuccessful + self.empty + self.fetch_failures + self.write_failures
    }
}

/// Listing, then one detail request per listed product, then one record per
/// usable detail response.
pub struct Pipeline {
    lister: CatalogLister,
    products: ProductService,
    request_delay_ms: u64,
    request_jitter_ms: u64,
}

impl Pipeline {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            lister: CatalogLister::new(&settings.api)?,
            products: ProductService::new(&settings.api),
            request_delay_ms: settings.http.request_delay_ms,
            request_jitter_ms: settings.http.request_jitter_ms,
        })
    }

    /// Fails only when the listing itself can't be fetched. Problems with a
    /// single product are logged, counted and skipped.
    pub async fn run<F, S>(&self, fetcher: &F, sink: &mut S) -> Result<RunSummary>
    where
        F: Fetcher + ?Sized,
        S: RecordSink + ?Sized,
    {
        let mut summary = RunSummary::default();

        let listing_url = self.lister.listing_url();
        info!(url = %listing_url, "Fetching product listing");
        let listing = fetcher.fetch(&listing_url).await?;

        let urls = match self.lister.detail_urls(&listing) {
            Ok(urls) => urls,
            Err(e) => {
                log_skip(&e);
                summary.record_skip(&e);
                return Ok(summary);
            }
        };
        summary.listed = urls.len();

        for (index, url) in urls.iter().enumerate() {
            if index > 0 {
                sleep_with_jitter(self.request_delay_ms, self.request_jitter_ms).await;
            }

            info!(
                product_index = index + 1,
                products_count = urls.len(),
                url = %url,
                "Processing product"
            );

            let page = match fetcher.fetch(url).await {
                Ok(page) => page,
                Err(e) => {
                    error!(
                        error = %e,
                        url = %url,
                        "Failed to fetch product details"
                    );
                    summary.fetch_failures += 1;
                    continue;
                }
            };

            let record = match self.products.process(&page, Utc::now().timestamp()) {
                Ok(record) => record,
                Err(e) => {
                    log_skip(&e);
                    summary.record_skip(&e);
                    continue;
                }
            };

            match sink.write_record(&record).await {
                Ok(()) => {
                    debug!(url = %record.url, title = %record.title, "Record written");
                    summary.emitted += 1;
                }
                Err(e) => {
                    error!(
                        error = %e,
                        url = %url,
                        "Error writing record"
                    );
                    summary.write_failures += 1;
                }
            }
        }

        Ok(summary)
    }
}

fn log_skip(err: &ExtractError) {
    match err {
        ExtractError::ListingDecode { body, source } => {
            error!(error = %source, body = %body, "Can't parse listing json");
        }
        ExtractError::DetailDecode { url, body, source } => {
            error!(error = %source, url = %url, body = %body, "Can't parse detail json");
        }
        ExtractError::UnsuccessfulResponse { url } => {
            warn!(url = %url, "Product response not successful");
        }
        ExtractError::EmptyResult { url } => {
            warn!(url = %url, "Empty product data");
        }
    }
}
