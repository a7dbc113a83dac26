use rquest::Url;
use tracing::{info, warn};
use crate::clients::FetchedPage;
use crate::config::ApiConfig;
use crate::error::{Error, ExtractError, Result};
use crate::models::{entry_slug, ListingPage};

/// Builds the listing request and turns its response into detail URLs.
///
/// Only one page is requested. `per_page` is large enough to cover the
/// catalog in practice; a full page is logged as possible truncation.
#[derive(Debug, Clone)]
pub struct CatalogLister {
    base_url: Url,
    city_uuid: String,
    page: u32,
    per_page: u32,
}

impl CatalogLister {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&api.listing_url).map_err(|e| Error::InvalidUrl {
            url: api.listing_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            base_url,
            city_uuid: api.city_uuid.clone(),
            page: api.page,
            per_page: api.per_page,
        })
    }

    pub fn listing_url(&self) -> String {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("city_uuid", &self.city_uuid)
            .append_pair("page", &self.page.to_string())
            .append_pair("per_page", &self.per_page.to_string());
        url.to_string()
    }

    /// Resolves `slug` against the listing URL and adds `city_uuid`.
    pub fn detail_url(&self, slug: &str) -> Result<String> {
        let mut url = self.base_url.join(slug).map_err(|e| Error::InvalidUrl {
            url: slug.to_string(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut().append_pair("city_uuid", &self.city_uuid);
        Ok(url.to_string())
    }

    pub fn detail_urls(&self, listing: &FetchedPage) -> std::result::Result<Vec<String>, ExtractError> {
        let page: ListingPage = serde_json::from_slice(&listing.body).map_err(|source| {
            ExtractError::ListingDecode {
                body: listing.body_text(),
                source,
            }
        })?;

        let entries = page.results.unwrap_or_default();
        if entries.len() >= self.per_page as usize {
            warn!(
                entries = entries.len(),
                per_page = self.per_page,
                "Listing page is full, catalog may be truncated"
            );
        }

        let urls: Vec<String> = entries
            .iter()
            .filter_map(|entry| {
                let Some(slug) = entry_slug(entry) else {
                    warn!(url = %listing.url, entry = %entry, "Listing entry without slug, skipping");
                    return None;
                };

                match self.detail_url(slug) {
                    Ok(url) => Some(url),
                    Err(e) => {
                        warn!(error = %e, slug = slug, "Can't build detail URL, skipping");
                        None
                    }
                }
            })
            .collect();

        info!(
            entries = entries.len(),
            urls = urls.len(),
            "Parsed product listing"
        );

        Ok(urls)
    }
}
