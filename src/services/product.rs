use serde_json::Value;
use crate::clients::FetchedPage;
use crate::config::ApiConfig;
use crate::error::ExtractError;
use crate::extractors::ProductExtractor;
use crate::models::{OutputRecord, ProductDetail};

/// Decodes detail responses and hands their `results` to the extractor.
#[derive(Debug, Clone)]
pub struct ProductService {
    extractor: ProductExtractor,
}

impl ProductService {
    pub fn new(api: &ApiConfig) -> Self {
        Self {
            extractor: ProductExtractor::new(api.product_page_url.as_str()),
        }
    }

    pub fn process(&self, page: &FetchedPage, timestamp: i64) -> Result<OutputRecord, ExtractError> {
        let decode_error = |source| ExtractError::DetailDecode {
            url: page.url.clone(),
            body: page.body_text(),
            source,
        };

        let mut body: Value = serde_json::from_slice(&page.body).map_err(decode_error)?;

        if body.get("success").and_then(Value::as_bool) != Some(true) {
            return Err(ExtractError::UnsuccessfulResponse {
                url: page.url.clone(),
            });
        }

        let results = body.get_mut("results").map(Value::take).unwrap_or(Value::Null);
        if is_empty(&results) {
            return Err(ExtractError::EmptyResult {
                url: page.url.clone(),
            });
        }

        let detail: ProductDetail = serde_json::from_value(results).map_err(decode_error)?;

        Ok(self.extractor.extract(detail, &page.url, timestamp))
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(_) => false,
    }
}
