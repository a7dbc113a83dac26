use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use tracing::debug;

pub const DEFAULT_LISTING_URL: &str = "https://alkoteka.com/web-api/v1/product/";
pub const DEFAULT_PRODUCT_PAGE_URL: &str = "https://alkoteka.com/product/";
pub const DEFAULT_CITY_UUID: &str = "4a70f9e0-46ae-11e7-83ff-00155d026416";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api: ApiConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Listing endpoint; detail URLs are resolved relative to it.
    pub listing_url: String,
    /// Public storefront base used for the `url` field of emitted records.
    pub product_page_url: String,
    pub city_uuid: String,
    pub page: u32,
    pub per_page: u32,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    /// Pause between detail requests, plus up to `request_jitter_ms` extra.
    pub request_delay_ms: u64,
    pub request_jitter_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                listing_url: DEFAULT_LISTING_URL.to_string(),
                product_page_url: DEFAULT_PRODUCT_PAGE_URL.to_string(),
                city_uuid: DEFAULT_CITY_UUID.to_string(),
                page: 1,
                per_page: 5000,
                headers: HashMap::new(),
            },
            http: HttpConfig {
                timeout_secs: 30,
                max_retries: 3,
                base_delay_ms: 1000,
                request_delay_ms: 250,
                request_jitter_ms: 250,
            },
            output: OutputConfig {
                dir: "data".to_string(),
            },
        }
    }
}

impl Settings {
    /// Defaults, then `config/default.yaml` if present, then `APP__*` env vars.
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"));

        Self::build(builder)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?.add_source(File::from(path.as_ref()));
        Self::build(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder().add_source(Config::try_from(&Settings::default())?))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;

        debug!(
            listing_url = %settings.api.listing_url,
            city_uuid = %settings.api.city_uuid,
            headers = ?settings.api.headers,
            "Loaded settings"
        );

        Ok(settings)
    }
}
