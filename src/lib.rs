pub mod clients;
pub mod config;
pub mod error;
pub mod extractors;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use clients::{ClientPool, FetchedPage, Fetcher, HttpClient};
pub use config::Settings;
pub use error::{Error, ExtractError, Result};
pub use extractors::ProductExtractor;
pub use models::{OutputRecord, ProductDetail};
pub use services::{CatalogLister, Pipeline, ProductService, RunSummary};
pub use storage::{JsonWriter, RecordSink};
