use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] rquest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Forbidden - Access denied")]
    Forbidden,

    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// A response that was fetched but yields no record.
///
/// None of these end a run: the pipeline logs them, counts them and moves on
/// to the next product.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("can't parse listing json: {source}")]
    ListingDecode {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("can't parse detail json from {url}: {source}")]
    DetailDecode {
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("product response not successful: {url}")]
    UnsuccessfulResponse { url: String },

    #[error("empty product data: {url}")]
    EmptyResult { url: String },
}
