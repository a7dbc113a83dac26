mod listing;
mod product;
mod record;

pub use listing::{entry_slug, ListingPage};
pub use product::ProductDetail;
pub use record::{Assets, Metadata, OutputRecord, Stock};
