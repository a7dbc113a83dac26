pub mod catalog;
pub mod pipeline;
pub mod product;

pub use catalog::CatalogLister;
pub use pipeline::{Pipeline, RunSummary};
pub use product::ProductService;
