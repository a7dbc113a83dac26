pub mod json;

pub use json::{JsonWriter, RecordSink};
