use serde::Deserialize;
use serde_json::Value;

/// Entries stay raw so that one malformed entry only drops itself.
#[derive(Debug, Default, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub results: Option<Vec<Value>>,
}

/// Non-empty string `slug` of a listing entry, if it has one.
pub fn entry_slug(entry: &Value) -> Option<&str> {
    entry
        .get("slug")
        .and_then(Value::as_str)
        .filter(|slug| !slug.is_empty())
}
