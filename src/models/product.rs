use serde::Deserialize;
use serde_json::{Map, Value};

/// The `results` object of a product detail response.
///
/// Fields are kept as raw JSON: a value of an unexpected type is passed
/// through or read as absent, never a reason to reject the product.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProductDetail {
    pub uuid: Option<Value>,
    pub name: Option<Value>,
    pub category: Option<Value>,
    pub filter_labels: Option<Value>,
    pub description_blocks: Option<Value>,
    /// `[]` when missing, an explicit `null` is kept.
    pub price_details: Value,
    pub quantity_total: Option<Value>,
    pub image_url: Option<Value>,
    pub vendor_code: Option<Value>,
    pub country_code: Option<Value>,
    pub country_name: Option<Value>,
}

impl Default for ProductDetail {
    fn default() -> Self {
        Self {
            uuid: None,
            name: None,
            category: None,
            filter_labels: None,
            description_blocks: None,
            price_details: Value::Array(Vec::new()),
            quantity_total: None,
            image_url: None,
            vendor_code: None,
            country_code: None,
            country_name: None,
        }
    }
}

impl ProductDetail {
    /// String name, or `""`.
    pub fn name(&self) -> &str {
        self.name.as_ref().and_then(Value::as_str).unwrap_or_default()
    }

    pub fn filter_labels(&self) -> &[Value] {
        self.filter_labels
            .as_ref()
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn price_details(&self) -> &[Value] {
        self.price_details.as_array().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn category_name(&self) -> Value {
        self.category_field("name").cloned().unwrap_or(Value::Null)
    }

    pub fn category_slug(&self) -> Option<&str> {
        self.category_field("slug").and_then(Value::as_str)
    }

    /// Parent category; an empty `{}` counts as none.
    pub fn parent_category(&self) -> Option<&Map<String, Value>> {
        self.category_field("parent")
            .and_then(Value::as_object)
            .filter(|parent| !parent.is_empty())
    }

    fn category_field(&self, key: &str) -> Option<&Value> {
        self.category.as_ref().and_then(|category| category.get(key))
    }
}
