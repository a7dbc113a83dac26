use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub timestamp: i64,
    pub rpc_id: Option<Value>,
    pub url: String,
    pub title: String,
    pub marketing_tags: Vec<String>,
    pub brand: Option<String>,
    pub section: Vec<Value>,
    pub price_data: Value,
    pub stock: Stock,
    pub assets: Assets,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub in_stock: bool,
    pub count: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assets {
    pub main_image: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub uuid: Option<Value>,
    pub vendor_code: Option<Value>,
    pub country_code: Option<Value>,
    pub country_name: Option<Value>,
    pub description_blocks: Option<Value>,
}
