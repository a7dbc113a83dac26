use serde_json::Value;
use crate::models::{Assets, Metadata, OutputRecord, ProductDetail, Stock};

const VOLUME_FILTER: &str = "obem";
const COLOUR_FILTER: &str = "cvet";
const BRAND_BLOCK: &str = "brend";
const PRODUCT_MARKER: &str = "/product";

/// Turns a product detail object into an [`OutputRecord`].
///
/// Pure: the caller supplies the request URL and the timestamp. Missing,
/// null or oddly typed fields degrade to `None`, empty lists or `false`.
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    product_page_url: String,
}

impl ProductExtractor {
    pub fn new(product_page_url: impl Into<String>) -> Self {
        let mut product_page_url = product_page_url.into();
        if !product_page_url.ends_with('/') {
            product_page_url.push('/');
        }
        Self { product_page_url }
    }

    pub fn extract(&self, detail: ProductDetail, request_url: &str, timestamp: i64) -> OutputRecord {
        let url = self.product_url(detail.category_slug(), request_url);
        let title = build_title(detail.name(), detail.filter_labels());
        let brand = resolve_brand(detail.description_blocks.as_ref());
        let section = section(&detail);
        let marketing_tags = marketing_tags(detail.price_details());
        let stock = stock(detail.quantity_total);

        OutputRecord {
            timestamp,
            rpc_id: detail.uuid.clone(),
            url,
            title,
            marketing_tags,
            brand,
            section,
            price_data: detail.price_details,
            stock,
            assets: Assets {
                main_image: detail.image_url,
            },
            metadata: Metadata {
                uuid: detail.uuid,
                vendor_code: detail.vendor_code,
                country_code: detail.country_code,
                country_name: detail.country_name,
                description_blocks: detail.description_blocks,
            },
        }
    }

    fn product_url(&self, category_slug: Option<&str>, request_url: &str) -> String {
        let product_slug = product_slug(request_url);
        match category_slug.filter(|slug| !slug.is_empty()) {
            Some(category_slug) => format!("{}{}/{}", self.product_page_url, category_slug, product_slug),
            None => format!("{}{}", self.product_page_url, product_slug),
        }
    }
}

/// Appends the volume and colour labels to `name` unless the name already
/// mentions them.
pub fn build_title(name: &str, labels: &[Value]) -> String {
    let name_lower = name.to_lowercase();
    let extra_parts: Vec<&str> = [VOLUME_FILTER, COLOUR_FILTER]
        .into_iter()
        .filter_map(|filter| label_suffix(labels, filter, &name_lower))
        .collect();

    if extra_parts.is_empty() {
        name.to_string()
    } else {
        format!("{}, {}", name, extra_parts.join(", "))
    }
}

/// Title of the first label for `filter`. Only that first label is considered,
/// and it is dropped when empty, not a string, or already contained in the name.
fn label_suffix<'a>(labels: &'a [Value], filter: &str, name_lower: &str) -> Option<&'a str> {
    let label = labels
        .iter()
        .find(|label| label.get("filter").and_then(Value::as_str) == Some(filter))?;

    label
        .get("title")
        .and_then(Value::as_str)
        .filter(|title| !title.is_empty() && !name_lower.contains(&title.to_lowercase()))
}

/// Name of the first value in the first `brend` description block.
pub fn resolve_brand(description_blocks: Option<&Value>) -> Option<String> {
    let block = description_blocks?
        .as_array()?
        .iter()
        .find(|block| block.get("code").and_then(Value::as_str) == Some(BRAND_BLOCK))?;

    block
        .get("values")?
        .as_array()?
        .first()?
        .get("name")?
        .as_str()
        .map(str::to_string)
}

fn section(detail: &ProductDetail) -> Vec<Value> {
    let name = detail.category_name();
    match detail.parent_category() {
        Some(parent) => vec![name, parent.get("name").cloned().unwrap_or(Value::Null)],
        None => vec![name],
    }
}

fn marketing_tags(price_details: &[Value]) -> Vec<String> {
    price_details
        .iter()
        .filter_map(|item| item.get("title").and_then(Value::as_str))
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect()
}

fn stock(quantity_total: Option<Value>) -> Stock {
    let in_stock = quantity_total
        .as_ref()
        .and_then(Value::as_f64)
        .is_some_and(|quantity| quantity > 0.0);

    Stock {
        in_stock,
        count: quantity_total,
    }
}

/// Path of a detail URL after its `/product` segment, without query or
/// fragment. Falls back to the last path segment.
fn product_slug(request_url: &str) -> &str {
    let without_query = request_url.split(['?', '#']).next().unwrap_or(request_url);
    let suffix = match without_query.split_once(PRODUCT_MARKER) {
        Some((_, rest)) => rest,
        None => without_query.rsplit('/').next().unwrap_or(without_query),
    };
    suffix.trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const REQUEST_URL: &str =
        "https://alkoteka.com/web-api/v1/product/vino-krasnoe-0-75?city_uuid=4a70f9e0-46ae-11e7-83ff-00155d026416";

    fn extractor() -> ProductExtractor {
        ProductExtractor::new("https://alkoteka.com/product/")
    }

    fn detail(value: Value) -> ProductDetail {
        serde_json::from_value(value).unwrap()
    }

    fn labels(value: Value) -> Vec<Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn title_appends_volume_and_colour() {
        let labels = labels(json!([
            {"filter": "obem", "title": "0.75 л"},
            {"filter": "cvet", "title": "Красное"}
        ]));
        assert_eq!(build_title("Вино", &labels), "Вино, 0.75 л, Красное");
    }

    #[test]
    fn title_skips_label_already_in_name() {
        let labels = labels(json!([{"filter": "obem", "title": "0.75 л"}]));
        assert_eq!(build_title("Вино 0.75 л", &labels), "Вино 0.75 л");
    }

    #[test]
    fn title_match_ignores_case() {
        let labels = labels(json!([{"filter": "cvet", "title": "КРАСНОЕ"}]));
        assert_eq!(build_title("Вино красное сухое", &labels), "Вино красное сухое");
    }

    #[test]
    fn title_uses_only_first_label_per_filter() {
        // first obem label is empty, so nothing is appended even though a second exists
        let labels = labels(json!([
            {"filter": "obem", "title": ""},
            {"filter": "obem", "title": "1 л"},
            {"filter": "cvet", "title": "Белое"},
            {"filter": "cvet", "title": "Розовое"}
        ]));
        assert_eq!(build_title("Вино", &labels), "Вино, Белое");
    }

    #[test]
    fn title_keeps_volume_before_colour_regardless_of_label_order() {
        let labels = labels(json!([
            {"filter": "cvet", "title": "Красное"},
            {"filter": "obem", "title": "0.75 л"}
        ]));
        assert_eq!(build_title("Вино", &labels), "Вино, 0.75 л, Красное");
    }

    #[test]
    fn brand_comes_from_brend_block() {
        let blocks = json!([
            {"code": "strana", "values": [{"name": "Швеция"}]},
            {"code": "brend", "values": [{"name": "Absolut"}, {"name": "Other"}]}
        ]);
        assert_eq!(resolve_brand(Some(&blocks)).as_deref(), Some("Absolut"));
    }

    #[test]
    fn brand_is_none_without_matching_block() {
        let blocks = json!([{"code": "strana", "values": [{"name": "Швеция"}]}]);
        assert_eq!(resolve_brand(Some(&blocks)), None);
        assert_eq!(resolve_brand(None), None);
    }

    #[test]
    fn brand_is_none_when_first_brend_block_has_no_values() {
        let blocks = json!([
            {"code": "brend", "values": []},
            {"code": "brend", "values": [{"name": "Late"}]}
        ]);
        assert_eq!(resolve_brand(Some(&blocks)), None);
    }

    #[test]
    fn stock_reflects_quantity() {
        let empty = extractor().extract(detail(json!({"quantity_total": 0})), REQUEST_URL, 0);
        assert!(!empty.stock.in_stock);
        assert_eq!(empty.stock.count, Some(json!(0)));

        let stocked = extractor().extract(detail(json!({"quantity_total": 12})), REQUEST_URL, 0);
        assert!(stocked.stock.in_stock);
        assert_eq!(stocked.stock.count, Some(json!(12)));
    }

    #[test]
    fn section_includes_parent_when_present() {
        let with_parent = extractor().extract(
            detail(json!({"category": {"name": "Вино", "parent": {"name": "Алкоголь"}}})),
            REQUEST_URL,
            0,
        );
        assert_eq!(
            with_parent.section,
            vec![json!("Вино"), json!("Алкоголь")]
        );

        let without_parent = extractor().extract(
            detail(json!({"category": {"name": "Вино", "parent": null}})),
            REQUEST_URL,
            0,
        );
        assert_eq!(without_parent.section, vec![json!("Вино")]);

        let empty_parent = extractor().extract(
            detail(json!({"category": {"name": "Вино", "parent": {}}})),
            REQUEST_URL,
            0,
        );
        assert_eq!(empty_parent.section, vec![json!("Вино")]);
    }

    #[test]
    fn url_points_at_public_product_page() {
        let record = extractor().extract(
            detail(json!({"category": {"slug": "vino"}})),
            REQUEST_URL,
            0,
        );
        assert_eq!(record.url, "https://alkoteka.com/product/vino/vino-krasnoe-0-75");
    }

    #[test]
    fn url_without_category_slug_uses_product_slug_only() {
        let record = extractor().extract(detail(json!({})), REQUEST_URL, 0);
        assert_eq!(record.url, "https://alkoteka.com/product/vino-krasnoe-0-75");
    }

    #[test]
    fn marketing_tags_skip_missing_and_empty_titles() {
        let record = extractor().extract(
            detail(json!({"price_details": [
                {"title": "Скидка", "prc": 10},
                {"title": ""},
                {"title": null},
                {"prc": 5}
            ]})),
            REQUEST_URL,
            0,
        );
        assert_eq!(record.marketing_tags, vec!["Скидка".to_string()]);
        assert_eq!(record.price_data.as_array().map(Vec::len), Some(4));
        assert_eq!(record.price_data[0], json!({"title": "Скидка", "prc": 10}));
    }

    #[test]
    fn full_record_maps_every_field() {
        let blocks = json!([{"code": "brend", "values": [{"name": "Absolut", "slug": "absolut"}]}]);
        let record = extractor().extract(
            detail(json!({
                "uuid": "c1f2",
                "name": "Водка Absolut",
                "category": {"name": "Водка", "slug": "vodka", "parent": {"name": "Крепкие"}},
                "filter_labels": [{"filter": "obem", "title": "0.5 л"}],
                "description_blocks": blocks.clone(),
                "price_details": [{"title": "Хит"}],
                "quantity_total": 3,
                "image_url": "https://alkoteka.com/img/1.png",
                "vendor_code": 10245,
                "country_code": "SE",
                "country_name": "Швеция"
            })),
            REQUEST_URL,
            1_700_000_000,
        );

        assert_eq!(record.timestamp, 1_700_000_000);
        assert_eq!(record.rpc_id, Some(json!("c1f2")));
        assert_eq!(record.url, "https://alkoteka.com/product/vodka/vino-krasnoe-0-75");
        assert_eq!(record.title, "Водка Absolut, 0.5 л");
        assert_eq!(record.brand.as_deref(), Some("Absolut"));
        assert_eq!(record.marketing_tags, vec!["Хит".to_string()]);
        assert_eq!(record.assets.main_image, Some(json!("https://alkoteka.com/img/1.png")));
        assert_eq!(record.metadata.uuid, Some(json!("c1f2")));
        assert_eq!(record.metadata.vendor_code, Some(json!(10245)));
        assert_eq!(record.metadata.country_code, Some(json!("SE")));
        assert_eq!(record.metadata.country_name, Some(json!("Швеция")));
        assert_eq!(record.metadata.description_blocks, Some(blocks));
    }

    #[test]
    fn partial_objects_never_fail() {
        let partials = [
            json!({}),
            json!({"name": null, "uuid": null}),
            json!({"category": null}),
            json!({"category": {}}),
            json!({"category": {"parent": null, "slug": null}}),
            json!({"category": {"parent": {"slug": "x"}}}),
            json!({"filter_labels": null}),
            json!({"filter_labels": [{}]}),
            json!({"filter_labels": [{"filter": "obem", "title": null}]}),
            json!({"description_blocks": "not a list"}),
            json!({"description_blocks": [{"code": "brend"}]}),
            json!({"description_blocks": [{"code": "brend", "values": [{}]}]}),
            json!({"price_details": null}),
            json!({"price_details": [1, "two", null]}),
            json!({"quantity_total": null}),
            json!({"quantity_total": 2.5}),
            json!({"quantity_total": -1}),
        ];

        for partial in partials {
            let record = extractor().extract(detail(partial.clone()), REQUEST_URL, 0);
            assert!(!record.section.is_empty(), "no section for {partial}");
            assert!(record.url.starts_with("https://alkoteka.com/product/"), "bad url for {partial}");
        }
    }

    #[test]
    fn empty_object_degrades_to_defaults() {
        let record = extractor().extract(ProductDetail::default(), REQUEST_URL, 5);
        assert_eq!(record.title, "");
        assert_eq!(record.rpc_id, None);
        assert_eq!(record.brand, None);
        assert_eq!(record.section, vec![Value::Null]);
        assert!(record.marketing_tags.is_empty());
        assert_eq!(record.price_data, json!([]));
        assert!(!record.stock.in_stock);
        assert_eq!(record.stock.count, None);
    }

    #[test]
    fn explicit_null_price_details_pass_through() {
        let record = extractor().extract(detail(json!({"price_details": null})), REQUEST_URL, 0);
        assert_eq!(record.price_data, Value::Null);
        assert!(record.marketing_tags.is_empty());

        let missing = extractor().extract(detail(json!({})), REQUEST_URL, 0);
        assert_eq!(missing.price_data, json!([]));
    }

    #[test]
    fn mistyped_fields_are_passed_through_or_ignored() {
        let record = extractor().extract(
            detail(json!({
                "uuid": 991,
                "name": "Вино",
                "category": {"name": 7, "slug": 3, "parent": "Алкоголь"},
                "filter_labels": [null, 5, {"filter": "obem", "title": 0.75}, {"filter": "cvet", "title": "Белое"}],
                "price_details": {"title": "not a list"},
                "quantity_total": "5",
                "image_url": false,
                "country_code": 643,
                "country_name": ["Россия"]
            })),
            REQUEST_URL,
            0,
        );

        assert_eq!(record.rpc_id, Some(json!(991)));
        // first obem label has a numeric title, so only the colour is appended
        assert_eq!(record.title, "Вино, Белое");
        assert_eq!(record.section, vec![json!(7)]);
        assert_eq!(record.url, "https://alkoteka.com/product/vino-krasnoe-0-75");
        assert_eq!(record.price_data, json!({"title": "not a list"}));
        assert!(record.marketing_tags.is_empty());
        assert!(!record.stock.in_stock);
        assert_eq!(record.stock.count, Some(json!("5")));
        assert_eq!(record.assets.main_image, Some(json!(false)));
        assert_eq!(record.metadata.country_code, Some(json!(643)));
        assert_eq!(record.metadata.country_name, Some(json!(["Россия"])));
    }

    #[test]
    fn product_slug_strips_query_and_marker() {
        assert_eq!(product_slug(REQUEST_URL), "vino-krasnoe-0-75");
        assert_eq!(product_slug("http://127.0.0.1:8080/web-api/v1/product/abc#frag"), "abc");
        assert_eq!(product_slug("https://example.com/items/abc?x=1"), "abc");
    }
}
