use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::models::{
    non_blank, value_to_price, value_to_stock, value_to_string, DEFAULT_PRODUCT_NAME,
};
use crate::error::ProxyError;

/// `Catalog/GetProduct` record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRecord {
    #[serde(default, alias = "Articul", alias = "sku", alias = "SKU")]
    pub articul: Option<Value>,
    #[serde(default, alias = "Name", alias = "title", alias = "Title")]
    pub name: Option<String>,
    #[serde(default, alias = "Description")]
    pub description: Option<String>,
    #[serde(default, alias = "Price")]
    pub price: Option<Value>,
    #[serde(
        default,
        alias = "Quantity",
        alias = "stock",
        alias = "Stock",
        alias = "amount",
        alias = "Amount"
    )]
    pub quantity: Option<Value>,
    #[serde(default, alias = "Vendor", alias = "brand", alias = "Brand")]
    pub vendor: Option<String>,
    #[serde(default, alias = "Photo", alias = "image", alias = "Image", alias = "picture")]
    pub photo: Option<String>,
    #[serde(default, alias = "Photos", alias = "images", alias = "Images")]
    pub photos: Option<Vec<Value>>,
    #[serde(
        default,
        alias = "Specs",
        alias = "properties",
        alias = "Properties",
        alias = "characteristics",
        alias = "Characteristics"
    )]
    pub specs: Option<Vec<SpecRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecRecord {
    #[serde(default, alias = "Name", alias = "title", alias = "Title")]
    pub name: Option<String>,
    #[serde(default, alias = "Value")]
    pub value: Option<Value>,
}

/// Product card served by `GET /api/products/{articul}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub articul: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub in_stock: bool,
    pub vendor: Option<String>,
    pub photos: Vec<String>,
    pub specs: Vec<Spec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spec {
    pub name: String,
    pub value: String,
}

static PHOTO_URL_FIELDS: [&str; 4] = ["url", "Url", "URL", "link"];

/// Shape a `GetProduct` response, or `NotFound` when it carries no record.
pub fn product_detail(value: Value, requested: &str) -> Result<ProductDetail, ProxyError> {
    let not_found = || ProxyError::NotFound(format!("product '{}'", requested));

    let record = match value {
        Value::Array(items) => match items.into_iter().next() {
            Some(first @ Value::Object(_)) => first,
            _ => return Err(not_found()),
        },
        Value::Object(ref map) if map.is_empty() => return Err(not_found()),
        Value::Object(_) => value,
        _ => return Err(not_found()),
    };

    let record: ProductRecord = serde_json::from_value(record)
        .map_err(|e| ProxyError::Decode(format!("unexpected product shape: {}", e)))?;
    if record.articul.is_none() && record.name.is_none() {
        return Err(not_found());
    }

    let stock = value_to_stock(record.quantity.as_ref());
    Ok(ProductDetail {
        articul: value_to_string(record.articul.as_ref()).unwrap_or_else(|| requested.to_owned()),
        name: non_blank(record.name.as_deref()).unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_owned()),
        description: non_blank(record.description.as_deref()).unwrap_or_default(),
        price: value_to_price(record.price.as_ref()),
        stock,
        in_stock: stock > 0,
        vendor: non_blank(record.vendor.as_deref()),
        photos: photos(&record),
        specs: specs(&record),
    })
}

/// Main photo first, then the gallery without duplicates
fn photos(record: &ProductRecord) -> Vec<String> {
    let gallery = record
        .photos
        .iter()
        .flatten()
        .filter_map(|photo| match photo {
            Value::String(url) => non_blank(Some(url.as_str())),
            Value::Object(map) => PHOTO_URL_FIELDS
                .iter()
                .find_map(|f| map.get(*f).and_then(Value::as_str))
                .and_then(|url| non_blank(Some(url))),
            _ => None,
        });

    let mut out: Vec<String> = Vec::new();
    for url in non_blank(record.photo.as_deref()).into_iter().chain(gallery) {
        if !out.contains(&url) {
            out.push(url);
        }
    }
    out
}

fn specs(record: &ProductRecord) -> Vec<Spec> {
    record
        .specs
        .iter()
        .flatten()
        .filter_map(|spec| {
            let name = non_blank(spec.name.as_deref())?;
            let value = match spec.value.as_ref()? {
                Value::String(s) => s.trim().to_owned(),
                Value::Null => return None,
                other => other.to_string(),
            };
            Some(Spec { name, value })
        })
        .collect()
}
