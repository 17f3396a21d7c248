//! Upstream catalog shapes and the flat contract served to the storefront.
//!
//! The supplier is inconsistent about field casing, so upstream structs accept
//! the known aliases and treat every field as optional.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProxyError;

pub const DEFAULT_PRODUCT_NAME: &str = "Unnamed product";
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

static WRAPPER_FIELDS: [&str; 4] = ["categories", "Categories", "items", "Items"];
static NODE_FIELDS: [&str; 8] = [
    "name", "Name", "title", "Title", "positions", "Positions", "products", "Products",
];

/// Category of the upstream tree
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogNode {
    #[serde(default, alias = "Id", alias = "categoryId", alias = "CategoryId")]
    pub id: Option<Value>,
    #[serde(default, alias = "Name", alias = "title", alias = "Title")]
    pub name: Option<String>,
    #[serde(default, alias = "Positions", alias = "products", alias = "Products")]
    pub positions: Option<Vec<ProductPosition>>,
    #[serde(
        default,
        alias = "Children",
        alias = "categories",
        alias = "Categories",
        alias = "subCategories",
        alias = "SubCategories"
    )]
    pub children: Option<Vec<CatalogNode>>,
}

impl CatalogNode {
    pub fn positions(&self) -> &[ProductPosition] {
        self.positions.as_deref().unwrap_or_default()
    }

    pub fn children(&self) -> &[CatalogNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Name if present and not blank
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

/// Product entry inside a category
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPosition {
    #[serde(default, alias = "Articul", alias = "sku", alias = "SKU")]
    pub articul: Option<Value>,
    #[serde(default, alias = "Name", alias = "title", alias = "Title")]
    pub name: Option<String>,
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
}

/// Flat product served by `GET /api/products`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub articul: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    pub in_stock: bool,
    pub vendor: Option<String>,
    pub image: Option<String>,
}

/// Category entry served by `GET /api/categories`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: Option<String>,
    pub name: String,
    pub path: String,
    pub depth: usize,
    pub product_count: usize,
}

/// Read the category tree out of a `Catalog/Get` response.
///
/// Accepts a bare array of nodes, an object wrapping that array, or a single
/// node. `null` is an empty catalog.
pub fn parse_tree(value: Value) -> Result<Vec<CatalogNode>, ProxyError> {
    let nodes = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(_) => value,
        Value::Object(map) => {
            let is_node = NODE_FIELDS.iter().any(|f| map.contains_key(*f));
            let wrapped = if is_node {
                None
            } else {
                WRAPPER_FIELDS
                    .iter()
                    .find_map(|f| map.get(*f).filter(|v| v.is_array()).cloned())
            };
            wrapped.unwrap_or_else(|| Value::Array(vec![Value::Object(map)]))
        }
        other => {
            return Err(ProxyError::Decode(format!(
                "catalog response is neither a list nor an object: {}",
                other
            )))
        }
    };

    serde_json::from_value(nodes)
        .map_err(|e| ProxyError::Decode(format!("unexpected catalog shape: {}", e)))
}

/// Identifier rendered as text, numbers included
pub fn value_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Prices arrive as numbers or strings with either decimal separator
pub fn value_to_price(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().replace(',', ".").parse().unwrap_or_default(),
        _ => 0.0,
    }
}

/// Stock is never negative
pub fn value_to_stock(value: Option<&Value>) -> i64 {
    let stock = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(|f| f as i64)
            .unwrap_or_default(),
        _ => 0,
    };
    stock.max(0)
}

/// Trimmed text or `None` when blank
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
