use serde::Serialize;

use crate::error::ProxyError;
use crate::upstream::request::UpstreamRequest;
use crate::utils::constants::{CATALOG_GET_PATH, CATALOG_PRODUCT_PATH};

/// Body of `POST /Catalog/Get`. The upstream expects every field present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub category_id: Option<i64>,
    #[serde(rename = "vendorid")]
    pub vendor_id: i64,
    pub keyword: String,
    pub search_in_name: bool,
    pub search_in_articul: bool,
    pub only_available: bool,
}

impl CatalogQuery {
    pub fn new(vendor_id: i64) -> Self {
        Self {
            category_id: None,
            vendor_id,
            keyword: String::new(),
            search_in_name: true,
            search_in_articul: true,
            only_available: false,
        }
    }

    pub fn category(mut self, category_id: Option<i64>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn keyword(mut self, keyword: Option<&str>) -> Self {
        self.keyword = keyword.map(str::trim).unwrap_or_default().to_owned();
        self
    }

    pub fn only_available(mut self, only_available: bool) -> Self {
        self.only_available = only_available;
        self
    }

    pub fn to_request(&self) -> Result<UpstreamRequest, ProxyError> {
        let body = serde_json::to_value(self)
            .map_err(|e| ProxyError::Decode(format!("catalog query: {}", e)))?;
        Ok(UpstreamRequest::post(CATALOG_GET_PATH).with_body(body))
    }
}

/// `GET /Catalog/GetProduct?articul=<id>`
pub fn product_request(articul: &str) -> UpstreamRequest {
    UpstreamRequest::get(CATALOG_PRODUCT_PATH).with_query("articul", articul)
}
