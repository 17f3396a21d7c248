use std::sync::Arc;

use tracing::info;

use crate::catalog::flatten::{flatten_categories, flatten_products};
use crate::catalog::models::{parse_tree, CategorySummary, Product};
use crate::catalog::product::{product_detail, ProductDetail};
use crate::catalog::query::{product_request, CatalogQuery};
use crate::config::upstream::CatalogConfig;
use crate::error::ProxyError;
use crate::upstream::gateway::UpstreamGateway;

/// Filters accepted by the product listing
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub keyword: Option<String>,
    pub only_available: bool,
}

/// Catalog operations on top of the gateway
#[derive(Debug, Clone)]
pub struct CatalogClient {
    gateway: Arc<UpstreamGateway>,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(gateway: Arc<UpstreamGateway>, config: CatalogConfig) -> Self {
        Self { gateway, config }
    }

    pub async fn products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ProxyError> {
        let request = CatalogQuery::new(self.config.vendor_id)
            .category(filter.category_id)
            .keyword(filter.keyword.as_deref())
            .only_available(filter.only_available)
            .to_request()?;

        let tree = parse_tree(self.gateway.call(&request).await?)?;
        let mut products = flatten_products(&tree, self.config.brand.as_deref());
        if filter.only_available {
            products.retain(|p| p.in_stock);
        }

        info!(total = products.len(), "catalog flattened");
        Ok(products)
    }

    pub async fn categories(&self) -> Result<Vec<CategorySummary>, ProxyError> {
        let request = CatalogQuery::new(self.config.vendor_id).to_request()?;
        let tree = parse_tree(self.gateway.call(&request).await?)?;
        Ok(flatten_categories(&tree))
    }

    pub async fn product(&self, articul: &str) -> Result<ProductDetail, ProxyError> {
        let response = self.gateway.call(&product_request(articul)).await?;
        product_detail(response, articul)
    }
}
