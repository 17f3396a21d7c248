use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use crate::catalog::ProductFilter;
use crate::error::ProxyError;
use crate::observability::metrics::get_metrics;
use crate::server::server::AppState;

static PRODUCTS_ROUTE: &str = "products";
static PRODUCT_ROUTE: &str = "product";
static CATEGORIES_ROUTE: &str = "categories";

#[derive(Debug, Deserialize)]
pub struct ProductsParams {
    pub category: Option<i64>,
    pub search: Option<String>,
    #[serde(default)]
    pub available: bool,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductsParams>,
) -> Response {
    let filter = ProductFilter {
        category_id: params.category,
        keyword: params.search,
        only_available: params.available,
    };
    respond(PRODUCTS_ROUTE, state.catalog.products(&filter).await).await
}

pub async fn get_product(State(state): State<AppState>, Path(articul): Path<String>) -> Response {
    respond(PRODUCT_ROUTE, state.catalog.product(articul.trim()).await).await
}

pub async fn list_categories(State(state): State<AppState>) -> Response {
    respond(CATEGORIES_ROUTE, state.catalog.categories().await).await
}

async fn respond<T: Serialize>(route: &str, result: Result<T, ProxyError>) -> Response {
    let response = match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => e.into_response(),
    };
    get_metrics()
        .await
        .http_responses
        .with_label_values(&[route, response.status().as_str()])
        .inc();
    response
}

/// Status shown to the storefront for each failure kind
pub fn status_for(error: &ProxyError) -> StatusCode {
    match error {
        ProxyError::Config(_) | ProxyError::Auth { .. } => StatusCode::UNAUTHORIZED,
        ProxyError::NotFound(_) => StatusCode::NOT_FOUND,
        ProxyError::Upstream { .. } => match error.status() {
            Some(StatusCode::UNAUTHORIZED) => StatusCode::UNAUTHORIZED,
            Some(StatusCode::NOT_FOUND) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        },
        ProxyError::Decode(_) | ProxyError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}
