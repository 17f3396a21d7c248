use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::catalog::CatalogClient;
use crate::config::settings::{CorsConfig, SettingsConfig};
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::server::handlers;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub catalog: CatalogClient,
}

impl AppState {
    pub fn new(metrics: &Metrics, catalog: CatalogClient) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            catalog,
        }
    }
}

/// Public routes, the optional metrics route and the CORS policy.
pub async fn app(state: AppState, settings_config: &SettingsConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/products", get(handlers::list_products))
        .route("/api/products/{articul}", get(handlers::get_product))
        .route("/api/categories", get(handlers::list_categories))
        .merge(state.metrics_state.router(&settings_config.metrics).await)
        .layer(cors_layer(&settings_config.cors))
        .with_state(state)
}

/// Bind the configured address and serve until the process stops.
pub async fn start(settings_config: &SettingsConfig, catalog: CatalogClient) -> Result<()> {
    let metrics = get_metrics().await;
    let state = AppState::new(metrics, catalog);
    let app = app(state, settings_config).await;

    let bind_addr = format!("{}:{}", settings_config.server.host, settings_config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("listening on {}", bind_addr);

    metrics.up.set(1);
    axum::serve(listener, app).await.context("server stopped")?;
    metrics.up.set(0);

    Ok(())
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if cors.allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|e| warn!("ignoring CORS origin '{}': {}", origin, e))
                .ok()
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
