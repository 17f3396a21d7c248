// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use httpmock::Method::POST;
use httpmock::{Mock, MockServer};
use reqwest::Client;

use crate::config::settings::{CorsConfig, HttpConfig, MetricsConfig, ServerConfig, SettingsConfig};
use crate::config::upstream::UpstreamConfig;
use crate::upstream::gateway::UpstreamGateway;
use crate::utils::constants::{DEFAULT_AUTH_PATH, DEFAULT_TOKEN_TTL_SECONDS};

pub const TEST_LOGIN: &str = "shop-login";
pub const TEST_PASSWORD: &str = "shop-secret";

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Upstream pointing at the mock server with a login credential
pub fn upstream_config(server: &MockServer) -> UpstreamConfig {
    UpstreamConfig {
        base_url: server.base_url(),
        login: Some(TEST_LOGIN.to_string()),
        password: Some(TEST_PASSWORD.to_string()),
        static_token: None,
        auth_paths: vec![DEFAULT_AUTH_PATH.to_string()],
        token_ttl_seconds: Some(DEFAULT_TOKEN_TTL_SECONDS),
    }
}

pub fn build_gateway(upstream: &UpstreamConfig) -> UpstreamGateway {
    build_gateway_with_timeout(upstream, 5_000)
}

pub fn build_gateway_with_timeout(upstream: &UpstreamConfig, timeout_ms: u64) -> UpstreamGateway {
    UpstreamGateway::from_config(upstream, &HttpConfig { timeout_ms }).expect("gateway")
}

pub fn settings_config(metrics_enabled: bool) -> SettingsConfig {
    SettingsConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: "0".to_string(),
        },
        metrics: MetricsConfig {
            is_enabled: metrics_enabled,
            ..MetricsConfig::default()
        },
        logging: None,
        http: HttpConfig::default(),
        cors: CorsConfig::default(),
    }
}

/// Login exchange at `path` answering with `token`
pub async fn mock_login<'a>(server: &'a MockServer, path: &str, token: &str) -> Mock<'a> {
    let token = token.to_owned();
    let path = path.to_owned();
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(path)
                .json_body(json!({"login": TEST_LOGIN, "password": TEST_PASSWORD}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"access_token": token, "token_type": "Bearer"}));
        })
        .await
}
