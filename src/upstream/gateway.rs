use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::cache::token_cache::TokenCache;
use crate::config::settings::HttpConfig;
use crate::config::upstream::UpstreamConfig;
use crate::error::ProxyError;
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::resilience::retry::ReauthRetry;
use crate::upstream::request::UpstreamRequest;
use crate::upstream::token_manager::TokenManager;
use crate::utils::constants::UPSTREAM_CALL_ATTEMPTS;

/// Single entry point for authenticated upstream calls
#[derive(Debug, Clone)]
pub struct UpstreamGateway {
    client: Client,
    base_url: String,
    tokens: TokenManager,
    retry: ReauthRetry,
}

impl UpstreamGateway {
    pub fn new(client: Client, upstream: &UpstreamConfig, tokens: TokenManager) -> Self {
        Self {
            client,
            base_url: upstream.base_url.trim_end_matches('/').to_owned(),
            tokens,
            retry: ReauthRetry::new(UPSTREAM_CALL_ATTEMPTS),
        }
    }

    /// Build the client, token cache and manager from configuration.
    pub fn from_config(upstream: &UpstreamConfig, http: &HttpConfig) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(http.timeout_ms))
            .build()?;
        let tokens = TokenManager::new(client.clone(), upstream, TokenCache::new());
        Ok(Self::new(client, upstream, tokens))
    }

    pub fn token_manager(&self) -> &TokenManager {
        &self.tokens
    }

    /// Perform `request`, re-authenticating once if the upstream answers 401.
    pub async fn call(&self, request: &UpstreamRequest) -> Result<Value, ProxyError> {
        let metrics = get_metrics().await;
        let start = get_instant();
        metrics
            .upstream_requests
            .with_label_values(&[request.path.as_str(), request.method.as_str()])
            .inc();

        let result = self
            .retry
            .run(|attempt| self.attempt(request, attempt))
            .await;

        metrics
            .upstream_duration
            .with_label_values(&[request.path.as_str()])
            .observe(start.elapsed().as_secs_f64());
        if let Err(e) = &result {
            metrics
                .upstream_failures
                .with_label_values(&[request.path.as_str(), e.reason()])
                .inc();
        }
        result
    }

    async fn attempt(&self, request: &UpstreamRequest, attempt: u32) -> Result<Value, ProxyError> {
        let token = self.tokens.acquire_token().await?;
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, url = %url, attempt, "upstream call");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .bearer_auth(&token);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            self.tokens.invalidate(&token).await;
            return Err(ProxyError::upstream(status, &body));
        }
        if !status.is_success() {
            return Err(ProxyError::upstream(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProxyError::Decode(format!(
                "response of {} is not valid JSON: {}",
                request.path, e
            ))
        })
    }
}
