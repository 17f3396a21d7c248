use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::token::Token;
use crate::cache::token_cache::TokenCache;
use crate::config::upstream::{Credential, UpstreamConfig};
use crate::error::ProxyError;
use crate::helpers::time::expires_in;
use crate::observability::metrics::get_metrics;
use crate::parser::parser::parse_token;
use crate::utils::constants::{DEFAULT_AUTH_PATH, DEFAULT_TOKEN_TTL_SECONDS};

static SUCCESS_MSG: &str = "success";
static ERROR_MSG: &str = "error";

#[derive(Serialize)]
struct LoginRequest<'a> {
    login: &'a str,
    password: &'a str,
}

/// Keeps a valid bearer token for the upstream API.
///
/// A login exchange happens only when the cache is empty or expired; the
/// exchange itself is serialized so concurrent misses share one round trip
/// and its outcome, failures included.
#[derive(Debug, Clone)]
pub struct TokenManager {
    client: Client,
    upstream: Arc<UpstreamConfig>,
    cache: TokenCache,
}

impl TokenManager {
    pub fn new(client: Client, upstream: &UpstreamConfig, cache: TokenCache) -> Self {
        let mut upstream = upstream.clone();
        upstream.base_url = upstream.base_url.trim_end_matches('/').to_owned();
        Self {
            client,
            upstream: Arc::new(upstream),
            cache,
        }
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Return the cached token, logging in first when there is none.
    pub async fn acquire_token(&self) -> Result<String, ProxyError> {
        if let Some(token) = self.cache.get().await {
            return Ok(token.value);
        }

        // fails before any network I/O
        let (login, password) = match self.upstream.credential()? {
            Credential::Static { token } => {
                self.cache.set(Token::never_expiring(token.clone())).await;
                return Ok(token);
            }
            Credential::Login { login, password } => (login, password),
        };

        let seen = self.cache.exchanges();
        let mut gate = self.cache.login_gate().await;
        if let Some(token) = self.cache.get().await {
            debug!("token refreshed by a concurrent request");
            return Ok(token.value);
        }
        // an exchange finished while this caller was queued and it failed
        if self.cache.exchanges() != seen {
            if let Some(e) = gate.as_ref() {
                debug!(error = %e, "sharing failed login exchange");
                return Err(e.clone());
            }
        }

        let result = self.login(&login, &password).await;
        if let Ok(value) = &result {
            let ttl = self
                .upstream
                .token_ttl_seconds
                .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);
            let token = Token::new(value.clone(), expires_in(ttl));
            get_metrics().await.token_expiry_unix.set(token.expires_at_unix_ts);
            self.cache.set(token).await;
        }
        *gate = result.as_ref().err().cloned();
        self.cache.exchange_finished();

        result
    }

    /// Forget `rejected` so the next `acquire_token` logs in again.
    pub async fn invalidate(&self, rejected: &str) -> bool {
        let dropped = self.cache.invalidate(rejected).await;
        if dropped {
            info!("cached token invalidated");
            get_metrics().await.token_invalidations.inc();
        }
        dropped
    }

    /// Try each candidate auth path in order, surfacing the last failure.
    async fn login(&self, login: &str, password: &str) -> Result<String, ProxyError> {
        let default_paths = [DEFAULT_AUTH_PATH.to_owned()];
        let paths = if self.upstream.auth_paths.is_empty() {
            &default_paths[..]
        } else {
            &self.upstream.auth_paths[..]
        };

        let metrics = get_metrics().await;
        let mut last_error = None;
        for path in paths {
            match self.login_at(path, login, password).await {
                Ok(token) => {
                    metrics.auth_exchanges.with_label_values(&[SUCCESS_MSG]).inc();
                    info!(path = %path, token_len = token.len(), "login exchange succeeded");
                    return Ok(token);
                }
                Err(e) => {
                    metrics.auth_exchanges.with_label_values(&[ERROR_MSG]).inc();
                    warn!(path = %path, error = %e, "login exchange failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ProxyError::Config("no auth path configured".to_owned())))
    }

    async fn login_at(&self, path: &str, login: &str, password: &str) -> Result<String, ProxyError> {
        let url = format!("{}{}", self.upstream.base_url, path);
        debug!(url = %url, "login exchange");

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { login, password })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProxyError::auth(status, &body));
        }

        parse_token(&body)
    }
}
