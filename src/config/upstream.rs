use serde::Deserialize;

use crate::config::settings::SettingsConfig;
use crate::error::ProxyError;
use crate::utils::constants::{ENV_LOGIN, ENV_PASSWORD, ENV_STATIC_TOKEN};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// ================================
/// Upstream supplier API
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub login: Option<String>,
    pub password: Option<String>,
    /// pre-shared token, used instead of the login exchange when set
    pub static_token: Option<String>,
    /// candidate login endpoints, tried in order
    #[serde(default)]
    pub auth_paths: Vec<String>,
    pub token_ttl_seconds: Option<u64>,
}

/// Credential presented to the upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Login { login: String, password: String },
    Static { token: String },
}

impl UpstreamConfig {
    /// Resolve the configured credential, naming the missing variables otherwise.
    pub fn credential(&self) -> Result<Credential, ProxyError> {
        if let Some(token) = non_empty(&self.static_token) {
            return Ok(Credential::Static {
                token: token.to_owned(),
            });
        }

        match (non_empty(&self.login), non_empty(&self.password)) {
            (Some(login), Some(password)) => Ok(Credential::Login {
                login: login.to_owned(),
                password: password.to_owned(),
            }),
            (login, password) => {
                let mut missing = Vec::with_capacity(2);
                if login.is_none() {
                    missing.push(ENV_LOGIN);
                }
                if password.is_none() {
                    missing.push(ENV_PASSWORD);
                }
                Err(ProxyError::Config(format!(
                    "missing upstream credential: {} (or {})",
                    missing.join(", "),
                    ENV_STATIC_TOKEN
                )))
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// ================================
/// Catalog query defaults
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// forwarded as `vendorid`; 0 is sent as-is
    #[serde(default)]
    pub vendor_id: i64,
    /// exact-match post-filter on the product vendor field
    pub brand: Option<String>,
}
