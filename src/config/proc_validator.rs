//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates:
//!   * server host / port
//!   * metrics path and logging level
//!   * outgoing timeout
//!   * upstream base url, auth paths and token ttl
//!
//! Missing credentials are not a validation error: the token manager reports
//! them per request so the proxy can start and answer health checks.

use reqwest::Url;
use tracing::{error, info, warn};

use crate::config::settings::SettingsConfig;
use crate::config::upstream::{ServiceConfig, UpstreamConfig};
use crate::observability::metrics::get_metrics;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_upstream(&cfg.upstream, &mut errors);

    if cfg.upstream.credential().is_err() {
        warn!("upstream credential is not configured; catalog routes will answer 401");
    }

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        get_metrics().await.config_validation_errors.inc();
        Err(errors)
    }
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.server.host.trim().is_empty() {
        errors.push(format!(
            "settings.server.host '{}' must be valid",
            settings.server.host
        ));
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' must be an integer in range 0-65535",
            settings.server.port
        ));
    }

    // metrics endpoint start with '/'
    let metrics = &settings.metrics;
    if !metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            metrics.path
        ));
    }

    if settings.http.timeout_ms == 0 {
        errors.push("settings.http.timeout_ms must be > 0".to_string());
    }

    // logging level
    if let Some(logging) = &settings.logging {
        let valid = ["trace", "debug", "info", "warn", "error"];
        if !valid.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, valid
            ));
        }
    }
}

/// UPSTREAM VALIDATION
fn validate_upstream(upstream: &UpstreamConfig, errors: &mut Vec<String>) {
    match Url::parse(&upstream.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!(
            "upstream.base_url '{}' has unsupported scheme '{}'",
            upstream.base_url,
            url.scheme()
        )),
        Err(e) => errors.push(format!(
            "upstream.base_url '{}' is not a valid url: {}",
            upstream.base_url, e
        )),
    }

    for (i, path) in upstream.auth_paths.iter().enumerate() {
        if !path.starts_with('/') {
            errors.push(format!(
                "upstream.auth_paths[{}] '{}' must start with '/'",
                i, path
            ));
        }
    }

    if upstream.token_ttl_seconds == Some(0) {
        errors.push("upstream.token_ttl_seconds must be > 0".to_string());
    }
}
