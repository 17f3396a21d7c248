use crate::config::settings::{LogFormat, LoggingConfig};
use crate::config::upstream::ServiceConfig;
use crate::utils::constants::{DEFAULT_AUTH_PATH, DEFAULT_TOKEN_TTL_SECONDS};

pub fn initiate_default_values(mut config: ServiceConfig) -> ServiceConfig {
    if config.settings.logging.is_none() {
        config.settings.logging = Some(LoggingConfig::new("info".to_owned(), LogFormat::from_env()));
    }

    let upstream = &mut config.upstream;
    // env expansion leaves empty strings behind for unset variables
    upstream.login = empty_to_none(upstream.login.take());
    upstream.password = empty_to_none(upstream.password.take());
    upstream.static_token = empty_to_none(upstream.static_token.take());
    upstream.base_url = upstream.base_url.trim().trim_end_matches('/').to_owned();

    upstream.auth_paths.retain(|path| !path.trim().is_empty());
    if upstream.auth_paths.is_empty() {
        upstream.auth_paths.push(DEFAULT_AUTH_PATH.to_owned());
    }
    if upstream.token_ttl_seconds.is_none() {
        upstream.token_ttl_seconds = Some(DEFAULT_TOKEN_TTL_SECONDS);
    }

    config.catalog.brand = empty_to_none(config.catalog.brand.take());

    config
}

fn empty_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
