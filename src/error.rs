use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum length for upstream response bodies carried in errors
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Failures of the token manager and the upstream gateway.
///
/// Every variant is scoped to a single request; none of them is fatal to the
/// process. Route handlers turn them into HTTP responses. Cloneable so a
/// failed login can be handed to every caller that waited on it.
#[derive(Error, Debug, Clone)]
pub enum ProxyError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication failed with status {status}: {body}")]
    Auth { status: StatusCode, body: String },

    #[error("upstream returned status {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(#[source] Arc<reqwest::Error>),
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        ProxyError::Transport(Arc::new(e))
    }
}

impl ProxyError {
    pub fn auth(status: StatusCode, body: &str) -> Self {
        ProxyError::Auth {
            status,
            body: truncate_body(body),
        }
    }

    pub fn upstream(status: StatusCode, body: &str) -> Self {
        ProxyError::Upstream {
            status,
            body: truncate_body(body),
        }
    }

    /// True for a data call rejected with 401, the only case the gateway retries.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ProxyError::Upstream { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    /// Upstream status carried by the error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ProxyError::Auth { status, .. } | ProxyError::Upstream { status, .. } => Some(*status),
            ProxyError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Short label used for the failure metrics
    pub fn reason(&self) -> &'static str {
        match self {
            ProxyError::Config(_) => "config",
            ProxyError::Auth { .. } => "auth",
            ProxyError::Upstream { .. } => "status",
            ProxyError::Decode(_) => "decode",
            ProxyError::NotFound(_) => "not_found",
            ProxyError::Transport(_) => "transport",
        }
    }
}

/// Truncate a response body to avoid logging excessive data
pub fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}
