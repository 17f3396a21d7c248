//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

// Upstream token lifecycle
pub const DEFAULT_AUTH_PATH: &str = "/auth/token";
/// 55 minutes, below the usual 60 minute upstream token lifetime
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 55 * 60;
/// shorter values are treated as empty or error placeholders
pub const MIN_TOKEN_LEN: usize = 10;
/// one initial attempt plus one retry after re-authentication
pub const UPSTREAM_CALL_ATTEMPTS: u32 = 2;

// Environment variables holding the credential
pub const ENV_LOGIN: &str = "SUPPLIER_LOGIN";
pub const ENV_PASSWORD: &str = "SUPPLIER_PASSWORD";
pub const ENV_STATIC_TOKEN: &str = "SUPPLIER_TOKEN";

// Upstream catalog endpoints
pub const CATALOG_GET_PATH: &str = "/Catalog/Get";
pub const CATALOG_PRODUCT_PATH: &str = "/Catalog/GetProduct";
