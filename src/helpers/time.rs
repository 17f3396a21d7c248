use chrono::Utc;
use tokio::time::Instant;

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

/// Unix timestamp `ttl_seconds` from now
pub fn expires_in(ttl_seconds: u64) -> i64 {
    now_i64().saturating_add(ttl_seconds as i64)
}

pub fn get_instant() -> Instant {
    Instant::now()
}
