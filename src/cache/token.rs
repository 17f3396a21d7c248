use crate::helpers::time::now_i64;

/// Bearer token issued by the upstream login exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub expires_at_unix_ts: i64, // UNIX TIMESTAMP
}

impl Token {
    pub fn new(value: String, expires_at_unix_ts: i64) -> Self {
        Self { value, expires_at_unix_ts }
    }

    /// Static tokens are never refreshed
    pub fn never_expiring(value: String) -> Self {
        Self::new(value, i64::MAX)
    }

    pub fn is_valid_at(&self, now_unix_ts: i64) -> bool {
        now_unix_ts < self.expires_at_unix_ts
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_i64())
    }
}
