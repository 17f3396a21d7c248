use std::future::Future;
use tracing::{error, warn};

use crate::error::ProxyError;

/// Bounded re-authentication policy for upstream calls.
///
/// Only a 401 from the upstream is retried, and at most `attempts - 1` times.
/// The operation is expected to invalidate the rejected token itself before
/// returning the error, so the next attempt starts with a fresh login.
#[derive(Debug, Clone)]
pub struct ReauthRetry {
    pub attempts: u32,
}

impl ReauthRetry {
    pub fn new(attempts: u32) -> Self {
        Self { attempts: attempts.max(1) }
    }

    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, ProxyError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ProxyError>>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_unauthorized() && attempt < self.attempts => {
                    warn!("attempt {attempt}/{} rejected with 401, re-authenticating", self.attempts);
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_unauthorized() {
                        error!("all {attempt} attempts rejected: {e}");
                    }
                    return Err(e);
                }
            }
        }
    }
}
