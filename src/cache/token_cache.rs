use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::debug;

use crate::cache::token::Token;
use crate::error::ProxyError;

/// Process-wide cached upstream token.
///
/// Cloning shares the same cell. `login_gate` serializes login exchanges so
/// concurrent callers that miss the cache wait for a single refresh. The gate
/// holds the failure of the last exchange, if it failed; `exchanges` counts
/// finished exchanges so a waiter can tell whether one completed while it was
/// queued.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<Option<Token>>>,
    login_gate: Arc<Mutex<Option<ProxyError>>>,
    exchanges: Arc<AtomicU64>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get token if it exists and is not expired
    pub async fn get(&self) -> Option<Token> {
        self.inner
            .read()
            .await
            .as_ref()
            .filter(|token| token.is_valid())
            .cloned()
    }

    pub async fn set(&self, token: Token) {
        *self.inner.write().await = Some(token);
    }

    /// Drop the cached token, but only if it is the one that was rejected.
    ///
    /// Returns true when the cache was reset.
    pub async fn invalidate(&self, rejected: &str) -> bool {
        let mut guard = self.inner.write().await;
        match guard.as_ref() {
            Some(token) if token.value == rejected => {
                *guard = None;
                true
            }
            Some(_) => {
                debug!("cached token already replaced, keeping it");
                false
            }
            None => false,
        }
    }

    /// Held for the duration of a login exchange
    pub async fn login_gate(&self) -> MutexGuard<'_, Option<ProxyError>> {
        self.login_gate.lock().await
    }

    /// Number of finished login exchanges
    pub fn exchanges(&self) -> u64 {
        self.exchanges.load(Ordering::Acquire)
    }

    /// Record a finished exchange; call while holding the gate.
    pub fn exchange_finished(&self) {
        self.exchanges.fetch_add(1, Ordering::AcqRel);
    }
}
