//! Time-boxed key/value caching for read paths.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use thiserror::Error;

pub mod products;

pub use products::ProductCache;

/// Default lifetime of a cached entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("cache operation failed: {0}")]
    OperationFailed(String),
}

/// Minimal contract of the external key/value cache.
pub trait ResponseCache {
    /// Returns the payload stored under `key`, or `None` when absent or expired.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    /// Stores `payload` under `key` for `ttl`, replacing any previous entry.
    fn set(&self, key: &str, payload: String, ttl: Duration) -> Result<(), CacheError>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Process-local cache with per-entry expiry. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    store: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.store.read().map(|store| store.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> CacheError {
    CacheError::OperationFailed("cache lock poisoned".to_string())
}

impl ResponseCache for InMemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        {
            let store = self.store.read().map_err(poisoned)?;
            match store.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }
        let mut store = self.store.write().map_err(poisoned)?;
        if store.get(key).is_some_and(CacheEntry::is_expired) {
            store.remove(key);
        }
        Ok(None)
    }

    /// Also drops every expired entry, so keys that are never read again do
    /// not accumulate.
    fn set(&self, key: &str, payload: String, ttl: Duration) -> Result<(), CacheError> {
        let mut store = self.store.write().map_err(poisoned)?;
        store.retain(|_, entry| !entry.is_expired());
        store.insert(
            key.to_string(),
            CacheEntry {
                value: payload,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}
