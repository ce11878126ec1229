//! In-Memory Backend
//!
//! HashMap storage with TTL expiration. Used for local runs without Redis and
//! in tests, where its clock can be advanced and outages simulated.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{current_timestamp_ms, Backend, BackendError, BackendResult, StoredValue};

// == Memory Backend ==
/// In-process key-value store with per-key expiry.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    /// Key-value storage
    entries: RwLock<HashMap<String, StoredValue>>,
    /// Milliseconds added to the wall clock
    clock_offset_ms: AtomicU64,
    /// Cleared to simulate an outage
    unreachable: AtomicBool,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates an empty, reachable backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time as seen by this backend (Unix milliseconds).
    pub fn now_ms(&self) -> u64 {
        current_timestamp_ms().saturating_add(self.clock_offset_ms.load(Ordering::Relaxed))
    }

    // == Test Hooks ==
    /// Moves this backend's clock forward, firing any expiry that falls inside `by`.
    pub fn advance_clock(&self, by: Duration) {
        self.clock_offset_ms
            .fetch_add(by.as_millis() as u64, Ordering::Relaxed);
    }

    /// Toggles reachability. While unreachable every call fails with a connection error.
    pub fn set_reachable(&self, reachable: bool) {
        self.unreachable.store(!reachable, Ordering::Relaxed);
    }

    /// Writes raw bytes under `key` without TTL, bypassing any encoding.
    pub async fn insert_raw(&self, key: impl Into<String>, value: Vec<u8>) {
        let now = self.now_ms();
        self.entries
            .write()
            .await
            .insert(key.into(), StoredValue::new(value, now, None));
    }

    /// Remaining TTL of `key`, `None` when absent or stored without expiry.
    pub async fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = self.now_ms();
        self.entries
            .read()
            .await
            .get(key)
            .filter(|stored| !stored.is_expired_at(now))
            .and_then(|stored| stored.ttl_remaining_ms(now))
            .map(Duration::from_millis)
    }

    // == Cleanup Expired ==
    /// Removes all expired values and returns how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let now = self.now_ms();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, stored| !stored.is_expired_at(now));
        before - entries.len()
    }

    // == Length ==
    /// Number of stored values, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn check_reachable(&self) -> BackendResult<()> {
        if self.unreachable.load(Ordering::Relaxed) {
            Err(BackendError::Connection(
                "in-memory backend marked unreachable".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

/// Glob match supporting a single trailing `*`; anything else is an exact match.
fn matches_pattern(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == pattern,
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn ping(&self) -> BackendResult<()> {
        self.check_reachable()
    }

    async fn get(&self, key: &str) -> BackendResult<Option<Vec<u8>>> {
        self.check_reachable()?;
        let now = self.now_ms();

        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(stored) if !stored.is_expired_at(now) => {
                    return Ok(Some(stored.value.clone()))
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: drop it lazily
        self.entries.write().await.remove(key);
        debug!(key = key, "Expired value removed on read");
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> BackendResult<()> {
        self.check_reachable()?;
        let now = self.now_ms();
        let stored = StoredValue::new(value.to_vec(), now, Some(ttl.as_millis() as u64));
        self.entries.write().await.insert(key.to_string(), stored);
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> BackendResult<u64> {
        self.check_reachable()?;
        let now = self.now_ms();
        let mut entries = self.entries.write().await;

        let mut removed = 0;
        for key in keys {
            if let Some(stored) = entries.remove(key) {
                if !stored.is_expired_at(now) {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    async fn scan(&self, pattern: &str) -> BackendResult<Vec<String>> {
        self.check_reachable()?;
        let now = self.now_ms();
        let entries = self.entries.read().await;

        Ok(entries
            .iter()
            .filter(|(key, stored)| !stored.is_expired_at(now) && matches_pattern(pattern, key))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn used_memory(&self) -> BackendResult<u64> {
        self.check_reachable()?;
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .map(|(key, stored)| (key.len() + stored.size()) as u64)
            .sum())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
