//! Result Store Facade
//!
//! `ResultCache` is the only path to the backing store. It derives keys,
//! encodes entries, bounds every call with a timeout and short-circuits when
//! the store was unreachable at startup. No backend fault ever panics or
//! escapes untyped: each operation returns a [`CacheError`] the caller may
//! treat as a plain miss.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info, warn};

use crate::backend::{Backend, BackendError, BackendResult, RedisBackend};
use crate::cache::codec::{self, Artifact, CachedEntry};
use crate::cache::key::{derive_key, preview, Category};
use crate::cache::stats::{format_megabytes, CacheCounters, CacheReport};
use crate::config::{CacheSettings, Config};
use crate::error::{CacheError, Result};

// == Result Cache ==
/// Handle to the result cache. Cheap to clone; clones share the backend and counters.
#[derive(Clone)]
pub struct ResultCache {
    inner: Arc<Inner>,
}

struct Inner {
    /// `None` once the startup probe failed
    backend: Option<Arc<dyn Backend>>,
    backend_name: &'static str,
    settings: CacheSettings,
    counters: CacheCounters,
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("enabled", &self.is_enabled())
            .field("backend", &self.inner.backend_name)
            .field("settings", &self.inner.settings)
            .finish()
    }
}

impl ResultCache {
    // == Constructors ==
    /// Probes `backend` once and returns an enabled cache on success, or a
    /// permanently degraded one otherwise.
    pub async fn with_backend(backend: Arc<dyn Backend>, settings: CacheSettings) -> Self {
        let name = backend.name();
        match bounded(settings.timeout, backend.ping()).await {
            Ok(()) => {
                info!(
                    backend = name,
                    ttl_seconds = settings.ttl.as_secs(),
                    "Result cache initialized"
                );
                Self::build(Some(backend), name, settings)
            }
            Err(e) => {
                warn!(backend = name, error = %e, "Backing store probe failed. Cache disabled.");
                Self::build(None, name, settings)
            }
        }
    }

    /// Connects to Redis as configured. Any connection failure yields a degraded cache.
    pub async fn connect(config: &Config) -> Self {
        let settings = config.cache_settings();
        if !config.cache_enabled {
            info!("Result cache disabled by configuration");
            return Self::build(None, "disabled", settings);
        }

        match RedisBackend::connect(&config.redis_url, settings.timeout).await {
            Ok(backend) => Self::with_backend(Arc::new(backend), settings).await,
            Err(e) => {
                warn!(error = %e, "Redis connection failed. Cache disabled.");
                Self::build(None, "redis", settings)
            }
        }
    }

    /// A cache in degraded mode: every operation is a no-op.
    pub fn disabled() -> Self {
        Self::build(None, "disabled", CacheSettings::default())
    }

    fn build(
        backend: Option<Arc<dyn Backend>>,
        backend_name: &'static str,
        settings: CacheSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                backend_name,
                settings,
                counters: CacheCounters::new(),
            }),
        }
    }

    // == Accessors ==
    pub fn is_enabled(&self) -> bool {
        self.inner.backend.is_some()
    }

    pub fn ttl(&self) -> Duration {
        self.inner.settings.ttl
    }

    pub fn backend_name(&self) -> &'static str {
        self.inner.backend_name
    }

    fn live_backend(&self) -> Result<&Arc<dyn Backend>> {
        self.inner.backend.as_ref().ok_or(CacheError::Disabled)
    }

    async fn call<T>(&self, fut: impl Future<Output = BackendResult<T>>) -> BackendResult<T> {
        bounded(self.inner.settings.timeout, fut).await
    }

    // == Lookup ==
    /// Reads the entry for `content` under `category`.
    ///
    /// `Ok(None)` is a plain miss. A blob that no longer decodes into `R`
    /// yields [`CacheError::CorruptEntry`]; callers should treat it as a miss.
    pub async fn lookup<R: DeserializeOwned>(
        &self,
        content: &str,
        category: Category,
    ) -> Result<Option<CachedEntry<R>>> {
        let backend = self.live_backend()?;
        let key = derive_key(content, category);

        let blob = match self.call(backend.get(&key)).await {
            Ok(blob) => blob,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed");
                return Err(e.into());
            }
        };

        let Some(blob) = blob else {
            self.inner.counters.record_miss();
            info!("Cache MISS for {}: {}...", category.label(), preview(content));
            return Ok(None);
        };

        match codec::decode::<R>(&blob) {
            Ok(entry) => {
                self.inner.counters.record_hit();
                info!(
                    "Cache HIT for {}: {}... (saved processing time)",
                    category.label(),
                    preview(content)
                );
                Ok(Some(entry))
            }
            Err(e) => {
                self.inner.counters.record_corrupt();
                error!(key = %key, error = %e, "Corrupt cache entry, treating as miss");
                Err(CacheError::CorruptEntry {
                    key,
                    reason: e.to_string(),
                })
            }
        }
    }

    // == Store ==
    /// Writes `result` and `artifact` as one entry with the configured TTL,
    /// replacing any prior entry and resetting its expiry.
    ///
    /// `Ok(())` only once the backing store acknowledged the write.
    pub async fn store<R: Serialize>(
        &self,
        content: &str,
        category: Category,
        result: &R,
        artifact: &Artifact,
    ) -> Result<()> {
        let backend = self.live_backend()?;
        let key = derive_key(content, category);

        let blob = codec::encode(result, artifact)
            .map_err(|e| self.write_failed(&key, e.to_string()))?;

        self.call(backend.set_ex(&key, &blob, self.inner.settings.ttl))
            .await
            .map_err(|e| self.write_failed(&key, e.to_string()))?;

        self.inner.counters.record_write();
        info!(
            ttl_seconds = self.inner.settings.ttl.as_secs(),
            bytes = blob.len(),
            "Cached result for {}: {}...",
            category.label(),
            preview(content)
        );
        Ok(())
    }

    fn write_failed(&self, key: &str, reason: String) -> CacheError {
        self.inner.counters.record_write_failure();
        error!(key = key, error = %reason, "Error caching result");
        CacheError::WriteFailure(reason)
    }

    // == Invalidate ==
    /// Deletes the entry for `content`. `Ok(true)` when one existed.
    pub async fn invalidate(&self, content: &str, category: Category) -> Result<bool> {
        let backend = self.live_backend()?;
        let key = derive_key(content, category);

        let deleted = self
            .call(backend.del(std::slice::from_ref(&key)))
            .await
            .map_err(|e| {
                warn!(key = %key, error = %e, "Error invalidating cache");
                CacheError::from(e)
            })?;

        if deleted > 0 {
            info!("Cache invalidated for {}: {}...", category.label(), preview(content));
        } else {
            debug!(
                "No cache found to invalidate for {}: {}...",
                category.label(),
                preview(content)
            );
        }
        Ok(deleted > 0)
    }

    // == Clear Category ==
    /// Deletes every entry in `category`'s namespace and returns how many were removed.
    pub async fn clear_category(&self, category: Category) -> Result<u64> {
        let backend = self.live_backend()?;

        let removed = self
            .call(async {
                let keys = backend.scan(&category.pattern()).await?;
                if keys.is_empty() {
                    return Ok::<u64, BackendError>(0);
                }
                backend.del(&keys).await
            })
            .await
            .map_err(|e| {
                warn!(category = %category, error = %e, "Error clearing cache");
                CacheError::from(e)
            })?;

        if removed > 0 {
            info!(category = %category, "Cleared {} cache entries", removed);
        } else {
            debug!(category = %category, "No cache entries to clear");
        }
        Ok(removed)
    }

    /// Clears every category. Stops at the first failing category.
    pub async fn clear_all(&self) -> Result<u64> {
        let mut removed = 0;
        for category in Category::ALL {
            removed += self.clear_category(category).await?;
        }
        Ok(removed)
    }

    // == Stats ==
    /// Gathers a diagnostic report. Never fails: backend errors land in
    /// the report's `error` field.
    pub async fn stats(&self) -> CacheReport {
        let Ok(backend) = self.live_backend() else {
            return CacheReport::disabled();
        };

        let counters = self.inner.counters.snapshot();
        let gathered = self
            .call(async {
                let mut keys_by_category = BTreeMap::new();
                for category in Category::ALL {
                    let count = backend.scan(&category.pattern()).await?.len() as u64;
                    keys_by_category.insert(category.namespace().to_string(), count);
                }
                let memory = backend.used_memory().await?;
                Ok::<_, BackendError>((keys_by_category, memory))
            })
            .await;

        match gathered {
            Ok((keys_by_category, memory_used_bytes)) => CacheReport {
                enabled: true,
                backend: self.inner.backend_name.to_string(),
                total_keys: keys_by_category.values().sum(),
                keys_by_category,
                memory_used_bytes,
                memory_used: format_megabytes(memory_used_bytes),
                error: None,
                counters,
            },
            Err(e) => {
                error!(error = %e, "Error getting cache stats");
                CacheReport {
                    enabled: true,
                    backend: self.inner.backend_name.to_string(),
                    total_keys: 0,
                    keys_by_category: BTreeMap::new(),
                    memory_used_bytes: 0,
                    memory_used: format_megabytes(0),
                    error: Some(e.to_string()),
                    counters,
                }
            }
        }
    }
}

/// Runs `fut`, converting an elapsed `timeout` into [`BackendError::Timeout`].
async fn bounded<T>(
    timeout: Duration,
    fut: impl Future<Output = BackendResult<T>>,
) -> BackendResult<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(BackendError::Timeout(timeout)),
    }
}
