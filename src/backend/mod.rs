//! Backend Module
//!
//! The key-value store the result cache sits on. Implementations must offer
//! atomic whole-value writes with a TTL, bulk deletes, key enumeration by
//! pattern and a store-wide memory figure.

mod entry;
mod memory;
mod redis;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use entry::{current_timestamp_ms, StoredValue};
pub use memory::MemoryBackend;
pub use self::redis::{parse_used_memory, redact_url, RedisBackend};

// == Backend Error ==
/// Failures raised by a backing store.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Could not reach the store
    #[error("connection error: {0}")]
    Connection(String),

    /// Store answered with an error
    #[error("command error: {0}")]
    Command(String),

    /// Store did not answer in time
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for backend calls.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

// == Backend Trait ==
/// Operations the result cache needs from its backing store.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Liveness probe used once at startup.
    async fn ping(&self) -> BackendResult<()>;

    /// Returns the value for `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> BackendResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any prior value and resetting its TTL.
    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> BackendResult<()>;

    /// Deletes the given keys and returns how many existed.
    async fn del(&self, keys: &[String]) -> BackendResult<u64>;

    /// Lists keys matching a glob pattern. Only a trailing `*` is required to work.
    async fn scan(&self, pattern: &str) -> BackendResult<Vec<String>>;

    /// Store-wide memory usage in bytes.
    async fn used_memory(&self) -> BackendResult<u64>;

    /// Short provider name for logs and reports.
    fn name(&self) -> &'static str;
}
