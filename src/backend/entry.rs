//! Stored Value Module
//!
//! Defines the structure for values held by the in-memory backend.

use std::time::{SystemTime, UNIX_EPOCH};

// == Stored Value ==
/// A single stored blob with its expiry metadata.
#[derive(Debug, Clone)]
pub struct StoredValue {
    /// The stored bytes
    pub value: Vec<u8>,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoredValue {
    // == Constructor ==
    /// Creates a value written at `now_ms` with an optional TTL in milliseconds.
    pub fn new(value: Vec<u8>, now_ms: u64, ttl_ms: Option<u64>) -> Self {
        Self {
            value,
            created_at: now_ms,
            expires_at: ttl_ms.map(|ttl| now_ms.saturating_add(ttl)),
        }
    }

    // == Is Expired ==
    /// Checks whether the value has expired as of `now_ms`.
    ///
    /// A value is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds as of `now_ms`, or None if no expiration is set.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(now_ms))
    }

    /// Approximate footprint in bytes, key excluded.
    pub fn size(&self) -> usize {
        self.value.len()
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
