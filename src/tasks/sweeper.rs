//! Expiry Sweeper Task
//!
//! Periodically purges expired values from the in-memory backend. Redis
//! expires keys on its own; only the in-process store needs this.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::backend::MemoryBackend;

/// Spawns a background task that purges expired values every `interval_secs`.
///
/// Reads already hide expired values; the sweep only reclaims their memory.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let backend = Arc::new(MemoryBackend::new());
/// let handle = spawn_expiry_sweeper(backend.clone(), 60);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_expiry_sweeper(backend: Arc<MemoryBackend>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweeper with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = backend.cleanup_expired().await;
            if removed > 0 {
                info!("Expiry sweep: removed {} expired values", removed);
            } else {
                debug!("Expiry sweep: no expired values found");
            }
        }
    })
}
