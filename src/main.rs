//! Report Cache - admin server
//!
//! Boots the result cache against its backing store and serves the admin API
//! (health, stats, invalidation).

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use report_cache::api::create_router;
use report_cache::backend::{redact_url, MemoryBackend};
use report_cache::config::BackendKind;
use report_cache::{spawn_expiry_sweeper, AppState, Config, ResultCache};

/// Main entry point for the report cache admin server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Probe the backing store once; on failure run degraded for the process lifetime
/// 4. Start the expiry sweeper when using the in-memory backend
/// 5. Serve the admin router until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "report_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Report Cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, redis={}, ttl={}s, timeout={}s, port={}",
        config.backend,
        redact_url(&config.redis_url),
        config.ttl_seconds,
        config.timeout_seconds,
        config.server_port
    );

    let (cache, sweeper) = match config.backend {
        BackendKind::Redis => (ResultCache::connect(&config).await, None),
        BackendKind::Memory if config.cache_enabled => {
            let backend = Arc::new(MemoryBackend::new());
            let sweeper = spawn_expiry_sweeper(backend.clone(), config.sweep_interval);
            let cache = ResultCache::with_backend(backend, config.cache_settings()).await;
            (cache, Some(sweeper))
        }
        BackendKind::Memory => (ResultCache::connect(&config).await, None),
    };
    if !cache.is_enabled() {
        warn!("Result cache running in degraded mode: every lookup is a miss");
    }

    let app = create_router(AppState::new(cache));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweeper))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweeper if any.
async fn shutdown_signal(sweeper: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = sweeper {
        handle.abort();
        warn!("Expiry sweeper aborted");
    }
}
