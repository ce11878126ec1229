//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{derive_key, CacheReport, Category, ResultCache};
use crate::error::{CacheError, Result};
use crate::models::{ClearResponse, HealthResponse, InvalidateRequest, InvalidateResponse};

/// Application state shared across all handlers.
///
/// `ResultCache` is internally reference counted, so cloning the state is cheap.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Result cache handle
    pub cache: ResultCache,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: ResultCache) -> Self {
        Self { cache }
    }
}

/// Handler for POST /cache/:category/invalidate
///
/// Removes the entry cached for the given content.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    let category: Category = category.parse()?;

    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let removed = state.cache.invalidate(&req.content, category).await?;
    let key = derive_key(&req.content, category);

    Ok(Json(InvalidateResponse::new(removed, category.namespace(), key)))
}

/// Handler for DELETE /cache/:category
///
/// Removes every entry in one category namespace.
pub async fn clear_category_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ClearResponse>> {
    let category: Category = category.parse()?;
    let removed = state.cache.clear_category(category).await?;

    Ok(Json(ClearResponse::for_category(removed, category.namespace())))
}

/// Handler for DELETE /cache
///
/// Removes every entry in every category.
pub async fn clear_all_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    let removed = state.cache.clear_all().await?;
    Ok(Json(ClearResponse::all(removed)))
}

/// Handler for GET /stats
///
/// Returns the cache report. Backend failures show up in its `error` field.
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheReport> {
    Json(state.cache.stats().await)
}

/// Handler for GET /health
///
/// The server stays up with the cache degraded; the body says which.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        state.cache.is_enabled(),
        state.cache.backend_name(),
    ))
}
