//! API Module
//!
//! Admin HTTP surface over the result cache. The request layer that runs the
//! pipeline lives elsewhere; this only exposes diagnostics and invalidation.
//!
//! # Endpoints
//! - `GET /health` - Liveness and cache health
//! - `GET /stats` - Cache report
//! - `POST /cache/:category/invalidate` - Drop one entry
//! - `DELETE /cache/:category` - Drop a category
//! - `DELETE /cache` - Drop everything

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
