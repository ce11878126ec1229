//! Report Cache - content-addressed result cache
//!
//! Memoizes the output of the review classification pipeline (a structured
//! result plus its rendered PDF report) in Redis, keyed by a digest of the
//! normalized input and namespaced by input category. The cache is a pure
//! accelerator: when the store is unreachable every operation degrades to a
//! miss and the pipeline runs as if no cache existed.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod tasks;

pub use api::AppState;
pub use cache::{derive_key, Artifact, CachedEntry, Category, ResultCache};
pub use config::{CacheSettings, Config};
pub use error::{CacheError, ErrorKind};
pub use pipeline::{serve_through, Pipeline, Renderer, Served};
pub use tasks::spawn_expiry_sweeper;
