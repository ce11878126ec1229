//! Pipeline Collaborators
//!
//! The cache never runs the pipeline itself. These traits describe the two
//! producers it amortizes (classification pipeline, document renderer), and
//! [`serve_through`] is the read-through sequence a request handler runs
//! around them: consult the cache, otherwise produce and write back.

use anyhow::Context;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::cache::{Artifact, CachedEntry, Category, ResultCache};

// == Collaborator Traits ==
/// Retrieval + classification: raw content in, structured result out.
#[async_trait]
pub trait Pipeline: Send + Sync {
    type Output: Serialize + DeserializeOwned + Send + Sync;

    async fn run(&self, content: &str) -> anyhow::Result<Self::Output>;
}

/// Renders a structured result into its document artifact.
#[async_trait]
pub trait Renderer<R: Sync>: Send + Sync {
    async fn render(&self, result: &R) -> anyhow::Result<Artifact>;
}

// == Served ==
/// Where a response came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Served<R> {
    /// Read from the cache; the pipeline did not run
    Cached(CachedEntry<R>),
    /// Produced by the pipeline and renderer on this call
    Fresh(CachedEntry<R>),
}

impl<R> Served<R> {
    pub fn is_cached(&self) -> bool {
        matches!(self, Served::Cached(_))
    }

    pub fn entry(&self) -> &CachedEntry<R> {
        match self {
            Served::Cached(entry) | Served::Fresh(entry) => entry,
        }
    }

    pub fn into_entry(self) -> CachedEntry<R> {
        match self {
            Served::Cached(entry) | Served::Fresh(entry) => entry,
        }
    }
}

// == Serve Through ==
/// Serves `content` from the cache when possible, otherwise runs `pipeline`
/// and `renderer` and writes the result back.
///
/// Only pipeline and renderer failures are returned. Cache failures of any
/// kind fall back to running the pipeline, as if no cache existed.
pub async fn serve_through<P, D>(
    cache: &ResultCache,
    content: &str,
    category: Category,
    pipeline: &P,
    renderer: &D,
) -> anyhow::Result<Served<P::Output>>
where
    P: Pipeline,
    D: Renderer<P::Output>,
{
    match cache.lookup::<P::Output>(content, category).await {
        Ok(Some(entry)) => return Ok(Served::Cached(entry)),
        Ok(None) => {}
        Err(e) => debug!(kind = ?e.kind(), "Cache lookup unusable, running pipeline"),
    }

    let result = pipeline
        .run(content)
        .await
        .with_context(|| format!("pipeline failed for {}", category.label()))?;
    let artifact = renderer
        .render(&result)
        .await
        .context("rendering failed")?;

    if let Err(e) = cache.store(content, category, &result, &artifact).await {
        debug!(kind = ?e.kind(), "Result not cached");
    }

    Ok(Served::Fresh(CachedEntry::new(result, artifact)))
}
