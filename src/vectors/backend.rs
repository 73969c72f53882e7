use async_trait::async_trait;

use crate::errors::Result;
use crate::types::{NodeKind, ScoredCandidate};

/// A source of similarity-ranked candidates for a free-text query.
///
/// Implementations must return at most `limit` candidates. Ordering is up to
/// the backend; callers that need an order impose their own.
#[async_trait]
pub trait SimilarityBackend: Send + Sync {
    async fn find_similar(
        &self,
        query: &str,
        kind: NodeKind,
        limit: usize,
        project_id: Option<&str>,
    ) -> Result<Vec<ScoredCandidate>>;
}

/// Turns text into an embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
