use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{GraphScoutError, Result};
use crate::types::{CandidateMetadata, NodeKind, ScoredCandidate};

use super::backend::{Embedder, SimilarityBackend};

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

/// A stored embedding for one graph element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct VectorFile {
    #[serde(default)]
    entries: Vec<VectorEntry>,
}

/// Load precomputed vector entries from a JSON file.
pub fn load_vectors(path: &Path) -> Result<Vec<VectorEntry>> {
    let contents = fs::read_to_string(path).map_err(|e| GraphScoutError::Vector {
        message: format!("failed to read vectors file '{}': {e}", path.display()),
    })?;
    let file: VectorFile = serde_json::from_str(&contents).map_err(|e| GraphScoutError::Vector {
        message: format!("failed to parse vectors file '{}': {e}", path.display()),
    })?;
    Ok(file.entries)
}

/// Brute-force cosine similarity index over precomputed embeddings.
///
/// Queries are embedded with the configured [`Embedder`], then compared
/// against every entry of the requested kind.
pub struct VectorIndex<E> {
    entries: Vec<VectorEntry>,
    embedder: E,
}

impl<E: Embedder> VectorIndex<E> {
    pub fn new(entries: Vec<VectorEntry>, embedder: E) -> Self {
        Self { entries, embedder }
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scores every entry of `kind` against `query` and returns the top
    /// `limit` by descending similarity.
    ///
    /// Entries tagged with a different project are skipped when `project_id`
    /// is given; untagged entries always participate.
    pub fn brute_force_search(
        &self,
        query: &[f32],
        kind: NodeKind,
        limit: usize,
        project_id: Option<&str>,
    ) -> Vec<(&VectorEntry, f32)> {
        let mut scored: Vec<(&VectorEntry, f32)> = self
            .entries
            .iter()
            .filter(|e| e.kind == kind)
            .filter(|e| match (project_id, e.project_id.as_deref()) {
                (Some(wanted), Some(actual)) => wanted == actual,
                _ => true,
            })
            .map(|e| (e, cosine_similarity(query, &e.embedding)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }
}

#[async_trait]
impl<E: Embedder> SimilarityBackend for VectorIndex<E> {
    async fn find_similar(
        &self,
        query: &str,
        kind: NodeKind,
        limit: usize,
        project_id: Option<&str>,
    ) -> Result<Vec<ScoredCandidate>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query).await?;
        let hits = self.brute_force_search(&query_vector, kind, limit, project_id);
        debug!(kind = kind.as_str(), hits = hits.len(), "vector search complete");

        Ok(hits
            .into_iter()
            .map(|(entry, score)| ScoredCandidate {
                id: entry.id.clone(),
                name: entry.name.clone(),
                kind: entry.kind,
                similarity: f64::from(score),
                metadata: CandidateMetadata {
                    path: entry.path.clone(),
                    ..CandidateMetadata::default()
                },
            })
            .collect())
    }
}
