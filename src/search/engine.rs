use std::collections::HashMap;

use tracing::{debug, warn};

use crate::errors::SearchFailure;
use crate::graph::GraphIndex;
use crate::types::{MatchSource, NodeKind, RankedResult, ScoredCandidate};
use crate::vectors::SimilarityBackend;

use super::results::*;

/// Flat score given to every vector match in hybrid search. The backend's own
/// similarity is discarded so that exact graph matches always rank above.
pub const VECTOR_MATCH_SCORE: f64 = 0.8;

/// Score given to structural (graph) matches in hybrid search.
pub const GRAPH_MATCH_SCORE: f64 = 1.0;

/// Method tag reported by hybrid search.
pub const HYBRID_METHOD: &str = "hybrid (graph + vector)";

const HYBRID_SOURCE_LIMIT: usize = 5;
const HYBRID_RESULT_LIMIT: usize = 10;
const DUPLICATE_FETCH_LIMIT: usize = 10;
const DUPLICATE_THRESHOLD: usize = 3;
const REFACTOR_FETCH_LIMIT: usize = 5;
const OTHER_GROUP: &str = "other";

const REFACTOR_ADVICE: [&str; 3] = [
    "Extract common logic into a shared function",
    "Create a shared utility module for this pattern",
    "Document the pattern so future code reuses it",
];

/// Combines graph lookups and similarity-backend queries into ranked results.
///
/// The engine borrows both collaborators and keeps no state between calls.
/// The backend is optional: operations that need it report
/// [`SearchFailure::BackendUnavailable`] when it is missing, while hybrid
/// search degrades to its graph half.
pub struct HybridSearchEngine<'a> {
    graph: &'a dyn GraphIndex,
    backend: Option<&'a dyn SimilarityBackend>,
    project_id: Option<String>,
}

impl<'a> HybridSearchEngine<'a> {
    pub fn new(graph: &'a dyn GraphIndex, backend: Option<&'a dyn SimilarityBackend>) -> Self {
        Self {
            graph,
            backend,
            project_id: None,
        }
    }

    /// Scopes backend queries to a project. An empty id means no scope.
    pub fn with_project(mut self, project_id: &str) -> Self {
        self.project_id = (!project_id.is_empty()).then(|| project_id.to_string());
        self
    }

    /// Returns `true` if a similarity backend is attached.
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Top `limit` similarity matches of one kind.
    pub async fn semantic_search(
        &self,
        query: &str,
        kind: NodeKind,
        limit: usize,
    ) -> Result<SemanticSearchResponse, SearchFailure> {
        let backend = self.require_backend()?;
        let candidates = self.find_similar(backend, query, kind, limit).await?;

        let results: Vec<SemanticMatch> = candidates
            .into_iter()
            .map(|c| SemanticMatch {
                path: c.metadata.path,
                id: c.id,
                name: c.name,
                kind: c.kind,
                relevance: "high",
            })
            .collect();

        Ok(SemanticSearchResponse {
            count: results.len(),
            results,
        })
    }

    /// Looks for near-duplicates of `name` and groups them by directory.
    pub async fn find_duplicates(
        &self,
        name: &str,
        kind: NodeKind,
    ) -> Result<DuplicatesResponse, SearchFailure> {
        let backend = self.require_backend()?;
        let candidates = self
            .find_similar(backend, name, kind, DUPLICATE_FETCH_LIMIT)
            .await?;
        let total = candidates.len();

        let mut groups: Vec<DuplicateGroup> = Vec::new();
        for c in candidates {
            let key = duplicate_group_key(c.path());
            let member = DuplicateMatch {
                id: c.id,
                name: c.name,
                path: c.metadata.path,
                similarity: c.similarity,
            };
            match groups.iter_mut().find(|g| g.key == key) {
                Some(group) => group.members.push(member),
                None => groups.push(DuplicateGroup {
                    key,
                    members: vec![member],
                }),
            }
        }

        let recommendation = if total > DUPLICATE_THRESHOLD {
            "Consider refactoring to shared utility"
        } else {
            "No significant duplicates"
        };

        Ok(DuplicatesResponse {
            groups,
            total,
            recommendation,
        })
    }

    /// Searches functions, classes and files for a natural-language meaning.
    ///
    /// The three queries run concurrently; results keep the fixed
    /// function, class, file order regardless of similarity. A failure in any
    /// one query fails the whole search.
    pub async fn meaning_search(
        &self,
        meaning: &str,
        limit: usize,
    ) -> Result<MeaningSearchResponse, SearchFailure> {
        let backend = self.require_backend()?;
        let per_kind = limit.div_ceil(3);

        let (functions, classes, files) = tokio::try_join!(
            self.find_similar(backend, meaning, NodeKind::Function, per_kind),
            self.find_similar(backend, meaning, NodeKind::Class, per_kind),
            self.find_similar(backend, meaning, NodeKind::File, per_kind),
        )?;

        let results: Vec<MeaningMatch> = functions
            .into_iter()
            .chain(classes)
            .chain(files)
            .take(limit)
            .map(|c| MeaningMatch {
                description: format!("{} matching: {}", c.kind.as_str(), meaning),
                path: c.metadata.path,
                id: c.id,
                name: c.name,
                kind: c.kind,
                similarity: c.similarity,
            })
            .collect();

        Ok(MeaningSearchResponse {
            count: results.len(),
            results,
        })
    }

    /// Decides whether `element` has enough look-alikes to be worth
    /// consolidating.
    pub async fn suggest_refactor(
        &self,
        element: &str,
        kind: NodeKind,
    ) -> Result<RefactorResponse, SearchFailure> {
        let backend = self.require_backend()?;
        let candidates = self
            .find_similar(backend, element, kind, REFACTOR_FETCH_LIMIT)
            .await?;

        if candidates.len() < 2 {
            return Ok(RefactorResponse {
                element: element.to_string(),
                status: RefactorStatus::Unique,
                similar: Vec::new(),
                suggestions: Vec::new(),
                priority: None,
            });
        }

        let many = candidates.len() >= 3;
        let suggestions = if many {
            REFACTOR_ADVICE.iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };
        let priority = if many {
            RefactorPriority::High
        } else {
            RefactorPriority::Medium
        };

        let similar = candidates
            .into_iter()
            .map(|c| SimilarElement {
                path: c.metadata.path,
                id: c.id,
                name: c.name,
                kind: c.kind,
                similarity: c.similarity,
            })
            .collect();

        Ok(RefactorResponse {
            element: element.to_string(),
            status: RefactorStatus::RefactorCandidate,
            similar,
            suggestions,
            priority: Some(priority),
        })
    }

    /// Merges exact graph matches with vector matches into one ranked list.
    ///
    /// Graph matches (functions only) score 1.0 and vector matches 0.8. Entries
    /// sharing an id are merged keeping the higher score; ties keep graph
    /// matches first. At most ten results are returned.
    pub async fn hybrid_search(
        &self,
        query: &str,
        kind: NodeKind,
    ) -> Result<HybridSearchResponse, SearchFailure> {
        let vector_hits: Vec<SourceHit> = match self.backend {
            Some(backend) => self
                .find_similar(backend, query, kind, HYBRID_SOURCE_LIMIT)
                .await?
                .into_iter()
                .map(|c| SourceHit {
                    id: c.id,
                    name: c.name,
                    source: MatchSource::Vector,
                    score: VECTOR_MATCH_SCORE,
                })
                .collect(),
            None => Vec::new(),
        };

        let graph_hits = if kind == NodeKind::Function {
            self.graph_function_matches(query)
        } else {
            Vec::new()
        };

        debug!(
            graph = graph_hits.len(),
            vector = vector_hits.len(),
            "hybrid search candidates"
        );

        let mut results = merge_hits(graph_hits.into_iter().chain(vector_hits));
        results.truncate(HYBRID_RESULT_LIMIT);

        Ok(HybridSearchResponse {
            results,
            method: HYBRID_METHOD,
        })
    }

    // ------------------------------------------------------------------
    // Private helpers
    // ------------------------------------------------------------------

    fn require_backend(&self) -> Result<&'a dyn SimilarityBackend, SearchFailure> {
        self.backend.ok_or(SearchFailure::BackendUnavailable)
    }

    async fn find_similar(
        &self,
        backend: &dyn SimilarityBackend,
        query: &str,
        kind: NodeKind,
        limit: usize,
    ) -> Result<Vec<ScoredCandidate>, SearchFailure> {
        backend
            .find_similar(query, kind, limit, self.project_id.as_deref())
            .await
            .map_err(|e| {
                warn!(error = %e, kind = kind.as_str(), "similarity query failed");
                SearchFailure::from(e)
            })
    }

    /// First few FUNCTION nodes whose name contains `query`, in index order.
    fn graph_function_matches(&self, query: &str) -> Vec<SourceHit> {
        self.graph
            .nodes_by_kind(NodeKind::Function)
            .into_iter()
            .filter_map(|node| {
                let name = node.name()?;
                name.contains(query).then(|| SourceHit {
                    id: node.id.clone(),
                    name: name.to_string(),
                    source: MatchSource::Graph,
                    score: GRAPH_MATCH_SCORE,
                })
            })
            .take(HYBRID_SOURCE_LIMIT)
            .collect()
    }
}

/// Merges single-source hits by id and sorts them by descending score.
///
/// The first hit for an id fixes its position and name; later hits raise the
/// score to the maximum seen and append their source. The sort is stable, so
/// equal scores keep input order.
pub fn merge_hits(hits: impl IntoIterator<Item = SourceHit>) -> Vec<RankedResult> {
    let mut merged: Vec<RankedResult> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for hit in hits {
        match positions.get(&hit.id) {
            Some(&idx) => {
                let entry = &mut merged[idx];
                entry.combined_score = entry.combined_score.max(hit.score);
                entry.sources.push(hit.source);
            }
            None => {
                positions.insert(hit.id.clone(), merged.len());
                merged.push(RankedResult {
                    id: hit.id,
                    name: hit.name,
                    combined_score: hit.score,
                    sources: vec![hit.source],
                });
            }
        }
    }

    merged.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    merged
}

/// Second `/` segment of a candidate path, or `"other"`.
fn duplicate_group_key(path: Option<&str>) -> String {
    path.and_then(|p| p.split('/').nth(1))
        .filter(|segment| !segment.is_empty())
        .unwrap_or(OTHER_GROUP)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, source: MatchSource, score: f64) -> SourceHit {
        SourceHit {
            id: id.to_string(),
            name: id.to_string(),
            source,
            score,
        }
    }

    #[test]
    fn group_key_uses_second_segment() {
        assert_eq!(duplicate_group_key(Some("src/utils/foo.ts")), "utils");
        assert_eq!(duplicate_group_key(Some("lib/core.ts")), "core.ts");
    }

    #[test]
    fn group_key_falls_back_to_other() {
        assert_eq!(duplicate_group_key(None), "other");
        assert_eq!(duplicate_group_key(Some("README.md")), "other");
        assert_eq!(duplicate_group_key(Some("src//x.ts")), "other");
    }

    #[test]
    fn merge_keeps_max_score_and_all_sources() {
        let merged = merge_hits(vec![
            hit("a", MatchSource::Vector, 0.8),
            hit("a", MatchSource::Graph, 1.0),
            hit("a", MatchSource::Vector, 0.8),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].combined_score, 1.0);
        assert_eq!(
            merged[0].sources,
            vec![MatchSource::Vector, MatchSource::Graph, MatchSource::Vector]
        );
    }

    #[test]
    fn merge_sort_is_stable_for_ties() {
        let merged = merge_hits(vec![
            hit("g1", MatchSource::Graph, 0.8),
            hit("v1", MatchSource::Vector, 0.8),
            hit("g2", MatchSource::Graph, 1.0),
        ]);
        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["g2", "g1", "v1"]);
    }
}
