use serde::Serialize;

use crate::types::{MatchSource, NodeKind, RankedResult};

/// One hit from [`semantic_search`](super::HybridSearchEngine::semantic_search).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticMatch {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: Option<String>,
    pub relevance: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticSearchResponse {
    pub results: Vec<SemanticMatch>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateMatch {
    pub id: String,
    pub name: String,
    pub path: Option<String>,
    pub similarity: f64,
}

/// Candidates sharing the same second path segment (e.g. `utils` for
/// `src/utils/date.ts`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    pub key: String,
    pub members: Vec<DuplicateMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicatesResponse {
    /// Groups in the order their first member was seen.
    pub groups: Vec<DuplicateGroup>,
    pub total: usize,
    pub recommendation: &'static str,
}

impl DuplicatesResponse {
    /// Looks up a group by key.
    pub fn group(&self, key: &str) -> Option<&DuplicateGroup> {
        self.groups.iter().find(|g| g.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeaningMatch {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: Option<String>,
    pub similarity: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeaningSearchResponse {
    pub results: Vec<MeaningMatch>,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefactorStatus {
    /// Fewer than two similar elements; nothing to consolidate.
    Unique,
    RefactorCandidate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefactorPriority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarElement {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: Option<String>,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefactorResponse {
    pub element: String,
    pub status: RefactorStatus,
    pub similar: Vec<SimilarElement>,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<RefactorPriority>,
}

/// A single-source match fed into the hybrid merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceHit {
    pub id: String,
    pub name: String,
    pub source: MatchSource,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HybridSearchResponse {
    pub results: Vec<RankedResult>,
    pub method: &'static str,
}
