use async_trait::async_trait;
use tempfile::TempDir;

use graphscout::errors::{GraphScoutError, Result};
use graphscout::types::NodeKind;
use graphscout::vectors::*;

/// Embeds every query to the same fixed vector.
struct FixedEmbedder(Vec<f32>);

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(self.0.clone())
    }
}

struct BrokenEmbedder;

#[async_trait]
impl Embedder for BrokenEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(GraphScoutError::Embedding {
            message: "connection refused".to_string(),
        })
    }
}

fn entry(id: &str, kind: NodeKind, embedding: Vec<f32>, project: Option<&str>) -> VectorEntry {
    VectorEntry {
        id: id.to_string(),
        name: id.rsplit(':').next().unwrap_or(id).to_string(),
        kind,
        path: Some(format!("src/{id}.ts")),
        project_id: project.map(str::to_string),
        embedding,
    }
}

fn sample_entries() -> Vec<VectorEntry> {
    vec![
        entry("fn:near", NodeKind::Function, vec![1.0, 0.1], None),
        entry("fn:far", NodeKind::Function, vec![0.0, 1.0], None),
        entry("fn:mid", NodeKind::Function, vec![1.0, 1.0], None),
        entry("class:near", NodeKind::Class, vec![1.0, 0.0], None),
        entry("fn:other", NodeKind::Function, vec![1.0, 0.0], Some("other")),
    ]
}

#[test]
fn test_cosine_similarity_identical() {
    let v = vec![1.0, 2.0, 3.0];
    let sim = cosine_similarity(&v, &v);
    assert!((sim - 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_similarity_orthogonal() {
    let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
    assert!(sim.abs() < 1e-6);
}

#[test]
fn test_cosine_similarity_zero_vector() {
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
}

#[test]
fn test_vector_index_size() {
    let index = VectorIndex::new(sample_entries(), FixedEmbedder(vec![]));
    assert_eq!(index.len(), 5);
    assert!(!index.is_empty());

    let empty = VectorIndex::new(Vec::new(), FixedEmbedder(vec![]));
    assert_eq!(empty.len(), 0);
    assert!(empty.is_empty());
}

#[test]
fn test_brute_force_search_filters_kind_and_sorts() {
    let index = VectorIndex::new(sample_entries(), FixedEmbedder(vec![]));
    let hits = index.brute_force_search(&[1.0, 0.0], NodeKind::Function, 3, Some("proj"));

    let ids: Vec<&str> = hits.iter().map(|(e, _)| e.id.as_str()).collect();
    assert_eq!(ids, ["fn:near", "fn:mid", "fn:far"]);
    assert!(hits.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[test]
fn test_brute_force_search_without_project_sees_all_entries() {
    let index = VectorIndex::new(sample_entries(), FixedEmbedder(vec![]));
    let hits = index.brute_force_search(&[1.0, 0.0], NodeKind::Function, 10, None);
    assert_eq!(hits.len(), 4);
    assert_eq!(hits[0].0.id, "fn:other");
}

#[tokio::test]
async fn test_find_similar_maps_entries_to_candidates() {
    let index = VectorIndex::new(sample_entries(), FixedEmbedder(vec![1.0, 0.0]));
    let candidates = index
        .find_similar("format a date", NodeKind::Function, 2, Some("proj"))
        .await
        .unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].id, "fn:near");
    assert_eq!(candidates[0].name, "near");
    assert_eq!(candidates[0].kind, NodeKind::Function);
    assert_eq!(candidates[0].path(), Some("src/fn:near.ts"));
    assert!(candidates[0].similarity > candidates[1].similarity);
}

#[tokio::test]
async fn test_find_similar_with_zero_limit_skips_embedding() {
    let index = VectorIndex::new(sample_entries(), BrokenEmbedder);
    let candidates = index
        .find_similar("anything", NodeKind::Function, 0, None)
        .await
        .unwrap();
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn test_find_similar_propagates_embedding_errors() {
    let index = VectorIndex::new(sample_entries(), BrokenEmbedder);
    let err = index
        .find_similar("anything", NodeKind::Function, 5, None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn test_load_vectors_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vectors.json");
    std::fs::write(
        &path,
        r#"{"entries": [
            {"id": "proj:fn:a", "name": "a", "type": "function", "embedding": [0.1, 0.2]},
            {"id": "proj:class:B", "name": "B", "type": "CLASS", "path": "src/b.ts",
             "project_id": "proj", "embedding": [0.3, 0.4]}
        ]}"#,
    )
    .unwrap();

    let entries = load_vectors(&path).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].kind, NodeKind::Class);
    assert_eq!(entries[1].project_id.as_deref(), Some("proj"));
    assert!(entries[0].path.is_none());
}

#[test]
fn test_load_vectors_rejects_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vectors.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let err = load_vectors(&path).unwrap_err();
    assert!(matches!(err, GraphScoutError::Vector { .. }));
}
