/// Hybrid graph + vector search engine.
pub mod engine;

/// Response types returned by the engine.
pub mod results;

pub use engine::{
    merge_hits, HybridSearchEngine, GRAPH_MATCH_SCORE, HYBRID_METHOD, VECTOR_MATCH_SCORE,
};
pub use results::*;
