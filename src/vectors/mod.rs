/// Similarity backend and embedder traits.
pub mod backend;

/// HTTP embeddings client.
pub mod embedding;

/// Brute-force cosine index over precomputed embeddings.
pub mod search;

pub use backend::{Embedder, SimilarityBackend};
pub use embedding::HttpEmbedder;
pub use search::{cosine_similarity, load_vectors, VectorEntry, VectorIndex};
