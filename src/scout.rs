use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{get_graphscout_dir, load_config, save_config, ScoutConfig};
use crate::errors::{GraphScoutError, Result};
use crate::graph::{load_snapshot, save_snapshot, GraphSnapshot, InMemoryGraph};
use crate::resolution::{IdentifierResolver, Resolution};
use crate::search::HybridSearchEngine;
use crate::types::{GraphStats, Node};
use crate::vectors::{load_vectors, HttpEmbedder, SimilarityBackend, VectorIndex};

/// Owns a loaded graph and optional similarity backend for one project, and
/// hands borrowed views of them to the resolver and the search engine.
pub struct GraphScout {
    graph: InMemoryGraph,
    backend: Option<Box<dyn SimilarityBackend>>,
    config: ScoutConfig,
    project_root: PathBuf,
    project_id: String,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl GraphScout {
    /// Initializes a graphscout project at the given root.
    ///
    /// Writes a default configuration and, if none exists yet, an empty graph
    /// snapshot for the indexer to replace.
    pub fn init(project_root: &Path, project_id: Option<&str>) -> Result<Self> {
        let config = ScoutConfig {
            project_id: project_id.unwrap_or_default().to_string(),
            ..ScoutConfig::default()
        };
        save_config(project_root, &config)?;

        let snapshot_path = config.snapshot_path(project_root);
        if !snapshot_path.exists() {
            save_snapshot(&snapshot_path, &GraphSnapshot::default())?;
        }

        Self::open(project_root)
    }

    /// Opens an existing project: loads its configuration, graph snapshot and,
    /// when both vectors and an embedding endpoint are available, the
    /// similarity backend.
    pub fn open(project_root: &Path) -> Result<Self> {
        let config = load_config(project_root)?;
        let snapshot_path = config.snapshot_path(project_root);

        if !snapshot_path.exists() {
            return Err(GraphScoutError::Config {
                message: format!(
                    "no graph snapshot found at '{}'; run 'graphscout init' and export a graph first",
                    snapshot_path.display()
                ),
            });
        }

        let snapshot = load_snapshot(&snapshot_path)?;
        let project_id = if config.project_id.is_empty() {
            snapshot.project_id.clone().unwrap_or_default()
        } else {
            config.project_id.clone()
        };
        let graph = snapshot.into_graph();
        info!(nodes = graph.len(), project = %project_id, "loaded graph snapshot");

        let backend = Self::load_backend(project_root, &config)?;

        Ok(Self {
            graph,
            backend,
            config,
            project_root: project_root.to_path_buf(),
            project_id,
        })
    }

    /// Assembles a scout from already-loaded parts.
    pub fn from_parts(
        graph: InMemoryGraph,
        backend: Option<Box<dyn SimilarityBackend>>,
        project_id: &str,
    ) -> Self {
        Self {
            graph,
            backend,
            config: ScoutConfig {
                project_id: project_id.to_string(),
                ..ScoutConfig::default()
            },
            project_root: PathBuf::new(),
            project_id: project_id.to_string(),
        }
    }

    /// Returns `true` if a graphscout project has been initialized at the given root.
    pub fn is_initialized(project_root: &Path) -> bool {
        get_graphscout_dir(project_root).is_dir()
    }

    fn load_backend(
        project_root: &Path,
        config: &ScoutConfig,
    ) -> Result<Option<Box<dyn SimilarityBackend>>> {
        let vectors_path = config.vectors_path(project_root);
        if !vectors_path.exists() {
            debug!(path = %vectors_path.display(), "no vectors file; similarity search disabled");
            return Ok(None);
        }

        let Some(embedding) = &config.embedding else {
            info!("vectors present but no embedding endpoint configured; similarity search disabled");
            return Ok(None);
        };

        let embedder = HttpEmbedder::from_config(embedding);
        debug!(endpoint = embedder.url(), model = embedder.model(), "query embedder configured");

        let index = VectorIndex::new(load_vectors(&vectors_path)?, embedder);
        if index.is_empty() {
            warn!(path = %vectors_path.display(), "vectors file holds no entries");
        }
        info!(vectors = index.len(), "similarity backend ready");
        let backend: Box<dyn SimilarityBackend> = Box::new(index);
        Ok(Some(backend))
    }
}

// ---------------------------------------------------------------------------
// Query delegation
// ---------------------------------------------------------------------------

impl GraphScout {
    /// Resolves a free-form element reference to a node.
    pub fn resolve(&self, requested: &str) -> Option<&Node> {
        IdentifierResolver::new(&self.graph, &self.project_id).resolve(requested)
    }

    /// Resolves a reference and reports which strategy matched.
    pub fn resolve_detailed(&self, requested: &str) -> Option<Resolution<'_>> {
        IdentifierResolver::new(&self.graph, &self.project_id).resolve_detailed(requested)
    }

    /// A search engine borrowing this project's graph and backend.
    pub fn engine(&self) -> HybridSearchEngine<'_> {
        HybridSearchEngine::new(&self.graph, self.backend.as_deref()).with_project(&self.project_id)
    }

    /// Returns aggregate statistics about the loaded graph.
    pub fn get_stats(&self) -> GraphStats {
        GraphStats {
            project_id: (!self.project_id.is_empty()).then(|| self.project_id.clone()),
            vectors_available: self.backend.is_some(),
            ..self.graph.stats()
        }
    }

    pub fn graph(&self) -> &InMemoryGraph {
        &self.graph
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Returns a reference to the current configuration.
    pub fn get_config(&self) -> &ScoutConfig {
        &self.config
    }

    /// Returns the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}
