use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{GraphScoutError, Result};
use crate::types::Node;

use super::index::InMemoryGraph;

/// On-disk form of a graph exported by the indexer.
///
/// The order of `nodes` is preserved and becomes the graph's iteration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl GraphSnapshot {
    /// Converts the snapshot into an in-memory graph index.
    pub fn into_graph(self) -> InMemoryGraph {
        InMemoryGraph::from_nodes(self.nodes)
    }
}

/// Reads and parses a graph snapshot file.
pub fn load_snapshot(path: &Path) -> Result<GraphSnapshot> {
    let contents = fs::read_to_string(path).map_err(|e| GraphScoutError::Snapshot {
        message: format!("failed to read snapshot: {e}"),
        path: path.display().to_string(),
    })?;

    serde_json::from_str(&contents).map_err(|e| GraphScoutError::Snapshot {
        message: format!("failed to parse snapshot: {e}"),
        path: path.display().to_string(),
    })
}

/// Writes a snapshot to disk, replacing any existing file atomically.
pub fn save_snapshot(path: &Path, snapshot: &GraphSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path).map_err(|e| GraphScoutError::Snapshot {
        message: format!("failed to move snapshot into place: {e}"),
        path: path.display().to_string(),
    })?;
    Ok(())
}
